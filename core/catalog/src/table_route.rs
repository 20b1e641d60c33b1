// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Per-table routing, built from naming-service partition descriptors.
//!
//! Routes are kept sorted by partition id, one entry per routed partition.
//! Dense ids `0..n` are looked up positionally; any other id falls back to a
//! binary search, so a stray huge id costs one entry, not one slot per id.
//! Endpoints missing from the registry do not fail the build: the partition
//! simply ends up without a leader or with fewer followers, and the caller's
//! retry path deals with it.

use crate::client::{EndpointRegistry, TabletClient};
use crate::error::{CatalogError, CatalogResult};
use crate::partition_route::{PartitionRoute, ReadStrategy};
use crate::sharding;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Placement of one partition as reported by the naming service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionDescriptor {
    pub pid: u32,
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default)]
    pub followers: Vec<String>,
}

impl PartitionDescriptor {
    pub fn new(pid: u32, leader: Option<&str>, followers: &[&str]) -> Self {
        Self {
            pid,
            leader: leader.map(str::to_owned),
            followers: followers.iter().map(|f| (*f).to_owned()).collect(),
        }
    }
}

/// All partition routes of one table, sorted by partition id.
pub struct TableRoute<C> {
    partitions: Vec<Arc<PartitionRoute<C>>>,
}

impl<C: TabletClient> TableRoute<C> {
    /// Build routes for `descriptors`, resolving endpoints through `registry`.
    ///
    /// Descriptors are processed in ascending pid order. Ids are expected to be
    /// dense from 0; missing ids are skipped and a repeated id keeps the
    /// descriptor that came last, both with a warning.
    pub fn new<'a>(
        descriptors: impl IntoIterator<Item = &'a PartitionDescriptor>,
        registry: &EndpointRegistry<C>,
    ) -> Self {
        let mut descriptors: Vec<_> = descriptors.into_iter().collect();
        descriptors.sort_by_key(|descriptor| descriptor.pid);

        let mut partitions: Vec<Arc<PartitionRoute<C>>> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let route = Arc::new(resolve(descriptor, registry));
            match partitions.last_mut() {
                Some(last) if last.pid() == descriptor.pid => {
                    warn!(
                        pid = descriptor.pid,
                        "duplicate partition descriptor, replacing the earlier one"
                    );
                    *last = route;
                }
                _ => partitions.push(route),
            }
        }

        if let Some(last) = partitions.last() {
            let missing = u64::from(last.pid()) + 1 - partitions.len() as u64;
            if missing > 0 {
                warn!(
                    partitions = partitions.len(),
                    highest_pid = last.pid(),
                    missing,
                    "partition ids are not dense, keys are routed over existing partitions only"
                );
            }
        }

        Self { partitions }
    }

    /// Like [`TableRoute::new`], but rejects descriptors whose ids are not
    /// exactly `0..n` without repeats.
    pub fn try_new_dense<'a>(
        descriptors: impl IntoIterator<Item = &'a PartitionDescriptor>,
        registry: &EndpointRegistry<C>,
    ) -> CatalogResult<Self> {
        let descriptors: Vec<_> = descriptors.into_iter().collect();
        let mut pids: Vec<u32> = descriptors.iter().map(|d| d.pid).collect();
        pids.sort_unstable();
        for (expected, &found) in (0_u32..).zip(pids.iter()) {
            if found == expected {
                continue;
            }
            if expected > 0 && found == expected - 1 {
                return Err(CatalogError::DuplicatePartition(found));
            }
            return Err(CatalogError::SparsePartitions { expected, found });
        }
        Ok(Self::new(descriptors, registry))
    }

    /// Number of routed partitions. Equals one past the highest id when ids
    /// are dense.
    pub fn partition_count(&self) -> u32 {
        self.partitions.len() as u32
    }

    /// Route of partition `pid`, `None` when no descriptor named it.
    pub fn partition_route(&self, pid: u32) -> Option<Arc<PartitionRoute<C>>> {
        self.find(pid).cloned()
    }

    /// Leader of partition `pid`, `None` if the partition or its leader is unknown.
    pub fn leader_handle(&self, pid: u32) -> Option<Arc<C>> {
        self.find(pid)?.leader()
    }

    pub fn read_handle(&self, pid: u32, strategy: ReadStrategy) -> Option<Arc<C>> {
        self.find(pid)?.read_handle(strategy)
    }

    /// Partition that owns `key`.
    ///
    /// The key is hashed over the routed partitions, so the result always
    /// names an existing partition unless the table has none (then 0).
    pub fn partition_for_key(&self, key: &[u8]) -> u32 {
        let index = sharding::partition_for_key(key, self.partition_count());
        self.partitions
            .get(index as usize)
            .map_or(0, |route| route.pid())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PartitionRoute<C>>> {
        self.partitions.iter()
    }

    fn find(&self, pid: u32) -> Option<&Arc<PartitionRoute<C>>> {
        match self.partitions.get(pid as usize) {
            Some(route) if route.pid() == pid => Some(route),
            _ => self
                .partitions
                .binary_search_by_key(&pid, |route| route.pid())
                .ok()
                .map(|index| &self.partitions[index]),
        }
    }
}

impl<C: TabletClient> fmt::Debug for TableRoute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.partitions.iter()).finish()
    }
}

fn resolve<C: TabletClient>(
    descriptor: &PartitionDescriptor,
    registry: &EndpointRegistry<C>,
) -> PartitionRoute<C> {
    let lookup = |endpoint: &str, role: &'static str| {
        let client = registry.get(endpoint);
        if client.is_none() {
            warn!(
                pid = descriptor.pid,
                endpoint, role, "no client registered for endpoint"
            );
        }
        client
    };

    let leader = descriptor
        .leader
        .as_deref()
        .and_then(|endpoint| lookup(endpoint, "leader"));
    let followers = descriptor
        .followers
        .iter()
        .filter_map(|endpoint| lookup(endpoint, "follower"))
        .collect();
    PartitionRoute::new(descriptor.pid, leader, followers)
}
