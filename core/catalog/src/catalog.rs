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

//! Table catalog shared by every request handler.
//!
//! One [`CatalogSnapshot`] holds the name and id indexes of all tables, so a
//! single pointer swap publishes both. Handlers read through ArcSwap without
//! locks while the metadata watcher rebuilds the whole catalog on each
//! topology change.

use crate::client::{EndpointRegistry, TabletClient};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::partition_route::ReadStrategy;
use crate::publisher::Publisher;
use crate::refreshable_map::Snapshot;
use crate::table_route::{PartitionDescriptor, TableRoute};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// A table as reported by the naming service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub tid: u32,
    pub name: String,
    #[serde(default)]
    pub partitions: Vec<PartitionDescriptor>,
}

/// A published table: identity plus its partition routes.
pub struct TableEntry<C> {
    tid: u32,
    name: String,
    route: TableRoute<C>,
}

impl<C: TabletClient> TableEntry<C> {
    pub fn tid(&self) -> u32 {
        self.tid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> &TableRoute<C> {
        &self.route
    }
}

impl<C: TabletClient> fmt::Debug for TableEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableEntry")
            .field("tid", &self.tid)
            .field("name", &self.name)
            .field("route", &self.route)
            .finish()
    }
}

/// Immutable view of every table at one catalog generation.
pub struct CatalogSnapshot<C> {
    by_name: Snapshot<String, Arc<TableEntry<C>>>,
    by_id: Snapshot<u32, Arc<TableEntry<C>>>,
    generation: u64,
}

impl<C: TabletClient> CatalogSnapshot<C> {
    fn empty() -> Self {
        Self {
            by_name: Snapshot::new(),
            by_id: Snapshot::new(),
            generation: 0,
        }
    }

    pub fn table(&self, name: &str) -> Option<Arc<TableEntry<C>>> {
        self.by_name.get(name).cloned()
    }

    pub fn table_by_id(&self, tid: u32) -> Option<Arc<TableEntry<C>>> {
        self.by_id.get(&tid).cloned()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<TableEntry<C>>> {
        self.by_name.iter().map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Live routing catalog for all tables of a cluster.
pub struct TableCatalog<C> {
    current: Publisher<CatalogSnapshot<C>>,
    config: CatalogConfig,
}

impl<C: TabletClient> Default for TableCatalog<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TabletClient> TableCatalog<C> {
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            current: Publisher::new(CatalogSnapshot::empty()),
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Rebuild every table route from `tables` and publish them atomically.
    ///
    /// Tables missing from `tables` disappear from the catalog. Repeated names
    /// or ids keep the table described last. With
    /// [`CatalogConfig::enforce_dense_partitions`] a table with sparse or
    /// repeated partition ids fails the refresh and the previous catalog stays
    /// published.
    ///
    /// Routes are built before the writer lock is taken, so concurrent
    /// refreshes publish in the order they reach the lock, not the order
    /// they started in. A slower refresh carrying an older topology can
    /// therefore replace a newer one; the returned generation tells callers
    /// which publish came last. Callers that need start order must serialize
    /// their refreshes.
    pub fn refresh<I>(&self, tables: I, registry: &EndpointRegistry<C>) -> CatalogResult<u64>
    where
        I: IntoIterator<Item = TableDescriptor>,
    {
        let mut by_name: AHashMap<String, Arc<TableEntry<C>>> = AHashMap::new();
        let mut by_id: AHashMap<u32, Arc<TableEntry<C>>> = AHashMap::new();

        for table in tables {
            let span = info_span!("table", tid = table.tid, name = %table.name);
            let _entered = span.enter();

            let route = self.build_route(&table, registry)?;
            let entry = Arc::new(TableEntry {
                tid: table.tid,
                name: table.name,
                route,
            });

            if let Some(previous) = by_name.insert(entry.name.clone(), entry.clone()) {
                warn!(previous_tid = previous.tid, "table name described twice");
                by_id.remove(&previous.tid);
            }
            if let Some(previous) = by_id.insert(entry.tid, entry.clone()) {
                if previous.name != entry.name {
                    warn!(previous_name = %previous.name, "table id described twice");
                    by_name.remove(&previous.name);
                }
            }
        }

        let tables = by_name.len();
        let generation = self.current.publish(|generation| CatalogSnapshot {
            by_name: by_name.into(),
            by_id: by_id.into(),
            generation,
        });
        info!(generation, tables, "published table catalog");
        Ok(generation)
    }

    fn build_route(
        &self,
        table: &TableDescriptor,
        registry: &EndpointRegistry<C>,
    ) -> CatalogResult<TableRoute<C>> {
        if !self.config.enforce_dense_partitions {
            return Ok(TableRoute::new(&table.partitions, registry));
        }
        TableRoute::try_new_dense(&table.partitions, registry).map_err(|error| {
            CatalogError::InvalidTable {
                tid: table.tid,
                name: table.name.clone(),
                source: Box::new(error),
            }
        })
    }

    /// Pin the current catalog so several lookups observe one generation.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot<C>> {
        self.current.load_full()
    }

    pub fn table(&self, name: &str) -> Option<Arc<TableEntry<C>>> {
        self.current.load().table(name)
    }

    pub fn table_by_id(&self, tid: u32) -> Option<Arc<TableEntry<C>>> {
        self.current.load().table_by_id(tid)
    }

    /// Leader of partition `pid` of table `name`.
    pub fn leader_handle(&self, name: &str, pid: u32) -> Option<Arc<C>> {
        self.table(name)?.route().leader_handle(pid)
    }

    /// Replica that should serve `key` of table `name`, using the configured
    /// read strategy.
    pub fn route_key(&self, name: &str, key: &[u8]) -> Option<Arc<C>> {
        self.route_key_with(name, key, self.config.read_strategy)
    }

    pub fn route_key_with(&self, name: &str, key: &[u8], strategy: ReadStrategy) -> Option<Arc<C>> {
        let table = self.table(name)?;
        let route = table.route();
        route.read_handle(route.partition_for_key(key), strategy)
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Number of completed refreshes.
    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }
}
