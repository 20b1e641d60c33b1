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

use crate::client::TabletClient;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum::{Display, EnumString};

/// Which replica a read should be sent to.
#[derive(
    Clone, Copy, Debug, Default, Display, EnumString, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReadStrategy {
    /// Always the leader, for strongly consistent reads.
    #[default]
    Leader,
    /// A random follower, or the leader when the partition has none.
    Follower,
    /// Any replica, leader included, picked uniformly.
    Any,
}

/// Leader and followers of a single partition.
///
/// Immutable once built: a topology change produces a new route.
pub struct PartitionRoute<C> {
    pid: u32,
    leader: Option<Arc<C>>,
    followers: Vec<Arc<C>>,
}

impl<C: TabletClient> PartitionRoute<C> {
    pub fn new(pid: u32, leader: Option<Arc<C>>, followers: Vec<Arc<C>>) -> Self {
        Self {
            pid,
            leader,
            followers,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Leader handle as supplied at construction, `None` when no leader is known.
    pub fn leader(&self) -> Option<Arc<C>> {
        self.leader.clone()
    }

    pub fn has_leader(&self) -> bool {
        self.leader.is_some()
    }

    /// Uniformly random follower, `None` when the partition has no followers.
    ///
    /// Never substitutes the leader; use [`PartitionRoute::read_handle`] with
    /// [`ReadStrategy::Follower`] for that fallback.
    pub fn follower(&self) -> Option<Arc<C>> {
        self.followers.choose(&mut rand::rng()).cloned()
    }

    pub fn followers(&self) -> &[Arc<C>] {
        &self.followers
    }

    pub fn replica_count(&self) -> usize {
        usize::from(self.leader.is_some()) + self.followers.len()
    }

    pub fn read_handle(&self, strategy: ReadStrategy) -> Option<Arc<C>> {
        match strategy {
            ReadStrategy::Leader => self.leader(),
            ReadStrategy::Follower => self.follower().or_else(|| self.leader()),
            ReadStrategy::Any => {
                let replicas = self.replica_count();
                if replicas == 0 {
                    return None;
                }
                let index = rand::rng().random_range(0..replicas);
                match (&self.leader, index) {
                    (Some(leader), 0) => Some(leader.clone()),
                    (Some(_), index) => self.followers.get(index - 1).cloned(),
                    (None, index) => self.followers.get(index).cloned(),
                }
            }
        }
    }
}

impl<C: TabletClient> fmt::Debug for PartitionRoute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionRoute")
            .field("pid", &self.pid)
            .field("leader", &self.leader.as_ref().map(|l| l.endpoint()))
            .field(
                "followers",
                &self.followers.iter().map(|f| f.endpoint()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::TestTablet;
    use std::collections::HashMap;
    use std::str::FromStr;
    use test_case::test_case;

    fn route(leader: Option<&str>, followers: &[&str]) -> PartitionRoute<TestTablet> {
        PartitionRoute::new(
            0,
            leader.map(TestTablet::new),
            followers.iter().map(|f| TestTablet::new(f)).collect(),
        )
    }

    #[test]
    fn test_leader_is_returned_verbatim() {
        let leader = TestTablet::new("tb1:9520");
        let route = PartitionRoute::new(3, Some(leader.clone()), Vec::new());

        assert_eq!(route.pid(), 3);
        assert!(Arc::ptr_eq(&route.leader().unwrap(), &leader));
    }

    #[test]
    fn test_absent_leader() {
        let route = route(None, &["tb2:9520"]);

        assert!(route.leader().is_none());
        assert!(!route.has_leader());
    }

    #[test]
    fn test_follower_of_empty_list_is_absent() {
        let route = route(Some("tb1:9520"), &[]);

        assert!(route.follower().is_none());
    }

    #[test]
    fn test_follower_is_uniform_over_list() {
        const SAMPLES: usize = 10_000;
        let route = route(Some("tb1:9520"), &["tb2:9520", "tb3:9520", "tb4:9520"]);

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..SAMPLES {
            let follower = route.follower().unwrap();
            *counts.entry(follower.endpoint().to_owned()).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        assert!(!counts.contains_key("tb1:9520"));
        let expected = SAMPLES / 3;
        for (endpoint, count) in counts {
            // 3333 expected per bucket, the bound is far outside random variation.
            assert!(
                count.abs_diff(expected) < 400,
                "{endpoint} picked {count} times, expected about {expected}"
            );
        }
    }

    #[test_case(ReadStrategy::Leader, Some("tb1:9520"); "leader strategy")]
    #[test_case(ReadStrategy::Follower, Some("tb2:9520"); "follower strategy")]
    fn test_read_handle_with_single_follower(strategy: ReadStrategy, expected: Option<&str>) {
        let route = route(Some("tb1:9520"), &["tb2:9520"]);

        let handle = route.read_handle(strategy);

        assert_eq!(handle.as_ref().map(|h| h.endpoint()), expected);
    }

    #[test]
    fn test_follower_strategy_falls_back_to_leader() {
        let route = route(Some("tb1:9520"), &[]);

        let handle = route.read_handle(ReadStrategy::Follower).unwrap();

        assert_eq!(handle.endpoint(), "tb1:9520");
    }

    #[test]
    fn test_any_strategy_covers_every_replica() {
        let route = route(Some("tb1:9520"), &["tb2:9520", "tb3:9520"]);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..1_000 {
            seen.insert(route.read_handle(ReadStrategy::Any).unwrap().endpoint().to_owned());
        }

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_any_strategy_without_leader() {
        let route = route(None, &["tb2:9520"]);

        assert_eq!(
            route.read_handle(ReadStrategy::Any).unwrap().endpoint(),
            "tb2:9520"
        );
        assert!(self::route(None, &[]).read_handle(ReadStrategy::Any).is_none());
    }

    #[test_case("leader", ReadStrategy::Leader)]
    #[test_case("follower", ReadStrategy::Follower)]
    #[test_case("any", ReadStrategy::Any)]
    fn test_read_strategy_parses_snake_case(input: &str, expected: ReadStrategy) {
        assert_eq!(ReadStrategy::from_str(input).unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }
}
