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

//! Keyed lookup table that is replaced wholesale.
//!
//! Uses ArcSwap over an immutable [`Snapshot`] for lock-free reads. A refresh
//! builds a complete new snapshot off to the side and swaps the pointer, so a
//! reader sees either the old or the new dataset, never a mix. Readers that
//! still hold the old snapshot keep it alive until they drop it.

use ahash::AHashMap;
use crate::publisher::Publisher;
use arc_swap::Guard;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Immutable point-in-time keyed collection.
#[derive(Debug, Clone)]
pub struct Snapshot<K, V> {
    entries: AHashMap<K, V>,
    generation: u64,
}

impl<K, V> Default for Snapshot<K, V> {
    fn default() -> Self {
        Self {
            entries: AHashMap::new(),
            generation: 0,
        }
    }
}

impl<K: Eq + Hash, V> Snapshot<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Refresh count at which this snapshot was published, 0 if it never was.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for Snapshot<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            generation: 0,
        }
    }
}

impl<K: Eq + Hash, V> From<AHashMap<K, V>> for Snapshot<K, V> {
    fn from(entries: AHashMap<K, V>) -> Self {
        Self {
            entries,
            generation: 0,
        }
    }
}

impl<K: Eq + Hash, V, S> From<HashMap<K, V, S>> for Snapshot<K, V> {
    fn from(entries: HashMap<K, V, S>) -> Self {
        entries.into_iter().collect()
    }
}

/// Thread-safe map whose whole content is replaced by [`RefreshableMap::refresh`].
///
/// Reads never take a lock. Refreshes are serialized by a writer-only mutex
/// that also owns the generation counter, so every published snapshot has a
/// distinct, increasing generation.
#[derive(Debug)]
pub struct RefreshableMap<K, V> {
    current: Publisher<Snapshot<K, V>>,
}

impl<K: Eq + Hash, V> Default for RefreshableMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> RefreshableMap<K, V> {
    /// Create a map that answers every lookup with `None` until refreshed.
    pub fn new() -> Self {
        Self {
            current: Publisher::new(Snapshot::new()),
        }
    }

    /// Atomically install `snapshot` as the current dataset.
    ///
    /// An empty snapshot is valid and clears every previous mapping.
    /// Returns the generation assigned to the new snapshot.
    pub fn refresh(&self, snapshot: impl Into<Snapshot<K, V>>) -> u64 {
        let mut snapshot = snapshot.into();
        let entries = snapshot.len();
        let generation = self.current.publish(|generation| {
            snapshot.generation = generation;
            snapshot
        });
        debug!(generation, entries, "refreshed map snapshot");
        generation
    }

    /// Look up `key` in whichever snapshot is current. Lock-free.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.current.load().get(key).cloned()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current.load().contains_key(key)
    }

    /// Load the current snapshot. Lock-free read.
    ///
    /// Hold the guard only briefly; use [`RefreshableMap::snapshot`] to keep
    /// a snapshot across many lookups.
    pub fn load(&self) -> Guard<Arc<Snapshot<K, V>>> {
        self.current.load()
    }

    /// Pin the current snapshot so several lookups observe one generation.
    pub fn snapshot(&self) -> Arc<Snapshot<K, V>> {
        self.current.load_full()
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
