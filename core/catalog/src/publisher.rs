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

use arc_swap::{ArcSwap, Guard};
use std::sync::{Arc, Mutex, PoisonError};

/// Generation-stamped publication point behind [`crate::RefreshableMap`] and
/// [`crate::TableCatalog`].
///
/// Readers load through ArcSwap without locking. Writers are serialized by a
/// mutex that owns the generation counter, and the value is stamped and
/// stored while it is held, so publish order and generation order agree.
#[derive(Debug)]
pub(crate) struct Publisher<T> {
    current: ArcSwap<T>,
    writer: Mutex<u64>,
}

impl<T> Publisher<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            writer: Mutex::new(0),
        }
    }

    /// Store the value produced by `stamp` for the next generation and
    /// return that generation.
    pub(crate) fn publish(&self, stamp: impl FnOnce(u64) -> T) -> u64 {
        // The guarded value is a plain counter, a panicked writer cannot leave it torn.
        let mut generation = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.current.store(Arc::new(stamp(*generation)));
        *generation
    }

    pub(crate) fn load(&self) -> Guard<Arc<T>> {
        self.current.load()
    }

    pub(crate) fn load_full(&self) -> Arc<T> {
        self.current.load_full()
    }
}
