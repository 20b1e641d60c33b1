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

use ahash::AHashMap;
use std::sync::Arc;

/// A connection to one tablet server, owned by the surrounding client library.
///
/// The catalog only indexes and selects handles. It never opens, closes or
/// retries the underlying connection.
pub trait TabletClient: Send + Sync {
    /// Endpoint identifier this client is connected to, e.g. `host:port`.
    fn endpoint(&self) -> &str;
}

/// Endpoint identifier to client handle.
#[derive(Debug)]
pub struct EndpointRegistry<C> {
    clients: AHashMap<String, Arc<C>>,
}

impl<C> Default for EndpointRegistry<C> {
    fn default() -> Self {
        Self {
            clients: AHashMap::new(),
        }
    }
}

impl<C> Clone for EndpointRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            clients: self.clients.clone(),
        }
    }
}

impl<C: TabletClient> EndpointRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `client` under its own endpoint, replacing any previous handle.
    pub fn insert(&mut self, client: Arc<C>) -> Option<Arc<C>> {
        self.clients.insert(client.endpoint().to_owned(), client)
    }

    /// Register `client` under an explicit endpoint identifier.
    pub fn insert_as(&mut self, endpoint: impl Into<String>, client: Arc<C>) -> Option<Arc<C>> {
        self.clients.insert(endpoint.into(), client)
    }

    pub fn remove(&mut self, endpoint: &str) -> Option<Arc<C>> {
        self.clients.remove(endpoint)
    }

    pub fn get(&self, endpoint: &str) -> Option<Arc<C>> {
        self.clients.get(endpoint).cloned()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl<C: TabletClient> FromIterator<Arc<C>> for EndpointRegistry<C> {
    fn from_iter<I: IntoIterator<Item = Arc<C>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for client in iter {
            registry.insert(client);
        }
        registry
    }
}
