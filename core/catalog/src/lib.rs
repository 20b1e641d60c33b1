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

//! Client-side partition routing for a partitioned, replicated tablet store.
//!
//! - [`RefreshableMap`]: keyed lookups that stay lock-free while the whole
//!   dataset is swapped by a background refresh.
//! - [`PartitionRoute`]: leader and followers of one partition, with replica
//!   selection per [`ReadStrategy`].
//! - [`TableRoute`]: every partition route of one table, built from
//!   naming-service descriptors and an [`EndpointRegistry`].
//! - [`TableCatalog`]: all tables, published together on each topology change.

mod catalog;
mod client;
mod config;
mod error;
mod partition_route;
mod publisher;
mod refreshable_map;
pub mod schema;
pub mod sharding;
mod table_route;

pub use catalog::{CatalogSnapshot, TableCatalog, TableDescriptor, TableEntry};
pub use client::{EndpointRegistry, TabletClient};
pub use config::{CatalogConfig, ENV_PREFIX};
pub use error::{CatalogError, CatalogResult};
pub use partition_route::{PartitionRoute, ReadStrategy};
pub use refreshable_map::{RefreshableMap, Snapshot};
pub use table_route::{PartitionDescriptor, TableRoute};
