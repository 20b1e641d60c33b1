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

use crate::error::CatalogResult;
use crate::partition_route::ReadStrategy;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "CATALOG_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Strategy used by [`crate::TableCatalog::route_key`].
    pub read_strategy: ReadStrategy,
    /// Fail a refresh when a table's partition ids are not exactly `0..n`
    /// instead of routing around the gaps.
    pub enforce_dense_partitions: bool,
}

impl CatalogConfig {
    /// Defaults, overridden by the TOML file at `path` (if it exists), then
    /// by `CATALOG_*` environment variables.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let config: CatalogConfig = Figment::from(Serialized::defaults(CatalogConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        debug!(path = %path.display(), ?config, "loaded catalog configuration");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> CatalogResult<Self> {
        let config = Figment::from(Serialized::defaults(CatalogConfig::default()))
            .merge(Toml::string(content))
            .extract()?;
        Ok(config)
    }
}
