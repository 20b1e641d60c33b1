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

use thiserror::Error;

/// Errors raised by the fallible parts of the catalog.
///
/// Lookups never fail: a missing table, partition, leader or follower is an
/// absent value, not an error.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Partition ids are not dense: expected partition {expected}, found {found}")]
    SparsePartitions { expected: u32, found: u32 },

    #[error("Partition {0} is described more than once")]
    DuplicatePartition(u32),

    #[error("Table '{name}' with id {tid} failed to build: {source}")]
    InvalidTable {
        tid: u32,
        name: String,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("Column name '{name}' is {length} bytes long, maximum is {max}")]
    ColumnNameTooLong {
        name: String,
        length: usize,
        max: usize,
    },

    #[error("Encoded schema is {size} bytes, maximum is {max}")]
    SchemaTooLarge { size: usize, max: usize },

    #[error("Unsupported column type: {0}")]
    UnsupportedColumnType(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for CatalogError {
    fn from(error: figment::Error) -> Self {
        CatalogError::Config(Box::new(error))
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
