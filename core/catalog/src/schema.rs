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

//! Binary column schema codec.
//!
//! Each column is encoded as:
//!
//! ```text
//! +-----------+-------------+-------------+------------------+
//! | type (u8) | ts_idx (u8) | name_len u8 | name (name_len)  |
//! +-----------+-------------+-------------+------------------+
//! ```
//!
//! The whole schema is capped at [`MAX_SCHEMA_SIZE`] bytes.

use crate::error::{CatalogError, CatalogResult};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const MAX_SCHEMA_SIZE: usize = 1024 * 1024;
pub const COLUMN_HEADER_SIZE: usize = 3;
pub const MAX_COLUMN_NAME_LENGTH: usize = 127;

#[derive(
    Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ColumnType {
    String = 0,
    Float = 1,
    Int32 = 2,
    Int64 = 3,
    Double = 4,
    Null = 5,
    UInt32 = 6,
    UInt64 = 7,
    Unknown = 100,
}

impl ColumnType {
    pub fn as_code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ColumnType::String,
            1 => ColumnType::Float,
            2 => ColumnType::Int32,
            3 => ColumnType::Int64,
            4 => ColumnType::Double,
            5 => ColumnType::Null,
            6 => ColumnType::UInt32,
            7 => ColumnType::UInt64,
            _ => ColumnType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDesc {
    pub column_type: ColumnType,
    pub name: String,
    pub add_ts_idx: bool,
}

impl ColumnDesc {
    pub fn new(column_type: ColumnType, name: impl Into<String>, add_ts_idx: bool) -> Self {
        Self {
            column_type,
            name: name.into(),
            add_ts_idx,
        }
    }

    /// Column from a naming-service type name such as `int64` or `string`.
    ///
    /// Only concrete value types are accepted; `null` and `unknown` are not
    /// valid declared column types.
    pub fn parse(type_name: &str, name: impl Into<String>, add_ts_idx: bool) -> CatalogResult<Self> {
        let column_type = type_name
            .parse::<ColumnType>()
            .ok()
            .filter(|t| !matches!(t, ColumnType::Null | ColumnType::Unknown))
            .ok_or_else(|| CatalogError::UnsupportedColumnType(type_name.to_owned()))?;
        Ok(Self::new(column_type, name, add_ts_idx))
    }

    fn encoded_size(&self) -> usize {
        COLUMN_HEADER_SIZE + self.name.len()
    }
}

pub fn encode(columns: &[ColumnDesc]) -> CatalogResult<Bytes> {
    let size: usize = columns.iter().map(ColumnDesc::encoded_size).sum();
    if size > MAX_SCHEMA_SIZE {
        return Err(CatalogError::SchemaTooLarge {
            size,
            max: MAX_SCHEMA_SIZE,
        });
    }

    let mut buffer = BytesMut::with_capacity(size);
    for column in columns {
        let name = column.name.as_bytes();
        if name.len() > MAX_COLUMN_NAME_LENGTH {
            return Err(CatalogError::ColumnNameTooLong {
                name: column.name.clone(),
                length: name.len(),
                max: MAX_COLUMN_NAME_LENGTH,
            });
        }
        buffer.put_u8(column.column_type.as_code());
        buffer.put_u8(u8::from(column.add_ts_idx));
        buffer.put_u8(name.len() as u8);
        buffer.put_slice(name);
    }
    Ok(buffer.freeze())
}

/// Decode columns from `schema`. A truncated trailing column is dropped.
pub fn decode(schema: &[u8]) -> Vec<ColumnDesc> {
    let mut columns = Vec::new();
    let mut position = 0;
    while schema.len() - position >= COLUMN_HEADER_SIZE {
        let header = &schema[position..position + COLUMN_HEADER_SIZE];
        let name_length = header[2] as usize;
        let end = position + COLUMN_HEADER_SIZE + name_length;
        if end > schema.len() {
            break;
        }
        let name = &schema[position + COLUMN_HEADER_SIZE..end];
        columns.push(ColumnDesc {
            column_type: ColumnType::from_code(header[0]),
            add_ts_idx: header[1] != 0,
            name: String::from_utf8_lossy(name).into_owned(),
        });
        position = end;
    }
    columns
}
