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

//! Key to partition mapping.
//!
//! `pid = xxhash64(key, seed = 0) % partition_count`
//!
//! This mapping belongs to this crate only. Other clients of the store hash
//! keys with their own function, so a key routed here may land on a different
//! partition than the same key written by another client. Mixed-client
//! deployments must agree on placement some other way, e.g. by passing
//! explicit partition ids.

use twox_hash::XxHash64;

const KEY_HASH_SEED: u64 = 0;

/// Partition id owning `key` in a table with `partition_count` partitions.
///
/// A table without partitions maps every key to 0, which no route resolves.
pub fn partition_for_key(key: &[u8], partition_count: u32) -> u32 {
    if partition_count == 0 {
        return 0;
    }
    let hash = XxHash64::oneshot(KEY_HASH_SEED, key);
    (hash % u64::from(partition_count)) as u32
}
