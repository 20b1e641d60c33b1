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

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Once;
use tablet_catalog::{EndpointRegistry, TabletClient};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug)]
pub struct FakeTablet {
    endpoint: String,
}

impl TabletClient for FakeTablet {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn tablets(count: usize) -> EndpointRegistry<FakeTablet> {
    (0..count)
        .map(|i| {
            Arc::new(FakeTablet {
                endpoint: tablet_endpoint(i),
            })
        })
        .collect()
}

pub fn tablet_endpoint(index: usize) -> String {
    format!("tablet-{index}:9520")
}
