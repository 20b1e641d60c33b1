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

mod common;

use rand::Rng;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tablet_catalog::{RefreshableMap, Snapshot};

const KEYS: u32 = 100;
const READERS: usize = 10;
const READS_PER_READER: usize = 1_000;
const WRITES: u32 = 5;

/// Values carry the round that produced them: `key * 1000 + round`.
fn round_snapshot(round: u32) -> Snapshot<u32, u32> {
    (0..KEYS).map(|key| (key, key * 1000 + round)).collect()
}

fn round_of(key: u32, value: u32) -> u32 {
    assert_eq!(value / 1000, key, "value {value} does not belong to key {key}");
    value % 1000
}

#[test]
fn concurrent_reads_during_refreshes_never_tear() {
    common::init_tracing();
    let map: Arc<RefreshableMap<u32, u32>> = Arc::new(RefreshableMap::new());
    map.refresh(round_snapshot(0));
    let barrier = Arc::new(Barrier::new(READERS + 1));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let map = map.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let mut rng = rand::rng();
                let mut last_round = 0;
                for _ in 0..READS_PER_READER {
                    let key = rng.random_range(0..KEYS);
                    let value = map.get(&key).expect("every round covers all keys");
                    let round = round_of(key, value);
                    assert!(round <= WRITES);
                    // Refreshes are totally ordered, a reader never goes back in time.
                    assert!(round >= last_round, "saw round {round} after {last_round}");
                    last_round = round;
                }
            })
        })
        .collect();

    let writer = {
        let map = map.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            for round in 1..=WRITES {
                map.refresh(round_snapshot(round));
                thread::sleep(Duration::from_millis(10));
            }
        })
    };

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    writer.join().expect("writer panicked");

    assert_eq!(map.generation(), u64::from(WRITES) + 1);
    for key in 0..KEYS {
        assert_eq!(map.get(&key), Some(key * 1000 + WRITES));
    }
}

#[test]
fn pinned_snapshot_holds_a_single_generation() {
    let map: Arc<RefreshableMap<u32, u32>> = Arc::new(RefreshableMap::new());
    map.refresh(round_snapshot(0));

    let writer = {
        let map = map.clone();
        thread::spawn(move || {
            for round in 1..=200 {
                map.refresh(round_snapshot(round));
            }
        })
    };

    for _ in 0..500 {
        let snapshot = map.snapshot();
        let round = round_of(0, *snapshot.get(&0).unwrap());
        for key in 0..KEYS {
            assert_eq!(round_of(key, *snapshot.get(&key).unwrap()), round);
        }
        assert_eq!(snapshot.generation(), u64::from(round) + 1);
    }

    writer.join().expect("writer panicked");
}

#[test]
fn disjoint_refreshes_leave_only_the_last_keys() {
    let map: RefreshableMap<u32, u32> = RefreshableMap::new();
    for round in 0..WRITES {
        let keys = round * KEYS..(round + 1) * KEYS;
        map.refresh(keys.map(|key| (key, round)).collect::<Snapshot<_, _>>());
    }

    let last = WRITES - 1;
    assert_eq!(map.len(), KEYS as usize);
    for key in 0..last * KEYS {
        assert!(map.get(&key).is_none(), "key {key} outlived its refresh");
    }
    for key in last * KEYS..WRITES * KEYS {
        assert_eq!(map.get(&key), Some(last));
    }
}

#[test]
fn concurrent_writers_are_serialized() {
    const WRITERS: u32 = 8;
    const REFRESHES_PER_WRITER: u32 = 50;
    let map: Arc<RefreshableMap<u32, u32>> = Arc::new(RefreshableMap::new());

    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let map = map.clone();
            thread::spawn(move || {
                let mut generations = Vec::new();
                for _ in 0..REFRESHES_PER_WRITER {
                    generations.push(map.refresh(round_snapshot(writer)));
                }
                generations
            })
        })
        .collect();

    let mut generations: Vec<u64> = writers
        .into_iter()
        .flat_map(|writer| writer.join().expect("writer panicked"))
        .collect();
    generations.sort_unstable();

    let expected: Vec<u64> = (1..=u64::from(WRITERS * REFRESHES_PER_WRITER)).collect();
    assert_eq!(generations, expected);
    assert_eq!(map.generation(), u64::from(WRITERS * REFRESHES_PER_WRITER));
}
