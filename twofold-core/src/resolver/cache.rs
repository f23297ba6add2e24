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

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::ReentrantMutex;

use crate::error::Error;

/// Insert-once concurrent map.
///
/// Lookups load an immutable snapshot and take no lock. Inserts are
/// serialized by a build lock, re-check the snapshot after acquiring it, and
/// publish a new snapshot, so each key is built at most once. The lock is
/// reentrant: a builder may resolve other keys of the same map.
pub struct OnceMap<K, V> {
    entries: ArcSwap<HashMap<K, V>>,
    build: ReentrantMutex<()>,
}

impl<K, V> OnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        OnceMap {
            entries: ArcSwap::from_pointee(HashMap::new()),
            build: ReentrantMutex::new(()),
        }
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.load().get(key).cloned()
    }

    /// Returns the value for `key`, running `build` if it is absent. A
    /// failed build inserts nothing.
    pub fn get_or_try_insert_with<F>(&self, key: K, build: F) -> Result<V, Error>
    where
        F: FnOnce() -> Result<V, Error>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let _guard = self.build.lock();
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = build()?;
        let mut next = HashMap::clone(&self.entries.load_full());
        next.insert(key, value.clone());
        self.entries.store(Arc::new(next));
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for OnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
