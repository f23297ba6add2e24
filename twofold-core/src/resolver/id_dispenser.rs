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

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{const_mutex, Mutex};

static GLOBAL: IdDispenser = IdDispenser::new();

/// Hands out small integer ids, reusing released ones first (LIFO) and
/// otherwise counting up from zero.
#[derive(Debug)]
pub struct IdDispenser {
    next: AtomicUsize,
    released: Mutex<Vec<usize>>,
}

impl IdDispenser {
    pub const fn new() -> Self {
        IdDispenser {
            next: AtomicUsize::new(0),
            released: const_mutex(Vec::new()),
        }
    }

    /// Dispenser used for [`SerializationContext`](crate::SerializationContext) slot ids.
    pub fn global() -> &'static IdDispenser {
        &GLOBAL
    }

    pub fn take(&self) -> usize {
        if let Some(id) = self.released.lock().pop() {
            return id;
        }
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub fn release(&self, id: usize) {
        self.released.lock().push(id);
    }
}

impl Default for IdDispenser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_from_zero() {
        let ids = IdDispenser::new();
        assert_eq!((ids.take(), ids.take(), ids.take()), (0, 1, 2));
    }

    #[test]
    fn reuses_last_released_first() {
        let ids = IdDispenser::new();
        let a = ids.take();
        let b = ids.take();
        ids.release(a);
        ids.release(b);
        assert_eq!(ids.take(), b);
        assert_eq!(ids.take(), a);
        assert_eq!(ids.take(), 2);
    }
}
