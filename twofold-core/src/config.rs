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

/// Configuration for twofold serializers.
///
/// Each [`BinarySerializer`](crate::BinarySerializer) and
/// [`TextSerializer`](crate::TextSerializer) owns one and lends it to the
/// stream adapters it creates.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum nesting of explicit-type-name (tag 2) values while reading.
    pub max_dyn_depth: u32,
    /// Spaces per nesting level in text output.
    pub indent: usize,
    /// Capacity of the buffer placed in front of the text output stream.
    pub buffer_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_dyn_depth: 64,
            indent: 2,
            buffer_capacity: 8 * 1024,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get maximum dynamic depth.
    #[inline(always)]
    pub fn max_dyn_depth(&self) -> u32 {
        self.max_dyn_depth
    }

    #[inline(always)]
    pub fn indent(&self) -> usize {
        self.indent
    }

    #[inline(always)]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }
}
