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

//! # Twofold Core
//!
//! Type-dispatch engine behind the `twofold` crate. It writes and reads
//! values of any supported type to a binary or a text stream, keeps one
//! codec per type, and lets a [`SerializationContext`] substitute the
//! representation of chosen types for the duration of a call.
//!
//! ## Architecture
//!
//! - **`twofold`**: [`BinarySerializer`] and [`TextSerializer`] facades
//! - **`binary`**: binary stream adapter ([`BinaryWriter`], [`BinaryReader`])
//! - **`text`**: text stream adapter ([`TextWriter`], [`TextReader`])
//! - **`serializer`**: the [`Serializer`] trait and built-in implementations
//! - **`resolver`**: codec cache, type registry and serialization contexts
//! - **`types`**: [`Shape`], [`TypeCategory`] and [`ValueTag`]
//! - **`error`**: error type and helper macros
//!
//! ## Value framing
//!
//! Every value starts with a tag. Tag 0 is a null or default value, tag 1
//! a value whose runtime type is the declared type, tag 2 a value preceded
//! by the canonical name of its type. Sealed types (everything but trait
//! objects) always use tag 1; polymorphic values always use tag 2 so the
//! reader can find the concrete type through the [`TypeRegistry`].
//!
//! ## Type categories
//!
//! The codec of a type is derived once from its [`Shape`]:
//!
//! - **Unmanaged**: fixed layout, moved as raw memory in binary
//! - **UnmanagedArray**: a length then one raw block
//! - **String**: a length then UTF-16 code units
//! - **ManagedArray**: a length then one framed value per element
//! - **Abstract**: only reachable through tag 2
//! - **RuntimeTypeValue**: a [`TypeHandle`], written as its name
//! - **Managed**: walked field by field
//!
//! ## Usage
//!
//! This crate is typically used through the `twofold` crate, which adds
//! the `TwofoldObject` derive macro.
//!
//! ```rust
//! use twofold_core::{BinarySerializer, TextSerializer};
//! use std::collections::BTreeMap;
//!
//! let mut scores = BTreeMap::new();
//! scores.insert("ada".to_string(), 3i32);
//!
//! let bytes = BinarySerializer::default().to_bytes(&scores).unwrap();
//! let copy: BTreeMap<String, i32> = BinarySerializer::default().from_bytes(&bytes).unwrap();
//! assert_eq!(copy, scores);
//!
//! let text = TextSerializer::default().to_text(&scores).unwrap();
//! assert_eq!(text, "[ ada\n  3 ]\n");
//! ```

pub mod binary;
pub mod config;
pub mod error;
pub mod resolver;
pub mod serializer;
pub mod text;
pub mod twofold;
pub mod types;
pub(crate) mod util;

pub use crate::binary::{BinaryReader, BinaryWriter};
pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::resolver::codec::{BinaryCodec, TextCodec};
pub use crate::resolver::context::SerializationContext;
pub use crate::resolver::id_dispenser::IdDispenser;
pub use crate::resolver::type_registry::{Registration, TypeRegistry};
pub use crate::serializer::{Blittable, Object, Serializer, TypeHandle};
pub use crate::text::{TextReader, TextWriter};
pub use crate::twofold::{BinarySerializer, TextSerializer};
pub use crate::types::{Shape, TypeCategory, ValueTag};

/// Registers `T` in the global type registry under its canonical name.
///
/// Types are also registered lazily the first time they are written
/// polymorphically; explicit registration is needed when a process only
/// reads values of that type behind a tag-2 frame.
pub fn register<T: Serializer>() -> Result<Registration, Error> {
    TypeRegistry::global().register::<T>()
}
