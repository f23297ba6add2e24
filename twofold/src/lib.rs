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

//! # Twofold
//!
//! Twofold writes values of any supported Rust type to a compact binary
//! stream or to a human-editable text stream, and reads them back. Both
//! formats share one value framing: a null marker, an exact-type payload,
//! or an explicit type name followed by the payload, which is what makes
//! `Box<dyn Object>` and registered trait objects round-trip to their
//! concrete types.
//!
//! ## Key Features
//!
//! - **Two formats, one model**: [`BinarySerializer`] and [`TextSerializer`]
//!   accept the same types and the same contexts
//! - **Raw memory for plain data**: primitives, fixed-size arrays and
//!   `#[twofold(blittable)]` structs are copied as one block
//! - **Per-call overrides**: a [`SerializationContext`] can replace how a
//!   type is written (`marshal`) or read (`unmarshal`) for a single call
//! - **Polymorphism**: values behind `Box<dyn Object>` or a trait registered
//!   with [`impl_polymorphic!`] keep their concrete type
//!
//! ## Quick Start
//!
//! ```rust
//! use twofold::{BinarySerializer, Error, TextSerializer, TwofoldObject};
//!
//! #[derive(TwofoldObject, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     hobbies: Vec<String>,
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let person = Person {
//!     name: "Ada".to_string(),
//!     age: 36,
//!     hobbies: vec!["engines".to_string()],
//! };
//!
//! let bytes = BinarySerializer::default().to_bytes(&person)?;
//! let copy: Person = BinarySerializer::default().from_bytes(&bytes)?;
//! assert_eq!(copy, person);
//!
//! let text = TextSerializer::default().to_text(&person)?;
//! assert_eq!(text, "{\n  name Ada\n  age 36\n  hobbies [ engines\n  ]\n}\n");
//! let copy: Person = TextSerializer::default().from_text(&text)?;
//! assert_eq!(copy, person);
//! # Ok(())
//! # }
//! ```
//!
//! ## Overrides
//!
//! ```rust
//! use twofold::{BinarySerializer, Error, SerializationContext};
//!
//! # fn main() -> Result<(), Error> {
//! let context = SerializationContext::new().marshal(|i: &i32| format!("value {i}"));
//! let bytes = BinarySerializer::default().to_bytes_with_context(&42i32, &context)?;
//! let text: String = BinarySerializer::default().from_bytes(&bytes)?;
//! assert_eq!(text, "value 42");
//! # Ok(())
//! # }
//! ```
//!
//! ## Text format
//!
//! ```text
//! {
//!   name Ada            // bare strings run to the end of the line
//!   motto "say ""hi"""  // quoted strings double their quotes
//!   parent ~            // null
//!   pet @"demo::Cat" {  // explicit type name
//!     lives 9
//!   }
//! }
//! ```
//!
//! Generated code refers to `twofold_core`, so crates deriving
//! `TwofoldObject` depend on both `twofold` and `twofold-core`.

pub use twofold_core::{
    error::Error, impl_polymorphic, register, BinaryReader, BinarySerializer, BinaryWriter,
    Blittable, Config, Object, SerializationContext, Serializer, Shape, TextReader,
    TextSerializer, TextWriter, TypeCategory, TypeHandle, TypeRegistry,
};
pub use twofold_derive::TwofoldObject;
