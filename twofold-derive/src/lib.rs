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

//! # Twofold Derive Macros
//!
//! `#[derive(TwofoldObject)]` implements `twofold_core::Serializer` for a
//! user type so it can be written to and read from both twofold formats.
//!
//! **Supported types:**
//! - Structs with named fields, tuple structs and unit structs, walked field
//!   by field (`Managed`)
//! - `#[repr(C)]` structs marked `#[twofold(blittable)]`, moved as raw memory
//!   in the binary format (`Unmanaged`)
//! - Fieldless enums with an integer `#[repr]`, moved as their discriminant
//!   in binary and written as the variant name in text
//!
//! **Example:**
//! ```rust,ignore
//! use twofold_derive::TwofoldObject;
//!
//! #[derive(TwofoldObject, Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     #[twofold(rename = "Age")]
//!     age: i32,
//!     tags: Vec<String>,
//! }
//!
//! #[derive(TwofoldObject, Clone, Copy, Debug, PartialEq)]
//! #[repr(C)]
//! #[twofold(blittable)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! #[derive(TwofoldObject, Clone, Copy, Debug, PartialEq)]
//! #[repr(u8)]
//! enum Status {
//!     Active,
//!     Suspended,
//! }
//! ```
//!
//! ## Attributes
//!
//! On the type:
//! - `#[twofold(name = "...")]`: canonical name used in tag-2 frames,
//!   `module_path!()::Ident` by default
//! - `#[twofold(blittable)]`: raw memory layout; requires `#[repr(C)]`,
//!   `Copy`, blittable fields and no padding, all checked at compile time
//!
//! On a field:
//! - `#[twofold(skip)]`: not written, `Default::default()` on read
//! - `#[twofold(rename = "...")]`: field name in the text format
//!
//! Generated code refers to `twofold_core`, which must be a dependency of
//! the crate using the derive.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Type-level `#[twofold(...)]` attributes.
#[derive(Default)]
pub(crate) struct TwofoldAttrs {
    pub name: Option<syn::LitStr>,
    pub blittable: bool,
}

fn parse_attrs(input: &DeriveInput) -> syn::Result<TwofoldAttrs> {
    let mut attrs = TwofoldAttrs::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("twofold") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                attrs.name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("blittable") {
                attrs.blittable = true;
                Ok(())
            } else {
                Err(meta.error("unsupported twofold attribute"))
            }
        })?;
    }
    Ok(attrs)
}

/// Derive macro implementing `twofold_core::Serializer`.
///
/// # Example
///
/// ```rust,ignore
/// use twofold_derive::TwofoldObject;
///
/// #[derive(TwofoldObject, Debug, PartialEq)]
/// struct Address {
///     street: String,
///     city: String,
/// }
/// ```
#[proc_macro_derive(TwofoldObject, attributes(twofold))]
pub fn proc_macro_derive_twofold_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let result = parse_attrs(&input).and_then(|attrs| object::derive_serializer(&input, attrs));
    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
