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

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Field, Fields, Ident};

use crate::object::field_meta::{parse_field_meta, FieldMeta};

/// Source field with its position, identifier and parsed attributes.
///
/// For tuple structs `field_name` is the index as a string, which is also
/// what the text format uses as the field name unless renamed. Raw
/// identifiers are stored without their `r#` prefix.
pub struct SourceField<'a> {
    pub index: usize,
    pub field: &'a Field,
    pub field_name: String,
    pub is_tuple_struct: bool,
    pub meta: FieldMeta,
}

impl<'a> SourceField<'a> {
    /// `self.x` or `self.0`.
    pub fn access(&self) -> TokenStream {
        if self.is_tuple_struct {
            let index = syn::Index::from(self.index);
            quote! { self.#index }
        } else {
            let ident = &self.field.ident;
            quote! { self.#ident }
        }
    }

    /// Local holding the field value while a struct is being read.
    pub fn local(&self) -> Ident {
        format_ident!("_{}", self.field_name)
    }

    /// Name written in front of the value in a text record.
    pub fn text_name(&self) -> String {
        self.meta
            .rename
            .as_ref()
            .map(|lit| lit.value())
            .unwrap_or_else(|| self.field_name.clone())
    }

    /// Generate field initialization syntax for struct construction.
    /// - tuple struct: just the value
    /// - named struct: `field_name: value`
    pub fn field_init(&self, value: TokenStream) -> TokenStream {
        if self.is_tuple_struct {
            value
        } else {
            let ident = &self.field.ident;
            quote! { #ident: #value }
        }
    }
}

/// Generate Self construction syntax.
/// - unit struct: `Self`
/// - tuple struct: `Self(field0, field1, ...)`
/// - named struct: `Self { field0, field1, ... }`
pub fn self_construction(fields: &Fields, field_inits: &[TokenStream]) -> TokenStream {
    match fields {
        Fields::Unit => quote! { Self },
        Fields::Unnamed(_) => quote! { Self( #(#field_inits),* ) },
        Fields::Named(_) => quote! { Self { #(#field_inits),* } },
    }
}

/// Returns the fields in declaration order with their attributes parsed.
pub fn source_fields(fields: &Fields) -> syn::Result<Vec<SourceField<'_>>> {
    let is_tuple_struct = matches!(fields, Fields::Unnamed(_));
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let field_name = match &field.ident {
                Some(ident) => ident.unraw().to_string(),
                None => index.to_string(),
            };
            Ok(SourceField {
                index,
                field,
                field_name,
                is_tuple_struct,
                meta: parse_field_meta(field)?,
            })
        })
        .collect()
}
