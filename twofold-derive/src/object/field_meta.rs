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

//! Field-level metadata parsing for `#[twofold(...)]` attributes.
//!
//! - `skip`: the field is not written and is defaulted on read
//! - `rename = "X"`: name of the field in text records

use syn::Field;

/// Represents parsed `#[twofold(...)]` field attributes
#[derive(Debug, Clone, Default)]
pub struct FieldMeta {
    pub skip: bool,
    pub rename: Option<syn::LitStr>,
}

/// Parse `#[twofold(...)]` attributes from a field
pub fn parse_field_meta(field: &Field) -> syn::Result<FieldMeta> {
    let mut meta = FieldMeta::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("twofold") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("skip") {
                meta.skip = true;
            } else if nested.path.is_ident("rename") {
                let lit: syn::LitStr = nested.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "field name cannot be empty"));
                }
                meta.rename = Some(lit);
            } else {
                return Err(nested.error("unsupported twofold field attribute"));
            }
            Ok(())
        })?;
    }

    if meta.skip && meta.rename.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "a skipped field cannot be renamed",
        ));
    }

    Ok(meta)
}
