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
use quote::quote;
use syn::Fields;

use crate::util::{self_construction, SourceField};

/// Value of a field that is not on the wire.
fn skipped_value(sf: &SourceField<'_>) -> TokenStream {
    let ty = &sf.field.ty;
    quote! { <#ty as ::core::default::Default>::default() }
}

pub fn gen_default_value(fields: &Fields, source_fields: &[SourceField<'_>]) -> TokenStream {
    let inits: Vec<_> = source_fields
        .iter()
        .map(|sf| {
            let ty = &sf.field.ty;
            let value = if sf.meta.skip {
                skipped_value(sf)
            } else {
                quote! { <#ty as twofold_core::Serializer>::default_value() }
            };
            sf.field_init(value)
        })
        .collect();
    self_construction(fields, &inits)
}

pub fn gen_read_fields(fields: &Fields, source_fields: &[SourceField<'_>]) -> TokenStream {
    let reads = source_fields.iter().filter(|sf| !sf.meta.skip).map(|sf| {
        let ty = &sf.field.ty;
        let local = sf.local();
        quote! {
            let #local = reader.read::<#ty>()?;
        }
    });
    let inits: Vec<_> = source_fields
        .iter()
        .map(|sf| {
            if sf.meta.skip {
                sf.field_init(skipped_value(sf))
            } else {
                let local = sf.local();
                sf.field_init(quote! { #local })
            }
        })
        .collect();
    let construction = self_construction(fields, &inits);
    quote! {
        #(#reads)*
        Ok(#construction)
    }
}

/// Fields are matched by name, so any order is accepted and missing fields
/// take their default value.
pub fn gen_read_text(fields: &Fields, source_fields: &[SourceField<'_>]) -> TokenStream {
    let wire: Vec<_> = source_fields.iter().filter(|sf| !sf.meta.skip).collect();
    let declares = wire.iter().map(|sf| {
        let ty = &sf.field.ty;
        let local = sf.local();
        quote! {
            let mut #local: Option<#ty> = None;
        }
    });
    let arms = wire.iter().map(|sf| {
        let ty = &sf.field.ty;
        let local = sf.local();
        let name = sf.text_name();
        quote! {
            #name => #local = Some(reader.read::<#ty>()?),
        }
    });
    let inits: Vec<_> = source_fields
        .iter()
        .map(|sf| {
            if sf.meta.skip {
                sf.field_init(skipped_value(sf))
            } else {
                let ty = &sf.field.ty;
                let local = sf.local();
                sf.field_init(quote! {
                    #local.unwrap_or_else(<#ty as twofold_core::Serializer>::default_value)
                })
            }
        })
        .collect();
    let construction = self_construction(fields, &inits);
    quote! {
        reader.begin_record()?;
        #(#declares)*
        while let Some(field) = reader.next_field()? {
            match field.as_str() {
                #(#arms)*
                _ => return Err(reader.unknown_field(&field)),
            }
        }
        Ok(#construction)
    }
}
