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

use crate::util::SourceField;

/// Binary payload of a managed struct: every field through the value
/// protocol, in declaration order.
pub fn gen_write_fields(source_fields: &[SourceField<'_>]) -> TokenStream {
    let writes = source_fields.iter().filter(|sf| !sf.meta.skip).map(|sf| {
        let ty = &sf.field.ty;
        let access = sf.access();
        quote! {
            writer.write::<#ty>(&#access)?;
        }
    });
    quote! {
        #(#writes)*
        Ok(())
    }
}

/// Text payload: `{ name value ... }` in declaration order.
pub fn gen_write_text(source_fields: &[SourceField<'_>]) -> TokenStream {
    let writes = source_fields.iter().filter(|sf| !sf.meta.skip).map(|sf| {
        let ty = &sf.field.ty;
        let access = sf.access();
        let name = sf.text_name();
        quote! {
            writer.write_field_name(#name)?;
            writer.write::<#ty>(&#access)?;
        }
    });
    quote! {
        writer.begin_record()?;
        #(#writes)*
        writer.end_record()
    }
}
