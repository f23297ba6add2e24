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

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields};

const INT_REPRS: &[&str] = &[
    "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize",
];

/// The integer type named by `#[repr(...)]`.
fn int_repr(ast: &DeriveInput) -> Option<Ident> {
    let mut found = None;
    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident() {
                if INT_REPRS.contains(&ident.to_string().as_str()) {
                    found = Some(ident.clone());
                }
            }
            Ok(())
        });
    }
    found
}

/// Fieldless enums are blittable through their discriminant and written
/// as the variant name in text.
pub fn gen_enum(
    ast: &DeriveInput,
    data_enum: &DataEnum,
    canonical_name: &TokenStream,
) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "TwofoldObject enums cannot be generic",
        ));
    }
    if let Some(variant) = data_enum
        .variants
        .iter()
        .find(|v| !matches!(v.fields, Fields::Unit))
    {
        return Err(syn::Error::new_spanned(
            variant,
            "TwofoldObject only supports fieldless enums",
        ));
    }
    let Some(first) = data_enum.variants.first() else {
        return Err(syn::Error::new_spanned(
            name,
            "TwofoldObject enums need at least one variant",
        ));
    };
    let Some(repr) = int_repr(ast) else {
        return Err(syn::Error::new_spanned(
            name,
            "TwofoldObject enums need an integer #[repr], e.g. #[repr(u8)]",
        ));
    };

    let default_variant = &first.ident;
    let variants: Vec<_> = data_enum.variants.iter().map(|v| &v.ident).collect();
    let symbols: Vec<_> = variants.iter().map(|v| v.to_string()).collect();

    Ok(quote! {
        unsafe impl twofold_core::Blittable for #name {
            fn bits_valid(bytes: &[u8]) -> bool {
                match <[u8; ::core::mem::size_of::<#repr>()]>::try_from(bytes) {
                    Ok(raw) => {
                        let discriminant = #repr::from_ne_bytes(raw);
                        #(discriminant == #name::#variants as #repr)||*
                    }
                    Err(_) => false,
                }
            }
        }

        impl twofold_core::Serializer for #name {
            fn shape() -> twofold_core::Shape {
                twofold_core::Shape::unmanaged::<Self>()
            }

            fn canonical_name() -> ::std::borrow::Cow<'static, str> {
                #canonical_name
            }

            fn default_value() -> Self {
                #name::#default_variant
            }

            fn write_text(&self, writer: &mut twofold_core::TextWriter<'_>) -> Result<(), twofold_core::Error> {
                let symbol = match self {
                    #(#name::#variants => #symbols,)*
                };
                writer.write_symbol(symbol)
            }

            fn read_text(reader: &mut twofold_core::TextReader<'_>) -> Result<Self, twofold_core::Error> {
                let symbol = reader.read_symbol()?;
                match symbol.as_str() {
                    #(#symbols => Ok(#name::#variants),)*
                    _ => Err(twofold_core::Error::invalid_data(format!(
                        "unknown variant {} of {}",
                        symbol,
                        <Self as twofold_core::Serializer>::canonical_name()
                    ))),
                }
            }
        }
    })
}
