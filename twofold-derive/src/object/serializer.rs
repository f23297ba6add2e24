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
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{parse_quote, Data, DataStruct, DeriveInput, Fields};

use crate::object::{derive_enum, read, write};
use crate::util::{source_fields, SourceField};
use crate::TwofoldAttrs;

fn gen_canonical_name(ast: &DeriveInput, attrs: &TwofoldAttrs) -> TokenStream {
    let ident = ast.ident.unraw().to_string();
    if let Some(name) = &attrs.name {
        quote! { ::std::borrow::Cow::Borrowed(#name) }
    } else if ast.generics.type_params().next().is_some() {
        quote! { ::std::borrow::Cow::Borrowed(::std::any::type_name::<Self>()) }
    } else {
        quote! { ::std::borrow::Cow::Borrowed(concat!(module_path!(), "::", #ident)) }
    }
}

fn has_repr_c(ast: &DeriveInput) -> bool {
    ast.attrs
        .iter()
        .filter(|attr| attr.path().is_ident("repr"))
        .any(|attr| {
            let mut repr_c = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("C") {
                    repr_c = true;
                }
                Ok(())
            });
            repr_c
        })
}

fn check_text_names(source_fields: &[SourceField<'_>]) -> syn::Result<()> {
    let mut seen = std::collections::HashSet::new();
    for sf in source_fields.iter().filter(|sf| !sf.meta.skip) {
        if !seen.insert(sf.text_name()) {
            return Err(syn::Error::new_spanned(
                sf.field,
                format!("duplicate text field name `{}`", sf.text_name()),
            ));
        }
    }
    Ok(())
}

/// Compile-time layout checks and the `Blittable` impl of a
/// `#[twofold(blittable)]` struct.
fn gen_blittable(ast: &DeriveInput, source_fields: &[SourceField<'_>]) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    if !has_repr_c(ast) {
        return Err(syn::Error::new_spanned(
            name,
            "#[twofold(blittable)] requires #[repr(C)]",
        ));
    }
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "#[twofold(blittable)] types cannot be generic",
        ));
    }
    if let Some(sf) = source_fields.iter().find(|sf| sf.meta.skip) {
        return Err(syn::Error::new_spanned(
            sf.field,
            "fields of a #[twofold(blittable)] type cannot be skipped",
        ));
    }

    let tys: Vec<_> = source_fields.iter().map(|sf| &sf.field.ty).collect();
    let members: Vec<TokenStream> = source_fields
        .iter()
        .map(|sf| match &sf.field.ident {
            Some(ident) => ident.to_token_stream(),
            None => syn::Index::from(sf.index).to_token_stream(),
        })
        .collect();
    let padding_message = format!("{name} has padding bytes and cannot be blittable");

    Ok(quote! {
        const _: () = assert!(
            ::core::mem::size_of::<#name>() == 0 #(+ ::core::mem::size_of::<#tys>())*,
            #padding_message
        );

        unsafe impl twofold_core::Blittable for #name {
            fn bits_valid(bytes: &[u8]) -> bool {
                true #(&& {
                    let start = ::core::mem::offset_of!(#name, #members);
                    bytes
                        .get(start..start + ::core::mem::size_of::<#tys>())
                        .is_some_and(<#tys as twofold_core::Blittable>::bits_valid)
                })*
            }
        }
    })
}

fn gen_struct(
    ast: &DeriveInput,
    data: &DataStruct,
    attrs: &TwofoldAttrs,
    canonical_name: &TokenStream,
) -> syn::Result<TokenStream> {
    let name = &ast.ident;
    let fields: &Fields = &data.fields;
    let source_fields = source_fields(fields)?;
    check_text_names(&source_fields)?;

    let mut generics = ast.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(twofold_core::Serializer));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let (blittable_ts, shape_ts) = if attrs.blittable {
        (
            gen_blittable(ast, &source_fields)?,
            quote! { twofold_core::Shape::unmanaged::<Self>() },
        )
    } else {
        (quote! {}, quote! { twofold_core::Shape::managed() })
    };

    let default_ts = read::gen_default_value(fields, &source_fields);
    let write_fields_ts = write::gen_write_fields(&source_fields);
    let read_fields_ts = read::gen_read_fields(fields, &source_fields);
    let write_text_ts = write::gen_write_text(&source_fields);
    let read_text_ts = read::gen_read_text(fields, &source_fields);

    Ok(quote! {
        #blittable_ts

        impl #impl_generics twofold_core::Serializer for #name #ty_generics #where_clause {
            fn shape() -> twofold_core::Shape {
                #shape_ts
            }

            fn canonical_name() -> ::std::borrow::Cow<'static, str> {
                #canonical_name
            }

            fn default_value() -> Self {
                #default_ts
            }

            #[allow(unused_variables)]
            fn write_fields(&self, writer: &mut twofold_core::BinaryWriter<'_>) -> Result<(), twofold_core::Error> {
                #write_fields_ts
            }

            #[allow(unused_variables)]
            fn read_fields(reader: &mut twofold_core::BinaryReader<'_>) -> Result<Self, twofold_core::Error> {
                #read_fields_ts
            }

            fn write_text(&self, writer: &mut twofold_core::TextWriter<'_>) -> Result<(), twofold_core::Error> {
                #write_text_ts
            }

            fn read_text(reader: &mut twofold_core::TextReader<'_>) -> Result<Self, twofold_core::Error> {
                #read_text_ts
            }
        }
    })
}

pub fn derive_serializer(ast: &DeriveInput, attrs: TwofoldAttrs) -> syn::Result<TokenStream> {
    let canonical_name = gen_canonical_name(ast, &attrs);
    match &ast.data {
        Data::Struct(data) => gen_struct(ast, data, &attrs, &canonical_name),
        Data::Enum(data) => derive_enum::gen_enum(ast, data, &canonical_name),
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "TwofoldObject does not support unions",
        )),
    }
}
