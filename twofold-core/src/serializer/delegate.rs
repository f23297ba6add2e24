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

//! `Option<T>` and `Box<T>`, which reuse the codec of `T`.
//!
//! The tag of a wrapped value is written once, for the wrapper: `None` is
//! tag 0, and a present value is framed exactly like a `T`.

use std::any::{Any, TypeId};
use std::borrow::Cow;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::resolver::codec::{BinaryCodec, TextCodec};
use crate::serializer::{Object, Serializer};
use crate::text::{TextReader, TextWriter};
use crate::types::Shape;
use crate::util::{expect_input, fill_slot};

impl<T: Serializer> Serializer for Option<T> {
    #[inline(always)]
    fn shape() -> Shape {
        Shape::nullable::<T>()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Owned(format!("{}?", T::canonical_name()))
    }

    #[inline(always)]
    fn default_value() -> Self {
        None
    }

    #[inline(always)]
    fn is_null(&self) -> bool {
        self.is_none()
    }

    #[inline(always)]
    fn runtime_object(&self) -> Option<&dyn Object> {
        self.as_ref().and_then(T::runtime_object)
    }

    fn from_object(object: Box<dyn Object>) -> Result<Self, Error> {
        if (*object).is::<Self>() {
            let value = object
                .into_any()
                .downcast::<Self>()
                .map_err(|_| Error::invalid_operation("downcast failed"))?;
            return Ok(*value);
        }
        T::from_object(object).map(Some)
    }

    #[inline(always)]
    fn accepts(type_id: TypeId) -> bool {
        type_id == TypeId::of::<Self>() || T::accepts(type_id)
    }
}

/// `None` never reaches the payload procedures: it is framed as tag 0.
#[cold]
fn absent<T: Serializer>() -> Error {
    Error::invalid_operation(format!(
        "{} has no value to write",
        Option::<T>::canonical_name()
    ))
}

pub(crate) fn write_option<T: Serializer>(
    writer: &mut BinaryWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    match expect_input::<Option<T>>(value)? {
        Some(inner) => BinaryCodec::<T>::get()?.write(writer, inner),
        None => Err(absent::<T>()),
    }
}

pub(crate) fn read_option<T: Serializer>(
    reader: &mut BinaryReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let inner = BinaryCodec::<T>::get()?.read(reader)?;
    fill_slot(slot, Some(inner))
}

pub(crate) fn write_option_text<T: Serializer>(
    writer: &mut TextWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    match expect_input::<Option<T>>(value)? {
        Some(inner) => TextCodec::<T>::get()?.write(writer, inner),
        None => Err(absent::<T>()),
    }
}

pub(crate) fn read_option_text<T: Serializer>(
    reader: &mut TextReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let inner = TextCodec::<T>::get()?.read(reader)?;
    fill_slot(slot, Some(inner))
}

/// `Option<Option<U>>` and deeper: the inner value goes through the full
/// value protocol, so an inner `None` gets its own tag 0.
pub(crate) fn write_nested_option<T: Serializer>(
    writer: &mut BinaryWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    match expect_input::<Option<T>>(value)? {
        Some(inner) => writer.write::<T>(inner),
        None => Err(absent::<T>()),
    }
}

pub(crate) fn read_nested_option<T: Serializer>(
    reader: &mut BinaryReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let inner = reader.read::<T>()?;
    fill_slot(slot, Some(inner))
}

/// The text format has a single `~` token, so a present but null inner value
/// cannot be told apart from an absent one and is refused.
pub(crate) fn write_nested_option_text<T: Serializer>(
    writer: &mut TextWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    match expect_input::<Option<T>>(value)? {
        Some(inner) if inner.is_null() => Err(Error::invalid_operation(format!(
            "a present null {} has no text form",
            Option::<T>::canonical_name()
        ))),
        Some(inner) => writer.write::<T>(inner),
        None => Err(absent::<T>()),
    }
}

pub(crate) fn read_nested_option_text<T: Serializer>(
    reader: &mut TextReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let inner = reader.read::<T>()?;
    fill_slot(slot, Some(inner))
}

impl<T: Serializer> Serializer for Box<T> {
    #[inline(always)]
    fn shape() -> Shape {
        Shape::boxed::<T>()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Owned(format!("Box<{}>", T::canonical_name()))
    }

    fn default_value() -> Self {
        Box::new(T::default_value())
    }

    #[inline(always)]
    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    #[inline(always)]
    fn runtime_object(&self) -> Option<&dyn Object> {
        (**self).runtime_object()
    }

    fn from_object(object: Box<dyn Object>) -> Result<Self, Error> {
        if (*object).is::<Self>() {
            let value = object
                .into_any()
                .downcast::<Self>()
                .map_err(|_| Error::invalid_operation("downcast failed"))?;
            return Ok(*value);
        }
        T::from_object(object).map(Box::new)
    }

    #[inline(always)]
    fn accepts(type_id: TypeId) -> bool {
        type_id == TypeId::of::<Self>() || T::accepts(type_id)
    }
}

pub(crate) fn write_box<T: Serializer>(
    writer: &mut BinaryWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    let boxed = expect_input::<Box<T>>(value)?;
    BinaryCodec::<T>::get()?.write(writer, boxed)
}

pub(crate) fn read_box<T: Serializer>(
    reader: &mut BinaryReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let inner = BinaryCodec::<T>::get()?.read(reader)?;
    fill_slot(slot, Box::new(inner))
}

pub(crate) fn write_box_text<T: Serializer>(
    writer: &mut TextWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    let boxed = expect_input::<Box<T>>(value)?;
    TextCodec::<T>::get()?.write(writer, boxed)
}

pub(crate) fn read_box_text<T: Serializer>(
    reader: &mut TextReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let inner = TextCodec::<T>::get()?.read(reader)?;
    fill_slot(slot, Box::new(inner))
}
