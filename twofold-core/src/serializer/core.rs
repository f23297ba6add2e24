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

use std::any::TypeId;
use std::borrow::Cow;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::serializer::Object;
use crate::text::{TextReader, TextWriter};
use crate::types::Shape;

/// Core trait for every type twofold can write and read.
///
/// An implementation describes the type statically ([`shape`], [`canonical_name`])
/// and supplies the payload procedures its category needs:
///
/// - `Unmanaged`: nothing for binary (raw memory), [`write_text`]/[`read_text`]
///   for the text format.
/// - `Managed`: [`write_fields`]/[`read_fields`] and [`write_text`]/[`read_text`].
/// - strings, arrays, options, boxes, type handles and trait objects are
///   handled by the codec cache from their shape alone.
///
/// User types get all of this from `#[derive(TwofoldObject)]`.
///
/// [`shape`]: Serializer::shape
/// [`canonical_name`]: Serializer::canonical_name
/// [`write_fields`]: Serializer::write_fields
/// [`read_fields`]: Serializer::read_fields
/// [`write_text`]: Serializer::write_text
/// [`read_text`]: Serializer::read_text
pub trait Serializer: Send + Sync + Sized + 'static {
    /// Structural description used to classify the type.
    fn shape() -> Shape;

    /// Stable name identifying this type in tag-2 frames.
    fn canonical_name() -> Cow<'static, str>;

    /// Value produced when a tag-0 frame is read.
    fn default_value() -> Self;

    /// Whether this value is framed as tag 0.
    #[inline(always)]
    fn is_null(&self) -> bool {
        false
    }

    /// The concrete value behind a polymorphic (non-sealed) value.
    #[inline(always)]
    fn runtime_object(&self) -> Option<&dyn Object> {
        None
    }

    /// Converts a value read through tag-2 dispatch into `Self`.
    fn from_object(object: Box<dyn Object>) -> Result<Self, Error> {
        let name = (*object).object_type_name();
        match object.into_any().downcast::<Self>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(Error::invalid_operation(format!(
                "a value of type {} cannot be read as {}",
                name,
                Self::canonical_name()
            ))),
        }
    }

    /// Whether values of the type `type_id` can be turned into `Self` by
    /// [`Serializer::from_object`].
    #[inline(always)]
    fn accepts(type_id: TypeId) -> bool {
        type_id == TypeId::of::<Self>()
    }

    /// Binary payload of a managed value.
    fn write_fields(&self, writer: &mut BinaryWriter<'_>) -> Result<(), Error> {
        let _ = writer;
        Err(Error::invalid_operation(format!(
            "{} has no binary field layout",
            Self::canonical_name()
        )))
    }

    fn read_fields(reader: &mut BinaryReader<'_>) -> Result<Self, Error> {
        let _ = reader;
        Err(Error::invalid_operation(format!(
            "{} has no binary field layout",
            Self::canonical_name()
        )))
    }

    /// Text payload of an unmanaged or managed value.
    fn write_text(&self, writer: &mut TextWriter<'_>) -> Result<(), Error> {
        let _ = writer;
        Err(Error::invalid_operation(format!(
            "{} has no text form",
            Self::canonical_name()
        )))
    }

    fn read_text(reader: &mut TextReader<'_>) -> Result<Self, Error> {
        let _ = reader;
        Err(Error::invalid_operation(format!(
            "{} has no text form",
            Self::canonical_name()
        )))
    }
}

/// Types whose values can be copied to and from a stream as raw memory.
///
/// # Safety
///
/// Implementors must contain no pointers, references or owned heap data,
/// must have no padding bytes, and every byte pattern of
/// `size_of::<Self>()` bytes accepted by [`Blittable::bits_valid`] must be a
/// valid value. `#[derive(TwofoldObject)]` with `#[twofold(blittable)]`
/// checks all of this at compile time.
pub unsafe trait Blittable: Copy + Send + Sync + 'static {
    /// Whether `bytes` (exactly `size_of::<Self>()` long) is a valid value.
    #[inline(always)]
    fn bits_valid(bytes: &[u8]) -> bool {
        let _ = bytes;
        true
    }
}
