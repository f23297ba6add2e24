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

//! `Vec<E>` and fixed-size arrays.
//!
//! A vector of unmanaged elements is one raw block in binary; any other
//! vector is a count followed by each element through the value protocol.
//! Both are a `[ ... ]` list in text.

use std::any::Any;
use std::borrow::Cow;
use std::mem;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::serializer::{Blittable, Serializer};
use crate::text::{TextReader, TextWriter};
use crate::types::Shape;
use crate::util::{expect_input, fill_slot};

// Initial capacity is capped so a corrupt count cannot reserve huge buffers.
const MAX_PREALLOCATED: usize = 4096;

impl<E: Serializer> Serializer for Vec<E> {
    #[inline(always)]
    fn shape() -> Shape {
        Shape::array::<E>()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Owned(format!("{}[]", E::canonical_name()))
    }

    #[inline(always)]
    fn default_value() -> Self {
        Vec::new()
    }
}

pub(crate) fn write_raw<E: Serializer>(
    writer: &mut BinaryWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    let values = expect_input::<Vec<E>>(value)?;
    match E::shape().layout_of::<E>() {
        // SAFETY: the layout was built by `Shape::unmanaged::<E>()`.
        Some(_) => unsafe { writer.write_raw_slice(values) },
        None => write_elements::<E>(writer, value),
    }
}

pub(crate) fn read_raw<E: Serializer>(
    reader: &mut BinaryReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let values = match E::shape().layout_of::<E>() {
        // SAFETY: as above.
        Some(layout) => unsafe { reader.read_raw_vec::<E>(&layout)? },
        None => return read_elements::<E>(reader, slot),
    };
    fill_slot(slot, values)
}

pub(crate) fn write_elements<E: Serializer>(
    writer: &mut BinaryWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    let values = expect_input::<Vec<E>>(value)?;
    writer.write_len(values.len())?;
    for element in values {
        writer.write::<E>(element)?;
    }
    Ok(())
}

pub(crate) fn read_elements<E: Serializer>(
    reader: &mut BinaryReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let len = reader.read_len::<Vec<E>>()?;
    let mut values = Vec::with_capacity(len.min(MAX_PREALLOCATED));
    for _ in 0..len {
        values.push(reader.read::<E>()?);
    }
    fill_slot(slot, values)
}

pub(crate) fn write_text<E: Serializer>(
    writer: &mut TextWriter<'_>,
    value: &dyn Any,
) -> Result<(), Error> {
    write_list(writer, expect_input::<Vec<E>>(value)?)
}

pub(crate) fn read_text<E: Serializer>(
    reader: &mut TextReader<'_>,
    slot: &mut dyn Any,
) -> Result<(), Error> {
    let values = read_list::<E>(reader)?;
    fill_slot(slot, values)
}

fn write_list<E: Serializer>(writer: &mut TextWriter<'_>, values: &[E]) -> Result<(), Error> {
    writer.begin_list()?;
    for element in values {
        writer.write::<E>(element)?;
    }
    writer.end_list()
}

fn read_list<E: Serializer>(reader: &mut TextReader<'_>) -> Result<Vec<E>, Error> {
    reader.begin_list()?;
    let mut values = Vec::new();
    while reader.next_item()? {
        values.push(reader.read::<E>()?);
    }
    Ok(values)
}

// SAFETY: arrays have no padding between elements, and every element is
// checked with the element's own validation.
unsafe impl<T: Blittable, const N: usize> Blittable for [T; N] {
    fn bits_valid(bytes: &[u8]) -> bool {
        match mem::size_of::<T>() {
            0 => T::bits_valid(bytes),
            size => bytes.chunks_exact(size).all(T::bits_valid),
        }
    }
}

/// Fixed-size arrays of blittable elements are unmanaged: raw memory in
/// binary, a list of exactly `N` items in text.
impl<T: Blittable + Serializer, const N: usize> Serializer for [T; N] {
    #[inline(always)]
    fn shape() -> Shape {
        Shape::unmanaged::<[T; N]>()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Owned(format!("{}[{}]", T::canonical_name(), N))
    }

    fn default_value() -> Self {
        [T::default_value(); N]
    }

    fn write_text(&self, writer: &mut TextWriter<'_>) -> Result<(), Error> {
        write_list(writer, self)
    }

    fn read_text(reader: &mut TextReader<'_>) -> Result<Self, Error> {
        let line = reader.line();
        let values = read_list::<T>(reader)?;
        let len = values.len();
        values.try_into().map_err(|_| {
            Error::parse(line, format!("expected {N} items for {}, found {len}", Self::canonical_name()))
        })
    }
}
