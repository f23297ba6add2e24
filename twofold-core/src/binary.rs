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

//! Binary stream adapter.
//!
//! Every value is framed by one [`ValueTag`] byte. Lengths are `i32` and raw
//! memory is copied in host byte order, so a stream is only portable between
//! hosts of the same endianness.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::io::{Read, Write};
use std::mem::{self, MaybeUninit};
use std::{ptr, slice};

use byteorder::{ByteOrder, NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::config::Config;
use crate::ensure;
use crate::error::Error;
use crate::resolver::codec::BinaryCodec;
use crate::resolver::context::SerializationContext;
use crate::resolver::type_registry::TypeRegistry;
use crate::serializer::Serializer;
use crate::types::{Layout, ValueTag};

/// Writes values to a byte stream.
pub struct BinaryWriter<'a> {
    stream: &'a mut dyn Write,
    context: Option<&'a SerializationContext>,
    pending_type_name: Option<Cow<'static, str>>,
}

impl<'a> BinaryWriter<'a> {
    pub fn new(stream: &'a mut dyn Write, context: Option<&'a SerializationContext>) -> Self {
        BinaryWriter {
            stream,
            context,
            pending_type_name: None,
        }
    }

    #[inline(always)]
    pub fn context(&self) -> Option<&'a SerializationContext> {
        self.context
    }

    /// Writes `value` as its declared type `T`, applying the context's
    /// marshal override for `T` if there is one.
    pub fn write<T: Serializer>(&mut self, value: &T) -> Result<(), Error> {
        if let Some(context) = self.context {
            if let Some(marshal) = context.marshal_for(TypeId::of::<T>()) {
                return (marshal.binary)(self, value as &dyn Any);
            }
        }
        self.write_value(value)
    }

    /// Writes the tag and payload of `value`, ignoring overrides for `T`.
    pub fn write_value<T: Serializer>(&mut self, value: &T) -> Result<(), Error> {
        if let Some(name) = self.pending_type_name.take() {
            self.write_tag(ValueTag::Named)?;
            self.write_string(&name)?;
        }
        if value.is_null() {
            return self.write_tag(ValueTag::Null);
        }
        let codec = BinaryCodec::<T>::get()?;
        if codec.is_sealed() {
            self.write_tag(ValueTag::Exact)?;
            return codec.write(self, value);
        }
        match value.runtime_object() {
            Some(object) => {
                let (name, actions) = TypeRegistry::global().binary_actions_for(object)?;
                self.write_type_marshalling(name);
                (actions.write)(self, object.as_any())
            }
            None => codec.write(self, value),
        }
    }

    /// Announces the type of the next value. The next value write emits a
    /// tag-2 frame with this name; a later announcement replaces an earlier
    /// one that has not been written yet.
    #[inline(always)]
    pub fn write_type_marshalling(&mut self, name: Cow<'static, str>) {
        self.pending_type_name = Some(name);
    }

    #[inline(always)]
    pub fn write_tag(&mut self, tag: ValueTag) -> Result<(), Error> {
        self.stream.write_u8(tag as u8)?;
        Ok(())
    }

    pub fn write_len(&mut self, len: usize) -> Result<(), Error> {
        let len = i32::try_from(len)
            .map_err(|_| Error::invalid_data(format!("length {len} does not fit in an i32")))?;
        self.stream.write_i32::<NativeEndian>(len)?;
        Ok(())
    }

    /// UTF-16 code-unit count followed by the units.
    pub fn write_string(&mut self, value: &str) -> Result<(), Error> {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_len(units.len())?;
        if units.is_empty() {
            return Ok(());
        }
        let mut bytes = vec![0u8; units.len() * 2];
        NativeEndian::write_u16_into(&units, &mut bytes);
        self.stream.write_all(&bytes)?;
        Ok(())
    }

    /// Copies the memory of `value` to the stream.
    ///
    /// # Safety
    ///
    /// `V` must be [`Blittable`](crate::serializer::Blittable).
    pub(crate) unsafe fn write_raw<V>(&mut self, value: &V) -> Result<(), Error> {
        let bytes = slice::from_raw_parts((value as *const V).cast::<u8>(), mem::size_of::<V>());
        self.stream.write_all(bytes)?;
        Ok(())
    }

    /// Element count followed by the memory of `values` as one block.
    ///
    /// # Safety
    ///
    /// `V` must be [`Blittable`](crate::serializer::Blittable).
    pub(crate) unsafe fn write_raw_slice<V>(&mut self, values: &[V]) -> Result<(), Error> {
        self.write_len(values.len())?;
        let bytes = slice::from_raw_parts(values.as_ptr().cast::<u8>(), mem::size_of_val(values));
        self.stream.write_all(bytes)?;
        Ok(())
    }
}

/// Reads values from a byte stream.
pub struct BinaryReader<'a> {
    stream: &'a mut dyn Read,
    context: Option<&'a SerializationContext>,
    max_dyn_depth: u32,
    depth: u32,
}

impl<'a> BinaryReader<'a> {
    pub fn new(
        stream: &'a mut dyn Read,
        context: Option<&'a SerializationContext>,
        config: &Config,
    ) -> Self {
        BinaryReader {
            stream,
            context,
            max_dyn_depth: config.max_dyn_depth(),
            depth: 0,
        }
    }

    #[inline(always)]
    pub fn context(&self) -> Option<&'a SerializationContext> {
        self.context
    }

    /// Reads a value of declared type `T`, applying the context's unmarshal
    /// override for `T` if its output is accepted by `T`.
    pub fn read<T: Serializer>(&mut self) -> Result<T, Error> {
        if let Some(context) = self.context {
            if let Some(unmarshal) = context.unmarshal_for::<T>(TypeId::of::<T>()) {
                return T::from_object((unmarshal.binary)(self)?);
            }
        }
        self.read_value()
    }

    /// Reads the tag and payload of a `T`, ignoring overrides for `T`.
    pub fn read_value<T: Serializer>(&mut self) -> Result<T, Error> {
        match self.read_tag::<T>()? {
            ValueTag::Null => Ok(T::default_value()),
            ValueTag::Exact => BinaryCodec::<T>::get()?.read(self),
            ValueTag::Named => {
                let name = self.read_string()?;
                self.read_named(&name)
            }
        }
    }

    /// Reads a value announced as type `name` and converts it to `T`.
    pub fn read_named<T: Serializer>(&mut self, name: &str) -> Result<T, Error> {
        ensure!(
            self.depth < self.max_dyn_depth,
            Error::depth_exceed(format!(
                "named values nested deeper than {} while reading {}",
                self.max_dyn_depth,
                T::canonical_name()
            ))
        );
        let actions = TypeRegistry::global().binary_actions(name)?;
        self.depth += 1;
        let result = (|| {
            if let Some(context) = self.context {
                if let Some(unmarshal) = context.unmarshal_for::<T>(actions.type_id) {
                    return T::from_object((unmarshal.binary)(self)?);
                }
            }
            if actions.type_id == TypeId::of::<T>() {
                return self.read::<T>();
            }
            T::from_object((actions.read)(self)?)
        })();
        self.depth -= 1;
        result
    }

    fn read_tag<T: Serializer>(&mut self) -> Result<ValueTag, Error> {
        let byte = self
            .stream
            .read_u8()
            .map_err(|err| Error::from_read(err, T::canonical_name()))?;
        ValueTag::try_from(byte)
    }

    /// Reads an element or unit count for a `T`.
    pub fn read_len<T: Serializer>(&mut self) -> Result<usize, Error> {
        let len = self
            .stream
            .read_i32::<NativeEndian>()
            .map_err(|err| Error::from_read(err, T::canonical_name()))?;
        ensure!(len >= 0, "negative length {} for {}", len, T::canonical_name());
        Ok(len as usize)
    }

    pub fn read_string(&mut self) -> Result<String, Error> {
        let len = self.read_len::<String>()?;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.read_block::<String>(len * 2)?;
        let mut units = vec![0u16; len];
        NativeEndian::read_u16_into(&bytes, &mut units);
        String::from_utf16(&units).map_err(|_| Error::invalid_data("string is not valid UTF-16"))
    }

    /// Reads exactly `len` bytes without trusting `len` for the allocation.
    fn read_block<T: Serializer>(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        (&mut *self.stream)
            .take(len as u64)
            .read_to_end(&mut bytes)
            .map_err(|err| Error::from_read(err, T::canonical_name()))?;
        if bytes.len() < len {
            return Err(Error::end_of_stream(T::canonical_name()));
        }
        Ok(bytes)
    }

    /// Reads one value of `V` as raw memory.
    ///
    /// # Safety
    ///
    /// `layout` must have been built by `Shape::unmanaged::<V>()`.
    pub(crate) unsafe fn read_raw<V: Serializer>(&mut self, layout: &Layout) -> Result<V, Error> {
        let mut value = MaybeUninit::<V>::zeroed();
        let bytes = slice::from_raw_parts_mut(value.as_mut_ptr().cast::<u8>(), mem::size_of::<V>());
        self.stream
            .read_exact(bytes)
            .map_err(|err| Error::from_read(err, V::canonical_name()))?;
        ensure!(
            (layout.validate)(bytes),
            "invalid bit pattern for {}",
            V::canonical_name()
        );
        Ok(value.assume_init())
    }

    /// Reads an element count and that many `E` as one block of raw memory.
    ///
    /// # Safety
    ///
    /// `layout` must have been built by `Shape::unmanaged::<E>()`.
    pub(crate) unsafe fn read_raw_vec<E: Serializer>(
        &mut self,
        layout: &Layout,
    ) -> Result<Vec<E>, Error> {
        let len = self.read_len::<Vec<E>>()?;
        let size = mem::size_of::<E>();
        if size == 0 {
            ensure!((layout.validate)(&[]), "invalid bit pattern for {}", E::canonical_name());
            return Ok((0..len)
                .map(|_| unsafe { MaybeUninit::<E>::zeroed().assume_init() })
                .collect());
        }
        let total = len
            .checked_mul(size)
            .ok_or_else(|| Error::invalid_data(format!("{len} elements overflow a block")))?;
        let bytes = self.read_block::<Vec<E>>(total)?;
        bytes
            .chunks_exact(size)
            .map(|chunk| {
                ensure!(
                    (layout.validate)(chunk),
                    "invalid bit pattern for {}",
                    E::canonical_name()
                );
                Ok(unsafe { ptr::read_unaligned(chunk.as_ptr().cast::<E>()) })
            })
            .collect()
    }
}
