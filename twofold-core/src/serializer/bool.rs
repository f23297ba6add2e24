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

use std::borrow::Cow;

use byteorder::{ByteOrder, NativeEndian};

use crate::error::Error;
use crate::serializer::{Blittable, Serializer};
use crate::text::{TextReader, TextWriter};
use crate::types::Shape;

// SAFETY: only 0 and 1 are accepted on read.
unsafe impl Blittable for bool {
    #[inline(always)]
    fn bits_valid(bytes: &[u8]) -> bool {
        matches!(bytes, [0] | [1])
    }
}

impl Serializer for bool {
    fn shape() -> Shape {
        Shape::unmanaged::<bool>()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("bool")
    }

    fn default_value() -> Self {
        false
    }

    fn write_text(&self, writer: &mut TextWriter<'_>) -> Result<(), Error> {
        writer.write_leaf(self)
    }

    fn read_text(reader: &mut TextReader<'_>) -> Result<Self, Error> {
        reader.read_parsed::<bool>()
    }
}

// SAFETY: surrogates and values above U+10FFFF are rejected on read.
unsafe impl Blittable for char {
    #[inline(always)]
    fn bits_valid(bytes: &[u8]) -> bool {
        bytes.len() == 4 && char::from_u32(NativeEndian::read_u32(bytes)).is_some()
    }
}

impl Serializer for char {
    fn shape() -> Shape {
        Shape::unmanaged::<char>()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("char")
    }

    fn default_value() -> Self {
        '\0'
    }

    fn write_text(&self, writer: &mut TextWriter<'_>) -> Result<(), Error> {
        let mut buf = [0u8; 4];
        writer.write_string(self.encode_utf8(&mut buf))
    }

    fn read_text(reader: &mut TextReader<'_>) -> Result<Self, Error> {
        let text = reader.read_string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::invalid_data(format!(
                "line {}: `{text}` is not a single character",
                reader.line()
            ))),
        }
    }
}
