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

use std::io::{BufRead, Read, Write};

use crate::binary::{BinaryReader, BinaryWriter};
use crate::config::Config;
use crate::error::Error;
use crate::resolver::context::SerializationContext;
use crate::serializer::Serializer;
use crate::text::{TextReader, TextWriter};

/// Entry point for the binary format.
///
/// A serializer holds only its [`Config`]; it is cheap to create and can be
/// shared between threads. Each call borrows the stream for its duration and
/// leaves it positioned right after the value.
///
/// # Examples
///
/// ```rust
/// use twofold_core::BinarySerializer;
///
/// let serializer = BinarySerializer::default();
/// let bytes = serializer.to_bytes(&vec![1i32, 2, 3]).unwrap();
/// let copy: Vec<i32> = serializer.from_bytes(&bytes).unwrap();
/// assert_eq!(copy, [1, 2, 3]);
/// ```
///
/// With a context that rewrites every `i32` as a string:
///
/// ```rust
/// use twofold_core::{BinarySerializer, SerializationContext};
///
/// let serializer = BinarySerializer::default();
/// let context = SerializationContext::new().marshal(|i: &i32| format!("value {i}"));
/// let bytes = serializer.to_bytes_with_context(&42i32, &context).unwrap();
/// let copy: String = serializer.from_bytes(&bytes).unwrap();
/// assert_eq!(copy, "value 42");
/// ```
#[derive(Clone, Debug, Default)]
pub struct BinarySerializer {
    config: Config,
}

impl BinarySerializer {
    /// Sets the maximum nesting of named (tag 2) values while reading.
    ///
    /// # Default
    ///
    /// The default value is `64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twofold_core::BinarySerializer;
    ///
    /// let serializer = BinarySerializer::default().max_dyn_depth(8);
    /// assert_eq!(serializer.config().max_dyn_depth(), 8);
    /// ```
    pub fn max_dyn_depth(mut self, max_dyn_depth: u32) -> Self {
        self.config.max_dyn_depth = max_dyn_depth;
        self
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Writes `value` to `stream`.
    pub fn serialize<T: Serializer, W: Write>(&self, stream: &mut W, value: &T) -> Result<(), Error> {
        BinaryWriter::new(stream, None).write(value)
    }

    /// Writes `value` to `stream` with the overrides of `context`.
    pub fn serialize_with_context<T: Serializer, W: Write>(
        &self,
        stream: &mut W,
        value: &T,
        context: &SerializationContext,
    ) -> Result<(), Error> {
        BinaryWriter::new(stream, Some(context)).write(value)
    }

    /// Reads a `T` from `stream`.
    pub fn deserialize<T: Serializer, R: Read>(&self, stream: &mut R) -> Result<T, Error> {
        BinaryReader::new(stream, None, &self.config).read()
    }

    /// Reads a `T` from `stream` with the overrides of `context`.
    pub fn deserialize_with_context<T: Serializer, R: Read>(
        &self,
        stream: &mut R,
        context: &SerializationContext,
    ) -> Result<T, Error> {
        BinaryReader::new(stream, Some(context), &self.config).read()
    }

    pub fn to_bytes<T: Serializer>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        self.serialize(&mut bytes, value)?;
        Ok(bytes)
    }

    pub fn to_bytes_with_context<T: Serializer>(
        &self,
        value: &T,
        context: &SerializationContext,
    ) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        self.serialize_with_context(&mut bytes, value, context)?;
        Ok(bytes)
    }

    /// Reads a `T` from the start of `bytes`. Trailing bytes are ignored.
    pub fn from_bytes<T: Serializer>(&self, mut bytes: &[u8]) -> Result<T, Error> {
        self.deserialize(&mut bytes)
    }

    pub fn from_bytes_with_context<T: Serializer>(
        &self,
        mut bytes: &[u8],
        context: &SerializationContext,
    ) -> Result<T, Error> {
        self.deserialize_with_context(&mut bytes, context)
    }
}

/// Entry point for the text format.
///
/// Same surface as [`BinarySerializer`], reading from any [`BufRead`].
/// Output goes through a buffer of [`Config::buffer_capacity`] bytes that is
/// flushed before each `serialize` call returns.
///
/// # Examples
///
/// ```rust
/// use twofold_core::TextSerializer;
///
/// let serializer = TextSerializer::default();
/// let text = serializer.to_text(&vec!["kikoo : / = lol".to_string()]).unwrap();
/// assert_eq!(text, "[ kikoo : / = lol\n]\n");
/// let copy: Vec<String> = serializer.from_text(&text).unwrap();
/// assert_eq!(copy, ["kikoo : / = lol"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TextSerializer {
    config: Config,
}

impl TextSerializer {
    /// Sets the maximum nesting of named (`@name`) values while reading.
    pub fn max_dyn_depth(mut self, max_dyn_depth: u32) -> Self {
        self.config.max_dyn_depth = max_dyn_depth;
        self
    }

    /// Sets the number of spaces per nesting level.
    ///
    /// # Default
    ///
    /// The default value is `2`.
    pub fn indent(mut self, indent: usize) -> Self {
        self.config.indent = indent;
        self
    }

    /// Sets the capacity of the output buffer.
    pub fn buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.config.buffer_capacity = buffer_capacity;
        self
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Writes `value` to `stream` and flushes the output buffer.
    pub fn serialize<T: Serializer, W: Write>(&self, stream: &mut W, value: &T) -> Result<(), Error> {
        let mut writer = TextWriter::new(stream, None, &self.config);
        writer.write(value)?;
        writer.finish()
    }

    pub fn serialize_with_context<T: Serializer, W: Write>(
        &self,
        stream: &mut W,
        value: &T,
        context: &SerializationContext,
    ) -> Result<(), Error> {
        let mut writer = TextWriter::new(stream, Some(context), &self.config);
        writer.write(value)?;
        writer.finish()
    }

    pub fn deserialize<T: Serializer, R: BufRead>(&self, stream: &mut R) -> Result<T, Error> {
        TextReader::new(stream, None, &self.config).read()
    }

    pub fn deserialize_with_context<T: Serializer, R: BufRead>(
        &self,
        stream: &mut R,
        context: &SerializationContext,
    ) -> Result<T, Error> {
        TextReader::new(stream, Some(context), &self.config).read()
    }

    pub fn to_text<T: Serializer>(&self, value: &T) -> Result<String, Error> {
        let mut bytes = Vec::new();
        self.serialize(&mut bytes, value)?;
        String::from_utf8(bytes).map_err(|_| Error::invalid_data("text output is not UTF-8"))
    }

    pub fn to_text_with_context<T: Serializer>(
        &self,
        value: &T,
        context: &SerializationContext,
    ) -> Result<String, Error> {
        let mut bytes = Vec::new();
        self.serialize_with_context(&mut bytes, value, context)?;
        String::from_utf8(bytes).map_err(|_| Error::invalid_data("text output is not UTF-8"))
    }

    pub fn from_text<T: Serializer>(&self, text: &str) -> Result<T, Error> {
        self.deserialize(&mut text.as_bytes())
    }

    pub fn from_text_with_context<T: Serializer>(
        &self,
        text: &str,
        context: &SerializationContext,
    ) -> Result<T, Error> {
        self.deserialize_with_context(&mut text.as_bytes(), context)
    }
}
