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

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt::Display;
use std::io::{BufWriter, Write};

use crate::config::Config;
use crate::error::Error;
use crate::resolver::codec::TextCodec;
use crate::resolver::context::SerializationContext;
use crate::resolver::type_registry::TypeRegistry;
use crate::serializer::Serializer;
use crate::text::{quote, string_needs_quotes, token_needs_quotes};

/// Writes values as indented text.
///
/// Output is buffered; call [`TextWriter::finish`] to flush it. A writer
/// dropped without `finish` still flushes, but any error is lost.
pub struct TextWriter<'a> {
    out: BufWriter<&'a mut dyn Write>,
    context: Option<&'a SerializationContext>,
    pending_type_name: Option<Cow<'static, str>>,
    indent: usize,
    level: usize,
    line_start: bool,
}

impl<'a> TextWriter<'a> {
    pub fn new(
        stream: &'a mut dyn Write,
        context: Option<&'a SerializationContext>,
        config: &Config,
    ) -> Self {
        TextWriter {
            out: BufWriter::with_capacity(config.buffer_capacity(), stream),
            context,
            pending_type_name: None,
            indent: config.indent(),
            level: 0,
            line_start: true,
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
                return (marshal.text)(self, value as &dyn Any);
            }
        }
        self.write_value(value)
    }

    /// Writes the marker and payload of `value`, ignoring overrides for `T`.
    pub fn write_value<T: Serializer>(&mut self, value: &T) -> Result<(), Error> {
        if let Some(name) = self.pending_type_name.take() {
            self.write_type_name(&name)?;
        }
        if value.is_null() {
            return self.write_token("~");
        }
        let codec = TextCodec::<T>::get()?;
        if codec.is_sealed() {
            return codec.write(self, value);
        }
        match value.runtime_object() {
            Some(object) => {
                let (name, actions) = TypeRegistry::global().text_actions_for(object)?;
                self.write_type_marshalling(name);
                (actions.write)(self, object.as_any())
            }
            None => codec.write(self, value),
        }
    }

    /// Announces the type of the next value as `@name`.
    #[inline(always)]
    pub fn write_type_marshalling(&mut self, name: Cow<'static, str>) {
        self.pending_type_name = Some(name);
    }

    fn write_type_name(&mut self, name: &str) -> Result<(), Error> {
        if token_needs_quotes(name) {
            self.write_token(&format!("@{}", quote(name)))
        } else {
            self.write_token(&format!("@{name}"))
        }
    }

    /// Writes one token, separated from the previous one by a space or,
    /// at the start of a line, preceded by the indentation.
    pub fn write_token(&mut self, token: &str) -> Result<(), Error> {
        if self.line_start {
            let width = self.level * self.indent;
            write!(self.out, "{:width$}", "")?;
            self.line_start = false;
        } else {
            self.out.write_all(b" ")?;
        }
        self.out.write_all(token.as_bytes())?;
        Ok(())
    }

    pub fn end_line(&mut self) -> Result<(), Error> {
        if !self.line_start {
            self.out.write_all(b"\n")?;
            self.line_start = true;
        }
        Ok(())
    }

    /// Writes a number, boolean or other value through its `Display` form.
    pub fn write_leaf<D: Display>(&mut self, value: D) -> Result<(), Error> {
        self.write_token(&value.to_string())
    }

    /// Writes a string value, bare when it reads back unchanged, quoted
    /// otherwise. A bare string always ends its line.
    pub fn write_string(&mut self, value: &str) -> Result<(), Error> {
        if string_needs_quotes(value) {
            self.write_token(&quote(value))
        } else {
            self.write_token(value)?;
            self.end_line()
        }
    }

    /// Writes an identifier such as an enum variant name.
    pub fn write_symbol(&mut self, symbol: &str) -> Result<(), Error> {
        self.write_token(symbol)
    }

    pub fn begin_record(&mut self) -> Result<(), Error> {
        self.write_token("{")?;
        self.level += 1;
        self.end_line()
    }

    pub fn write_field_name(&mut self, name: &str) -> Result<(), Error> {
        self.end_line()?;
        self.write_token(name)
    }

    pub fn end_record(&mut self) -> Result<(), Error> {
        self.end_line()?;
        self.level = self.level.saturating_sub(1);
        self.write_token("}")
    }

    pub fn begin_list(&mut self) -> Result<(), Error> {
        self.write_token("[")?;
        self.level += 1;
        Ok(())
    }

    pub fn end_list(&mut self) -> Result<(), Error> {
        self.level = self.level.saturating_sub(1);
        self.write_token("]")
    }

    /// Ends the last line and flushes the buffer.
    pub fn finish(&mut self) -> Result<(), Error> {
        self.end_line()?;
        self.out.flush()?;
        Ok(())
    }
}
