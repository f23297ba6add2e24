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

use std::any::{type_name, TypeId};
use std::io::BufRead;
use std::str::FromStr;

use crate::config::Config;
use crate::ensure;
use crate::error::Error;
use crate::resolver::codec::TextCodec;
use crate::resolver::context::SerializationContext;
use crate::resolver::type_registry::TypeRegistry;
use crate::serializer::Serializer;
use crate::text::{is_delimiter, NAME_MARKER, NULL_MARKER, QUOTE};

/// Reads values from text.
///
/// Whitespace and `//` comments are skipped between tokens. Errors in the
/// token structure are reported as [`Error::Parse`] with the 1-based line.
pub struct TextReader<'a> {
    input: &'a mut dyn BufRead,
    // One byte consumed from `input` and handed back, used to look two
    // bytes ahead for `//`.
    pushback: Option<u8>,
    line: usize,
    context: Option<&'a SerializationContext>,
    max_dyn_depth: u32,
    depth: u32,
}

impl<'a> TextReader<'a> {
    pub fn new(
        input: &'a mut dyn BufRead,
        context: Option<&'a SerializationContext>,
        config: &Config,
    ) -> Self {
        TextReader {
            input,
            pushback: None,
            line: 1,
            context,
            max_dyn_depth: config.max_dyn_depth(),
            depth: 0,
        }
    }

    #[inline(always)]
    pub fn context(&self) -> Option<&'a SerializationContext> {
        self.context
    }

    /// Line of the next unread byte, starting at 1.
    #[inline(always)]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads a value of declared type `T`, applying the context's unmarshal
    /// override for `T` if its output is accepted by `T`.
    pub fn read<T: Serializer>(&mut self) -> Result<T, Error> {
        if let Some(context) = self.context {
            if let Some(unmarshal) = context.unmarshal_for::<T>(TypeId::of::<T>()) {
                return T::from_object((unmarshal.text)(self)?);
            }
        }
        self.read_value()
    }

    /// Reads the marker and payload of a `T`, ignoring overrides for `T`.
    pub fn read_value<T: Serializer>(&mut self) -> Result<T, Error> {
        self.skip_trivia()?;
        match self.peek()? {
            None => Err(Error::end_of_stream(T::canonical_name())),
            Some(NULL_MARKER) => {
                self.bump()?;
                Ok(T::default_value())
            }
            Some(NAME_MARKER) => {
                self.bump()?;
                let name = match self.peek()? {
                    Some(QUOTE) => self.read_quoted()?,
                    _ => self.read_token()?,
                };
                ensure!(!name.is_empty(), Error::parse(self.line, "missing type name after `@`"));
                self.read_named(&name)
            }
            Some(_) => TextCodec::<T>::get()?.read(self),
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
        let actions = TypeRegistry::global().text_actions(name)?;
        self.depth += 1;
        let result = (|| {
            if let Some(context) = self.context {
                if let Some(unmarshal) = context.unmarshal_for::<T>(actions.type_id) {
                    return T::from_object((unmarshal.text)(self)?);
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

    /// Reads a string value: a quoted string, or bare text up to the end of
    /// the line or the next `//`, without trailing whitespace.
    pub fn read_string(&mut self) -> Result<String, Error> {
        self.skip_trivia()?;
        match self.peek()? {
            None => Err(Error::end_of_stream("string")),
            Some(QUOTE) => self.read_quoted(),
            Some(byte @ (b'{' | b'}' | b'[' | b']')) => Err(Error::parse(
                self.line,
                format!("expected a string, found `{}`", byte as char),
            )),
            Some(_) => self.read_rest_of_line(),
        }
    }

    /// Reads a token and parses it with `FromStr`.
    pub fn read_parsed<P: FromStr>(&mut self) -> Result<P, Error> {
        self.skip_trivia()?;
        let line = self.line;
        let token = self.read_token()?;
        if token.is_empty() {
            return match self.peek()? {
                None => Err(Error::end_of_stream(type_name::<P>())),
                Some(byte) => Err(Error::parse(
                    line,
                    format!("expected {}, found `{}`", type_name::<P>(), byte as char),
                )),
            };
        }
        token.parse().map_err(|_| {
            Error::invalid_data(format!(
                "line {line}: `{token}` is not a valid {}",
                type_name::<P>()
            ))
        })
    }

    /// Reads an identifier such as an enum variant name.
    pub fn read_symbol(&mut self) -> Result<String, Error> {
        self.skip_trivia()?;
        let token = self.read_token()?;
        ensure!(!token.is_empty(), Error::parse(self.line, "expected a name"));
        Ok(token)
    }

    pub fn begin_record(&mut self) -> Result<(), Error> {
        self.expect(b'{')
    }

    /// Next field name of the current record, or `None` once its closing
    /// `}` has been consumed.
    pub fn next_field(&mut self) -> Result<Option<String>, Error> {
        self.skip_trivia()?;
        match self.peek()? {
            None => Err(Error::parse(self.line, "unterminated record")),
            Some(b'}') => {
                self.bump()?;
                Ok(None)
            }
            Some(byte) if is_delimiter(byte) || byte == NAME_MARKER || byte == NULL_MARKER => {
                Err(Error::parse(
                    self.line,
                    format!("expected a field name or `}}`, found `{}`", byte as char),
                ))
            }
            Some(_) => Ok(Some(self.read_token()?)),
        }
    }

    /// Error for a field name the record type does not have.
    #[cold]
    pub fn unknown_field(&self, name: &str) -> Error {
        Error::parse(self.line, format!("unknown field `{name}`"))
    }

    pub fn begin_list(&mut self) -> Result<(), Error> {
        self.expect(b'[')
    }

    /// Whether another item precedes the closing `]`, which is consumed.
    pub fn next_item(&mut self) -> Result<bool, Error> {
        self.skip_trivia()?;
        match self.peek()? {
            None => Err(Error::parse(self.line, "unterminated list")),
            Some(b']') => {
                self.bump()?;
                Ok(false)
            }
            Some(_) => Ok(true),
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), Error> {
        self.skip_trivia()?;
        match self.peek()? {
            Some(byte) if byte == expected => {
                self.bump()?;
                Ok(())
            }
            Some(byte) => Err(Error::parse(
                self.line,
                format!("expected `{}`, found `{}`", expected as char, byte as char),
            )),
            None => Err(Error::parse(
                self.line,
                format!("expected `{}`, found end of input", expected as char),
            )),
        }
    }

    fn peek(&mut self) -> Result<Option<u8>, Error> {
        if self.pushback.is_some() {
            return Ok(self.pushback);
        }
        Ok(self.input.fill_buf()?.first().copied())
    }

    fn bump(&mut self) -> Result<Option<u8>, Error> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        let byte = self.input.fill_buf()?.first().copied();
        if let Some(byte) = byte {
            self.input.consume(1);
            if byte == b'\n' {
                self.line += 1;
            }
        }
        Ok(byte)
    }

    /// Consumes a `/` and reports whether it starts a `//` comment. If it
    /// does, the `/` is handed back so the comment can be skipped.
    fn at_comment(&mut self) -> Result<bool, Error> {
        self.bump()?;
        let comment = self.peek()? == Some(b'/');
        if comment {
            self.pushback = Some(b'/');
        }
        Ok(comment)
    }

    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            match self.peek()? {
                Some(byte) if byte.is_ascii_whitespace() => {
                    self.bump()?;
                }
                Some(b'/') => {
                    if !self.at_comment()? {
                        self.pushback = Some(b'/');
                        return Ok(());
                    }
                    while let Some(byte) = self.bump()? {
                        if byte == b'\n' {
                            break;
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Bare token up to whitespace, a structural byte, a quote or `//`.
    fn read_token(&mut self) -> Result<String, Error> {
        let mut bytes = Vec::new();
        while let Some(byte) = self.peek()? {
            if is_delimiter(byte) {
                break;
            }
            if byte == b'/' {
                if self.at_comment()? {
                    break;
                }
                bytes.push(b'/');
                continue;
            }
            bytes.push(byte);
            self.bump()?;
        }
        self.utf8(bytes)
    }

    fn read_rest_of_line(&mut self) -> Result<String, Error> {
        let mut bytes = Vec::new();
        while let Some(byte) = self.peek()? {
            if byte == b'\n' {
                break;
            }
            if byte == b'/' {
                if self.at_comment()? {
                    break;
                }
                bytes.push(b'/');
                continue;
            }
            bytes.push(byte);
            self.bump()?;
        }
        let mut text = self.utf8(bytes)?;
        text.truncate(text.trim_end_matches(|c: char| c.is_ascii_whitespace()).len());
        Ok(text)
    }

    /// Quoted string; the opening quote has not been consumed yet.
    fn read_quoted(&mut self) -> Result<String, Error> {
        let start = self.line;
        self.bump()?;
        let mut bytes = Vec::new();
        loop {
            match self.bump()? {
                None => return Err(Error::parse(start, "unterminated quoted string")),
                Some(QUOTE) if self.peek()? == Some(QUOTE) => {
                    self.bump()?;
                    bytes.push(QUOTE);
                }
                Some(QUOTE) => break,
                Some(byte) => bytes.push(byte),
            }
        }
        self.utf8(bytes)
    }

    fn utf8(&self, bytes: Vec<u8>) -> Result<String, Error> {
        String::from_utf8(bytes)
            .map_err(|_| Error::invalid_data(format!("line {}: invalid UTF-8", self.line)))
    }
}
