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

//! Text stream adapter.
//!
//! The grammar uses the same three value tags as the binary format:
//!
//! ```text
//! value  := "~"                      // null / default
//!         | "@" name value           // explicit type name
//!         | payload                  // exact type, no marker
//! record := "{" (field value)* "}"
//! list   := "[" value* "]"
//! ```
//!
//! Strings are either bare, running to the end of the line or to a `//`
//! comment, or quoted with `""` standing for a literal quote. Numbers use
//! the locale-independent `Display`/`FromStr` forms.

mod reader;
mod writer;

pub use reader::TextReader;
pub use writer::TextWriter;

pub(crate) const NULL_MARKER: u8 = b'~';
pub(crate) const NAME_MARKER: u8 = b'@';
pub(crate) const QUOTE: u8 = b'"';

/// Bytes that end a bare token.
#[inline(always)]
pub(crate) fn is_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'{' | b'}' | b'[' | b']' | QUOTE)
}

/// Whether `value` has to be quoted to be read back as a string value.
pub(crate) fn string_needs_quotes(value: &str) -> bool {
    let bytes = value.as_bytes();
    match (value.chars().next(), value.chars().next_back()) {
        (None, _) | (_, None) => true,
        (Some(first), Some(last)) => {
            first.is_whitespace()
                || last.is_whitespace()
                || first == NAME_MARKER as char
                || first == NULL_MARKER as char
                || bytes
                    .iter()
                    .any(|b| matches!(b, b'"' | b'{' | b'}' | b'[' | b']' | b'\r' | b'\n'))
                || value.contains("//")
        }
    }
}

/// Whether `name` has to be quoted to be read back as a single token.
pub(crate) fn token_needs_quotes(name: &str) -> bool {
    name.is_empty()
        || name.bytes().any(|b| is_delimiter(b) || b == NAME_MARKER || b == NULL_MARKER)
        || name.contains("//")
}

/// Wraps `value` in quotes, doubling inner quotes.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
