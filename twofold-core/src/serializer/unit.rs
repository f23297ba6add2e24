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

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::serializer::Serializer;
use crate::text::{TextReader, TextWriter};
use crate::types::Shape;

/// The unit value is an empty record. It is also what a null `object`
/// reads back as.
impl Serializer for () {
    fn shape() -> Shape {
        Shape::managed()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("unit")
    }

    fn default_value() -> Self {}

    fn write_fields(&self, _writer: &mut BinaryWriter<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn read_fields(_reader: &mut BinaryReader<'_>) -> Result<Self, Error> {
        Ok(())
    }

    fn write_text(&self, writer: &mut TextWriter<'_>) -> Result<(), Error> {
        writer.begin_record()?;
        writer.end_record()
    }

    fn read_text(reader: &mut TextReader<'_>) -> Result<Self, Error> {
        reader.begin_record()?;
        match reader.next_field()? {
            None => Ok(()),
            Some(name) => Err(reader.unknown_field(&name)),
        }
    }
}
