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
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::serializer::Serializer;
use crate::text::{TextReader, TextWriter};
use crate::types::Shape;

// Same cap as for vectors: the count comes from the stream.
const MAX_PREALLOCATED: usize = 4096;

fn write_entries<'v, K, V>(
    writer: &mut BinaryWriter<'_>,
    len: usize,
    entries: impl Iterator<Item = (&'v K, &'v V)>,
) -> Result<(), Error>
where
    K: Serializer,
    V: Serializer,
{
    writer.write_len(len)?;
    for (key, value) in entries {
        writer.write::<K>(key)?;
        writer.write::<V>(value)?;
    }
    Ok(())
}

fn write_entries_text<'v, K, V>(
    writer: &mut TextWriter<'_>,
    entries: impl Iterator<Item = (&'v K, &'v V)>,
) -> Result<(), Error>
where
    K: Serializer,
    V: Serializer,
{
    writer.begin_list()?;
    for (key, value) in entries {
        writer.write::<K>(key)?;
        writer.write::<V>(value)?;
    }
    writer.end_list()
}

macro_rules! impl_map_serializer {
    ($map:ident, $name:literal, $new:expr, $($key_bound:path),+) => {
        /// Maps are managed: an entry count then key/value pairs in binary,
        /// a flat `[ key value ... ]` list in text.
        impl<K, V> Serializer for $map<K, V>
        where
            K: Serializer $(+ $key_bound)+,
            V: Serializer,
        {
            fn shape() -> Shape {
                Shape::managed()
            }

            fn canonical_name() -> Cow<'static, str> {
                Cow::Owned(format!(
                    concat!($name, "<{},{}>"),
                    K::canonical_name(),
                    V::canonical_name()
                ))
            }

            fn default_value() -> Self {
                $map::new()
            }

            fn write_fields(&self, writer: &mut BinaryWriter<'_>) -> Result<(), Error> {
                write_entries(writer, self.len(), self.iter())
            }

            fn read_fields(reader: &mut BinaryReader<'_>) -> Result<Self, Error> {
                let len = reader.read_len::<Self>()?;
                let mut map = $new(len.min(MAX_PREALLOCATED));
                for _ in 0..len {
                    let key = reader.read::<K>()?;
                    let value = reader.read::<V>()?;
                    map.insert(key, value);
                }
                Ok(map)
            }

            fn write_text(&self, writer: &mut TextWriter<'_>) -> Result<(), Error> {
                write_entries_text(writer, self.iter())
            }

            fn read_text(reader: &mut TextReader<'_>) -> Result<Self, Error> {
                reader.begin_list()?;
                let mut map = $new(0);
                while reader.next_item()? {
                    let key = reader.read::<K>()?;
                    let line = reader.line();
                    if !reader.next_item()? {
                        return Err(Error::parse(line, format!("missing value for the last key of {}", Self::canonical_name())));
                    }
                    let value = reader.read::<V>()?;
                    map.insert(key, value);
                }
                Ok(map)
            }
        }
    };
}

impl_map_serializer!(HashMap, "HashMap", HashMap::with_capacity, Eq, Hash);
impl_map_serializer!(BTreeMap, "BTreeMap", |_| BTreeMap::new(), Ord);
