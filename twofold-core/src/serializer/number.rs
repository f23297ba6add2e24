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

use crate::error::Error;
use crate::serializer::{Blittable, Serializer};
use crate::text::{TextReader, TextWriter};
use crate::types::Shape;

macro_rules! impl_num_serializer {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            unsafe impl Blittable for $ty {}

            impl Serializer for $ty {
                #[inline(always)]
                fn shape() -> Shape {
                    Shape::unmanaged::<$ty>()
                }

                #[inline(always)]
                fn canonical_name() -> Cow<'static, str> {
                    Cow::Borrowed($name)
                }

                #[inline(always)]
                fn default_value() -> Self {
                    0 as $ty
                }

                #[inline(always)]
                fn write_text(&self, writer: &mut TextWriter<'_>) -> Result<(), Error> {
                    writer.write_leaf(self)
                }

                #[inline(always)]
                fn read_text(reader: &mut TextReader<'_>) -> Result<Self, Error> {
                    reader.read_parsed::<$ty>()
                }
            }
        )+
    };
}

impl_num_serializer!(
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
);
