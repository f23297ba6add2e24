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

use crate::serializer::Serializer;
use crate::types::Shape;

/// Strings are written by the codec cache: a UTF-16 unit count and the
/// units in binary, a bare or quoted token in text.
impl Serializer for String {
    #[inline(always)]
    fn shape() -> Shape {
        Shape::string()
    }

    #[inline(always)]
    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("string")
    }

    #[inline(always)]
    fn default_value() -> Self {
        String::new()
    }
}
