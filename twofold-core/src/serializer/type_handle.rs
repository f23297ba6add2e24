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

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;

use log::warn;

use crate::error::Error;
use crate::resolver::type_registry::TypeRegistry;
use crate::serializer::Serializer;
use crate::types::Shape;

/// A runtime type value.
///
/// Written as the canonical name of the type it stands for and resolved
/// through the type registry when read back, so the named type must be
/// registered on the reading side.
#[derive(Clone)]
pub struct TypeHandle {
    name: Cow<'static, str>,
    type_id: TypeId,
}

impl TypeHandle {
    pub(crate) fn new(name: Cow<'static, str>, type_id: TypeId) -> TypeHandle {
        TypeHandle { name, type_id }
    }

    /// Handle for `T`. `T` is registered so the handle can be read back.
    pub fn of<T: Serializer>() -> TypeHandle {
        if let Err(err) = TypeRegistry::global().register::<T>() {
            warn!("handle for unregistered type: {err}");
        }
        TypeHandle::new(T::canonical_name(), TypeId::of::<T>())
    }

    /// Handle for the type registered as `name`.
    pub fn resolve(name: &str) -> Result<TypeHandle, Error> {
        Ok(TypeRegistry::global().resolve(name)?.handle())
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline(always)]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeHandle {}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.name).finish()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serializer for TypeHandle {
    fn shape() -> Shape {
        Shape::type_value()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("type")
    }

    /// The handle of the unit type.
    fn default_value() -> Self {
        TypeHandle::new(<()>::canonical_name(), TypeId::of::<()>())
    }
}
