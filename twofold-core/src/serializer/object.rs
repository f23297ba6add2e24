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
use std::fmt;

use crate::error::Error;
use crate::resolver::type_registry::Registration;
use crate::serializer::Serializer;
use crate::types::Shape;

/// Object-safe view of any serializable value.
///
/// This is what polymorphic values are made of: `Box<dyn Object>` plays the
/// role of a declared `object`, and traits registered with
/// [`impl_polymorphic!`](crate::impl_polymorphic) extend it. It is
/// implemented for every [`Serializer`].
pub trait Object: Any + Send + Sync {
    /// Canonical name of the concrete type.
    fn object_type_name(&self) -> Cow<'static, str>;

    /// Registry entry for the concrete type, used to register it lazily the
    /// first time it is written polymorphically.
    fn registration(&self) -> Registration;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_object(&self) -> &dyn Object;
}

impl<T: Serializer> Object for T {
    fn object_type_name(&self) -> Cow<'static, str> {
        T::canonical_name()
    }

    fn registration(&self) -> Registration {
        Registration::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn as_object(&self) -> &dyn Object {
        self
    }
}

impl fmt::Debug for dyn Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object")
            .field(&self.object_type_name())
            .finish()
    }
}

impl dyn Object {
    /// Whether the concrete value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// `Box<dyn Object>` is the declared type for values of any type.
impl Serializer for Box<dyn Object> {
    fn shape() -> Shape {
        Shape::abstract_type()
    }

    fn canonical_name() -> Cow<'static, str> {
        Cow::Borrowed("object")
    }

    /// Tag 0 read into a non-optional object yields the unit value.
    fn default_value() -> Self {
        Box::new(())
    }

    #[inline(always)]
    fn runtime_object(&self) -> Option<&dyn Object> {
        Some(&**self)
    }

    fn from_object(object: Box<dyn Object>) -> Result<Self, Error> {
        Ok(object)
    }

    fn accepts(_type_id: TypeId) -> bool {
        true
    }
}
