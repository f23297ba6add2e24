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

/// Makes `Box<dyn Trait>` serializable as an abstract declared type.
///
/// The trait must have [`Object`](crate::Object) as a supertrait, and every
/// implementing type that may appear behind the box must be listed. Values
/// are written with their concrete type name (tag 2) and read back through
/// the type registry; the first listed type provides the tag-0 default.
///
/// ```rust,ignore
/// trait Shape2D: twofold_core::Object {
///     fn area(&self) -> f64;
/// }
///
/// twofold_core::impl_polymorphic!(Shape2D, Circle, Square);
/// ```
#[macro_export]
macro_rules! impl_polymorphic {
    ($trait_name:ident, $($impl_type:ty),+ $(,)?) => {
        impl $crate::serializer::Serializer for Box<dyn $trait_name> {
            fn shape() -> $crate::types::Shape {
                $crate::types::Shape::abstract_type()
            }

            fn canonical_name() -> std::borrow::Cow<'static, str> {
                std::borrow::Cow::Borrowed(concat!("dyn:", module_path!(), "::", stringify!($trait_name)))
            }

            fn default_value() -> Self {
                Box::new(<$crate::impl_polymorphic!(@first $($impl_type),+) as $crate::serializer::Serializer>::default_value())
            }

            #[inline(always)]
            fn runtime_object(&self) -> Option<&dyn $crate::serializer::Object> {
                Some($crate::serializer::Object::as_object(&**self))
            }

            fn from_object(
                object: Box<dyn $crate::serializer::Object>,
            ) -> Result<Self, $crate::error::Error> {
                let name = (*object).object_type_name();
                let any = object.into_any();
                $(
                    let any = match any.downcast::<$impl_type>() {
                        Ok(value) => return Ok(value as Box<dyn $trait_name>),
                        Err(any) => any,
                    };
                )+
                drop(any);
                Err($crate::error::Error::invalid_operation(format!(
                    "a value of type {} cannot be read as Box<dyn {}>",
                    name,
                    stringify!($trait_name)
                )))
            }

            fn accepts(type_id: std::any::TypeId) -> bool {
                $(type_id == std::any::TypeId::of::<$impl_type>())||+
            }
        }
    };

    (@first $first:ty $(, $rest:ty)*) => {
        $first
    };
}
