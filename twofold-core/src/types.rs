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

//! Static type description and classification.
//!
//! Every [`Serializer`] describes itself with a [`Shape`]. The codec cache
//! classifies that shape into a [`TypeCategory`] the first time the type is
//! used and picks the matching construction rule.

use std::any::{Any, TypeId};
use std::mem;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::serializer::{array, delegate, Blittable, Serializer};
use crate::text::{TextReader, TextWriter};

/// One-byte frame preceding every value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueTag {
    /// Null or default value, no payload.
    Null = 0,
    /// The runtime type is the declared type.
    Exact = 1,
    /// A type name follows, then a value of that type.
    Named = 2,
}

impl TryFrom<u8> for ValueTag {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ValueTag::Null),
            1 => Ok(ValueTag::Exact),
            2 => Ok(ValueTag::Named),
            other => Err(Error::invalid_data(format!("unknown value tag {other}"))),
        }
    }
}

/// Codec construction rule selected for a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Fixed layout without indirection, moved as raw memory.
    Unmanaged,
    /// Array of [`TypeCategory::Unmanaged`] elements, moved as one block.
    UnmanagedArray,
    String,
    /// Array whose elements go through the value protocol one by one.
    ManagedArray,
    /// No direct instances; only reachable through tag-2 dispatch.
    Abstract,
    /// The [`TypeHandle`](crate::TypeHandle) type itself.
    RuntimeTypeValue,
    /// Everything else: walked field by field.
    Managed,
}

impl TypeCategory {
    /// Classifies a shape. The rules are applied in this order: runtime
    /// type value, abstract, array of unmanaged, other array, unmanaged,
    /// string, managed.
    pub fn of(shape: &Shape) -> TypeCategory {
        match shape.kind {
            ShapeKind::TypeValue => TypeCategory::RuntimeTypeValue,
            ShapeKind::Abstract => TypeCategory::Abstract,
            ShapeKind::Array(ops) if ops.element == TypeCategory::Unmanaged => {
                TypeCategory::UnmanagedArray
            }
            ShapeKind::Array(_) => TypeCategory::ManagedArray,
            ShapeKind::Unmanaged(_) => TypeCategory::Unmanaged,
            ShapeKind::String => TypeCategory::String,
            // Option<T> and Box<T> have no fixed layout of their own.
            ShapeKind::Delegate(ops) => match ops.inner {
                TypeCategory::Unmanaged => TypeCategory::Managed,
                inner => inner,
            },
            ShapeKind::Managed => TypeCategory::Managed,
        }
    }

    /// Whether values of this category can only ever have the declared type.
    #[inline(always)]
    pub fn is_sealed(self) -> bool {
        self != TypeCategory::Abstract
    }
}

pub(crate) type BinaryWriteErased = fn(&mut BinaryWriter<'_>, &dyn Any) -> Result<(), Error>;
pub(crate) type BinaryReadErased = fn(&mut BinaryReader<'_>, &mut dyn Any) -> Result<(), Error>;
pub(crate) type TextWriteErased = fn(&mut TextWriter<'_>, &dyn Any) -> Result<(), Error>;
pub(crate) type TextReadErased = fn(&mut TextReader<'_>, &mut dyn Any) -> Result<(), Error>;

/// Memory layout of a [`Blittable`] type.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub(crate) type_id: TypeId,
    pub(crate) size: usize,
    pub(crate) validate: fn(&[u8]) -> bool,
}

impl Layout {
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Procedures for a `Vec<E>`, monomorphized for `E` when the shape is built.
/// Reads fill a `&mut Option<Vec<E>>` slot.
#[derive(Clone, Copy)]
pub(crate) struct ArrayOps {
    pub(crate) element: TypeCategory,
    pub(crate) write_raw: BinaryWriteErased,
    pub(crate) read_raw: BinaryReadErased,
    pub(crate) write_elements: BinaryWriteErased,
    pub(crate) read_elements: BinaryReadErased,
    pub(crate) write_text: TextWriteErased,
    pub(crate) read_text: TextReadErased,
}

/// Procedures for wrappers that forward to the codec of an inner type.
#[derive(Clone, Copy)]
pub(crate) struct DelegateOps {
    pub(crate) inner: TypeCategory,
    /// Whether the wrapper can hold an absent value.
    pub(crate) nullable: bool,
    pub(crate) write_binary: BinaryWriteErased,
    pub(crate) read_binary: BinaryReadErased,
    pub(crate) write_text: TextWriteErased,
    pub(crate) read_text: TextReadErased,
}

#[derive(Clone, Copy)]
pub(crate) enum ShapeKind {
    TypeValue,
    Abstract,
    Array(ArrayOps),
    Unmanaged(Layout),
    String,
    Delegate(DelegateOps),
    Managed,
}

/// Static structural description of a serializable type.
///
/// A shape can only describe raw memory through [`Shape::unmanaged`], which
/// requires the [`Blittable`] bound.
#[derive(Clone, Copy)]
pub struct Shape {
    pub(crate) kind: ShapeKind,
}

impl Shape {
    /// Fixed-layout value moved as raw memory in the binary format.
    pub fn unmanaged<T: Blittable>() -> Shape {
        Shape {
            kind: ShapeKind::Unmanaged(Layout {
                type_id: TypeId::of::<T>(),
                size: mem::size_of::<T>(),
                validate: T::bits_valid,
            }),
        }
    }

    pub fn string() -> Shape {
        Shape {
            kind: ShapeKind::String,
        }
    }

    /// The runtime type value, [`TypeHandle`](crate::TypeHandle).
    pub fn type_value() -> Shape {
        Shape {
            kind: ShapeKind::TypeValue,
        }
    }

    /// Trait objects and other types without direct instances.
    pub fn abstract_type() -> Shape {
        Shape {
            kind: ShapeKind::Abstract,
        }
    }

    /// Record-like type walked field by field.
    pub fn managed() -> Shape {
        Shape {
            kind: ShapeKind::Managed,
        }
    }

    /// `Vec<E>`.
    pub fn array<E: Serializer>() -> Shape {
        Shape {
            kind: ShapeKind::Array(ArrayOps {
                element: TypeCategory::of(&E::shape()),
                write_raw: array::write_raw::<E>,
                read_raw: array::read_raw::<E>,
                write_elements: array::write_elements::<E>,
                read_elements: array::read_elements::<E>,
                write_text: array::write_text::<E>,
                read_text: array::read_text::<E>,
            }),
        }
    }

    /// `Option<T>`: absent values are framed as tag 0, present ones use the
    /// codec of `T`. When `T` is itself nullable the present value keeps its
    /// own frame, so `Some(None)` stays distinct from `None`.
    pub fn nullable<T: Serializer>() -> Shape {
        let inner = T::shape();
        let nested = inner.is_nullable();
        Shape {
            kind: ShapeKind::Delegate(DelegateOps {
                inner: TypeCategory::of(&inner),
                nullable: true,
                write_binary: if nested {
                    delegate::write_nested_option::<T>
                } else {
                    delegate::write_option::<T>
                },
                read_binary: if nested {
                    delegate::read_nested_option::<T>
                } else {
                    delegate::read_option::<T>
                },
                write_text: if nested {
                    delegate::write_nested_option_text::<T>
                } else {
                    delegate::write_option_text::<T>
                },
                read_text: if nested {
                    delegate::read_nested_option_text::<T>
                } else {
                    delegate::read_option_text::<T>
                },
            }),
        }
    }

    /// `Box<T>`: transparent over the codec of `T`.
    pub fn boxed<T: Serializer>() -> Shape {
        let inner = T::shape();
        Shape {
            kind: ShapeKind::Delegate(DelegateOps {
                inner: TypeCategory::of(&inner),
                nullable: inner.is_nullable(),
                write_binary: delegate::write_box::<T>,
                read_binary: delegate::read_box::<T>,
                write_text: delegate::write_box_text::<T>,
                read_text: delegate::read_box_text::<T>,
            }),
        }
    }

    /// Whether values of this shape can be absent, as `Option<T>` can.
    #[inline(always)]
    pub(crate) fn is_nullable(&self) -> bool {
        matches!(self.kind, ShapeKind::Delegate(ops) if ops.nullable)
    }

    /// The raw layout, if this shape was built for exactly `T`.
    pub(crate) fn layout_of<T: 'static>(&self) -> Option<Layout> {
        match self.kind {
            ShapeKind::Unmanaged(layout) if layout.type_id == TypeId::of::<T>() => Some(layout),
            _ => None,
        }
    }

    /// The raw layout regardless of which type it belongs to.
    #[inline(always)]
    pub fn layout(&self) -> Option<Layout> {
        match self.kind {
            ShapeKind::Unmanaged(layout) => Some(layout),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Shape").field(&TypeCategory::of(self)).finish()
    }
}
