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

//! Per-type codecs.
//!
//! A codec is built the first time its type is written or read, from the
//! category of the type's [`Shape`](crate::types::Shape), and then shared
//! for the rest of the process.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, LazyLock};

use log::{debug, warn};

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::resolver::cache::OnceMap;
use crate::serializer::{Serializer, TypeHandle};
use crate::text::{TextReader, TextWriter};
use crate::types::{ShapeKind, TypeCategory};
use crate::util::{cast, cast_ref};

type ErasedCodec = Arc<dyn Any + Send + Sync>;

static BINARY_CODECS: LazyLock<OnceMap<TypeId, ErasedCodec>> = LazyLock::new(OnceMap::new);
static TEXT_CODECS: LazyLock<OnceMap<TypeId, ErasedCodec>> = LazyLock::new(OnceMap::new);

type BinaryWriteFn<T> = Box<dyn Fn(&mut BinaryWriter<'_>, &T) -> Result<(), Error> + Send + Sync>;
type BinaryReadFn<T> = Box<dyn Fn(&mut BinaryReader<'_>) -> Result<T, Error> + Send + Sync>;
type TextWriteFn<T> = Box<dyn Fn(&mut TextWriter<'_>, &T) -> Result<(), Error> + Send + Sync>;
type TextReadFn<T> = Box<dyn Fn(&mut TextReader<'_>) -> Result<T, Error> + Send + Sync>;

fn cached<C: Any + Send + Sync>(
    codecs: &OnceMap<TypeId, ErasedCodec>,
    key: TypeId,
    build: impl FnOnce() -> Result<C, Error>,
) -> Result<Arc<C>, Error> {
    let erased = match codecs.get(&key) {
        Some(erased) => erased,
        None => codecs.get_or_try_insert_with(key, || Ok(Arc::new(build()?) as ErasedCodec))?,
    };
    erased
        .downcast::<C>()
        .map_err(|_| Error::invalid_operation("codec cache entry has the wrong type"))
}

fn take_slot<T: Serializer>(slot: Option<T>) -> Result<T, Error> {
    slot.ok_or_else(|| {
        Error::invalid_operation(format!("no value was produced for {}", T::canonical_name()))
    })
}

#[cold]
fn abstract_type<T: Serializer>() -> Error {
    Error::invalid_operation(format!(
        "{} is abstract and has no values of its own",
        T::canonical_name()
    ))
}

/// Binary write and read procedures for `T`.
pub struct BinaryCodec<T> {
    write: BinaryWriteFn<T>,
    read: BinaryReadFn<T>,
    sealed: bool,
    category: TypeCategory,
}

impl<T: Serializer> BinaryCodec<T> {
    /// The shared codec for `T`, built on first use.
    pub fn get() -> Result<Arc<BinaryCodec<T>>, Error> {
        cached(&BINARY_CODECS, TypeId::of::<T>(), Self::build)
    }

    fn with<W, R>(category: TypeCategory, write: W, read: R) -> Self
    where
        W: Fn(&mut BinaryWriter<'_>, &T) -> Result<(), Error> + Send + Sync + 'static,
        R: Fn(&mut BinaryReader<'_>) -> Result<T, Error> + Send + Sync + 'static,
    {
        BinaryCodec {
            write: Box::new(write),
            read: Box::new(read),
            sealed: category.is_sealed(),
            category,
        }
    }

    fn build() -> Result<Self, Error> {
        let shape = T::shape();
        let category = TypeCategory::of(&shape);
        debug!(
            "building binary codec for {} as {:?}",
            T::canonical_name(),
            category
        );
        let codec = match (category, shape.kind) {
            (_, ShapeKind::Delegate(ops)) => {
                let (write, read) = (ops.write_binary, ops.read_binary);
                Self::with(
                    category,
                    move |writer, value| write(writer, value as &dyn Any),
                    move |reader| {
                        let mut slot: Option<T> = None;
                        read(reader, &mut slot)?;
                        take_slot(slot)
                    },
                )
            }
            (TypeCategory::Abstract, _) => Self::with(
                category,
                |_, _| Err(abstract_type::<T>()),
                |_| Err(abstract_type::<T>()),
            ),
            (TypeCategory::RuntimeTypeValue, _) => Self::with(
                category,
                |writer, value| writer.write_string(cast_ref::<T, TypeHandle>(value)?.name()),
                |reader| {
                    let name = reader.read_string()?;
                    cast(TypeHandle::resolve(&name)?)
                },
            ),
            (TypeCategory::Unmanaged, _) => match shape.layout_of::<T>() {
                Some(layout) => Self::with(
                    category,
                    // SAFETY: the layout was built by `Shape::unmanaged::<T>()`,
                    // which requires `T: Blittable`.
                    |writer, value| unsafe { writer.write_raw(value) },
                    move |reader| unsafe { reader.read_raw::<T>(&layout) },
                ),
                None => {
                    warn!(
                        "{} describes a raw layout of another type, using its fields instead",
                        T::canonical_name()
                    );
                    Self::with(
                        TypeCategory::Managed,
                        |writer, value| value.write_fields(writer),
                        |reader| T::read_fields(reader),
                    )
                }
            },
            (TypeCategory::UnmanagedArray, ShapeKind::Array(ops)) => {
                let (write, read) = (ops.write_raw, ops.read_raw);
                Self::with(
                    category,
                    move |writer, value| write(writer, value as &dyn Any),
                    move |reader| {
                        let mut slot: Option<T> = None;
                        read(reader, &mut slot)?;
                        take_slot(slot)
                    },
                )
            }
            (_, ShapeKind::Array(ops)) => {
                let (write, read) = (ops.write_elements, ops.read_elements);
                Self::with(
                    category,
                    move |writer, value| write(writer, value as &dyn Any),
                    move |reader| {
                        let mut slot: Option<T> = None;
                        read(reader, &mut slot)?;
                        take_slot(slot)
                    },
                )
            }
            (TypeCategory::String, _) => Self::with(
                category,
                |writer, value| writer.write_string(cast_ref::<T, String>(value)?),
                |reader| cast(reader.read_string()?),
            ),
            _ => Self::with(
                category,
                |writer, value| value.write_fields(writer),
                |reader| T::read_fields(reader),
            ),
        };
        Ok(codec)
    }

    #[inline(always)]
    pub fn write(&self, writer: &mut BinaryWriter<'_>, value: &T) -> Result<(), Error> {
        (self.write)(writer, value)
    }

    #[inline(always)]
    pub fn read(&self, reader: &mut BinaryReader<'_>) -> Result<T, Error> {
        (self.read)(reader)
    }

    /// Whether every value of `T` is exactly a `T`.
    #[inline(always)]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[inline(always)]
    pub fn category(&self) -> TypeCategory {
        self.category
    }
}

impl<T> fmt::Debug for BinaryCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryCodec")
            .field("category", &self.category)
            .field("sealed", &self.sealed)
            .finish()
    }
}

/// Text write and read procedures for `T`.
pub struct TextCodec<T> {
    write: TextWriteFn<T>,
    read: TextReadFn<T>,
    sealed: bool,
    category: TypeCategory,
}

impl<T: Serializer> TextCodec<T> {
    /// The shared codec for `T`, built on first use.
    pub fn get() -> Result<Arc<TextCodec<T>>, Error> {
        cached(&TEXT_CODECS, TypeId::of::<T>(), Self::build)
    }

    fn with<W, R>(category: TypeCategory, write: W, read: R) -> Self
    where
        W: Fn(&mut TextWriter<'_>, &T) -> Result<(), Error> + Send + Sync + 'static,
        R: Fn(&mut TextReader<'_>) -> Result<T, Error> + Send + Sync + 'static,
    {
        TextCodec {
            write: Box::new(write),
            read: Box::new(read),
            sealed: category.is_sealed(),
            category,
        }
    }

    fn build() -> Result<Self, Error> {
        let shape = T::shape();
        let category = TypeCategory::of(&shape);
        debug!(
            "building text codec for {} as {:?}",
            T::canonical_name(),
            category
        );
        let codec = match (category, shape.kind) {
            (_, ShapeKind::Delegate(ops)) => {
                let (write, read) = (ops.write_text, ops.read_text);
                Self::with(
                    category,
                    move |writer, value| write(writer, value as &dyn Any),
                    move |reader| {
                        let mut slot: Option<T> = None;
                        read(reader, &mut slot)?;
                        take_slot(slot)
                    },
                )
            }
            (_, ShapeKind::Array(ops)) => {
                let (write, read) = (ops.write_text, ops.read_text);
                Self::with(
                    category,
                    move |writer, value| write(writer, value as &dyn Any),
                    move |reader| {
                        let mut slot: Option<T> = None;
                        read(reader, &mut slot)?;
                        take_slot(slot)
                    },
                )
            }
            (TypeCategory::Abstract, _) => Self::with(
                category,
                |_, _| Err(abstract_type::<T>()),
                |_| Err(abstract_type::<T>()),
            ),
            (TypeCategory::RuntimeTypeValue, _) => Self::with(
                category,
                |writer, value| writer.write_string(cast_ref::<T, TypeHandle>(value)?.name()),
                |reader| {
                    let name = reader.read_string()?;
                    cast(TypeHandle::resolve(&name)?)
                },
            ),
            (TypeCategory::String, _) => Self::with(
                category,
                |writer, value| writer.write_string(cast_ref::<T, String>(value)?),
                |reader| cast(reader.read_string()?),
            ),
            // Unmanaged and managed values both carry their own text form.
            _ => Self::with(
                category,
                |writer, value| value.write_text(writer),
                |reader| T::read_text(reader),
            ),
        };
        Ok(codec)
    }

    #[inline(always)]
    pub fn write(&self, writer: &mut TextWriter<'_>, value: &T) -> Result<(), Error> {
        (self.write)(writer, value)
    }

    #[inline(always)]
    pub fn read(&self, reader: &mut TextReader<'_>) -> Result<T, Error> {
        (self.read)(reader)
    }

    #[inline(always)]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[inline(always)]
    pub fn category(&self) -> TypeCategory {
        self.category
    }
}

impl<T> fmt::Debug for TextCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCodec")
            .field("category", &self.category)
            .field("sealed", &self.sealed)
            .finish()
    }
}
