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

use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::sync::LazyLock;

use log::{debug, trace, warn};

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::resolver::cache::OnceMap;
use crate::serializer::{Object, Serializer, TypeHandle};
use crate::text::{TextReader, TextWriter};
use crate::util::expect_input;

static GLOBAL: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::with_builtins);

/// Everything the registry needs to know about one concrete type.
#[derive(Clone)]
pub struct Registration {
    name: Cow<'static, str>,
    type_id: TypeId,
    rust_name: &'static str,
    binary: fn() -> BinaryActions,
    text: fn() -> TextActions,
}

impl Registration {
    pub fn of<T: Serializer>() -> Registration {
        Registration {
            name: T::canonical_name(),
            type_id: TypeId::of::<T>(),
            rust_name: type_name::<T>(),
            binary: BinaryActions::of::<T>,
            text: TextActions::of::<T>,
        }
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn handle(&self) -> TypeHandle {
        TypeHandle::new(self.name.clone(), self.type_id)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("type", &self.rust_name)
            .finish()
    }
}

/// Binary procedures for a type reached by name during tag-2 dispatch.
#[derive(Clone, Copy)]
pub struct BinaryActions {
    pub(crate) type_id: TypeId,
    pub(crate) write: fn(&mut BinaryWriter<'_>, &dyn Any) -> Result<(), Error>,
    pub(crate) read: fn(&mut BinaryReader<'_>) -> Result<Box<dyn Object>, Error>,
}

impl BinaryActions {
    fn of<T: Serializer>() -> BinaryActions {
        BinaryActions {
            type_id: TypeId::of::<T>(),
            write: write_binary::<T>,
            read: read_binary::<T>,
        }
    }
}

/// Text procedures for a type reached by name during tag-2 dispatch.
#[derive(Clone, Copy)]
pub struct TextActions {
    pub(crate) type_id: TypeId,
    pub(crate) write: fn(&mut TextWriter<'_>, &dyn Any) -> Result<(), Error>,
    pub(crate) read: fn(&mut TextReader<'_>) -> Result<Box<dyn Object>, Error>,
}

impl TextActions {
    fn of<T: Serializer>() -> TextActions {
        TextActions {
            type_id: TypeId::of::<T>(),
            write: write_text::<T>,
            read: read_text::<T>,
        }
    }
}

fn write_binary<T: Serializer>(writer: &mut BinaryWriter<'_>, value: &dyn Any) -> Result<(), Error> {
    writer.write::<T>(expect_input::<T>(value)?)
}

fn read_binary<T: Serializer>(reader: &mut BinaryReader<'_>) -> Result<Box<dyn Object>, Error> {
    Ok(Box::new(reader.read::<T>()?))
}

fn write_text<T: Serializer>(writer: &mut TextWriter<'_>, value: &dyn Any) -> Result<(), Error> {
    writer.write::<T>(expect_input::<T>(value)?)
}

fn read_text<T: Serializer>(reader: &mut TextReader<'_>) -> Result<Box<dyn Object>, Error> {
    Ok(Box::new(reader.read::<T>()?))
}

/// Maps canonical type names to concrete types.
///
/// Entries come from three places: the built-in types registered when the
/// registry is first used, [`register`](crate::register) calls, and values
/// written polymorphically, which register their own type on first sight.
/// The per-format action tables are filled lazily by name.
pub struct TypeRegistry {
    types: OnceMap<String, Registration>,
    binary: OnceMap<String, BinaryActions>,
    text: OnceMap<String, TextActions>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> TypeRegistry {
        TypeRegistry {
            types: OnceMap::new(),
            binary: OnceMap::new(),
            text: OnceMap::new(),
        }
    }

    pub fn global() -> &'static TypeRegistry {
        &GLOBAL
    }

    fn with_builtins() -> TypeRegistry {
        let registry = TypeRegistry::new();
        let builtins = [
            Registration::of::<bool>(),
            Registration::of::<char>(),
            Registration::of::<i8>(),
            Registration::of::<i16>(),
            Registration::of::<i32>(),
            Registration::of::<i64>(),
            Registration::of::<i128>(),
            Registration::of::<isize>(),
            Registration::of::<u8>(),
            Registration::of::<u16>(),
            Registration::of::<u32>(),
            Registration::of::<u64>(),
            Registration::of::<u128>(),
            Registration::of::<usize>(),
            Registration::of::<f32>(),
            Registration::of::<f64>(),
            Registration::of::<String>(),
            Registration::of::<TypeHandle>(),
            Registration::of::<Box<dyn Object>>(),
            Registration::of::<()>(),
            Registration::of::<Vec<u8>>(),
            Registration::of::<Vec<i32>>(),
            Registration::of::<Vec<i64>>(),
            Registration::of::<Vec<f64>>(),
            Registration::of::<Vec<String>>(),
        ];
        for registration in builtins {
            // Built-in names are distinct; a failure here would only repeat
            // on every later lookup of the same name.
            if let Err(err) = registry.insert(registration) {
                warn!("built-in registration failed: {err}");
            }
        }
        registry
    }

    /// Registers `T` under its canonical name. Registering the same type
    /// again is a no-op; another type under the same name is an
    /// [`Error::Argument`].
    pub fn register<T: Serializer>(&self) -> Result<Registration, Error> {
        self.insert(Registration::of::<T>())
    }

    pub(crate) fn insert(&self, registration: Registration) -> Result<Registration, Error> {
        let existing = match self.types.get(registration.name()) {
            Some(existing) => existing,
            None => self
                .types
                .get_or_try_insert_with(registration.name().to_owned(), || {
                    trace!(
                        "registered {} as {}",
                        registration.rust_name,
                        registration.name
                    );
                    Ok(registration.clone())
                })?,
        };
        if existing.type_id != registration.type_id {
            warn!(
                "type name {} is taken by {}, cannot register {}",
                registration.name, existing.rust_name, registration.rust_name
            );
            return Err(Error::argument(format!(
                "type name {} is already registered for {}",
                registration.name, existing.rust_name
            )));
        }
        Ok(existing)
    }

    /// Looks up a registered name.
    pub fn resolve(&self, name: &str) -> Result<Registration, Error> {
        self.types
            .get(name)
            .ok_or_else(|| Error::invalid_operation(format!("unknown type name {name}")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn binary_actions(&self, name: &str) -> Result<BinaryActions, Error> {
        if let Some(actions) = self.binary.get(name) {
            return Ok(actions);
        }
        self.binary.get_or_try_insert_with(name.to_owned(), || {
            let registration = self.resolve(name)?;
            debug!("built binary actions for {name}");
            Ok((registration.binary)())
        })
    }

    pub(crate) fn text_actions(&self, name: &str) -> Result<TextActions, Error> {
        if let Some(actions) = self.text.get(name) {
            return Ok(actions);
        }
        self.text.get_or_try_insert_with(name.to_owned(), || {
            let registration = self.resolve(name)?;
            debug!("built text actions for {name}");
            Ok((registration.text)())
        })
    }

    /// Name and binary actions for the concrete type of `object`,
    /// registering that type on first use. Fails if the name is taken by
    /// another type.
    pub(crate) fn binary_actions_for(
        &self,
        object: &dyn Object,
    ) -> Result<(Cow<'static, str>, BinaryActions), Error> {
        let name = object.object_type_name();
        self.insert(object.registration())?;
        let actions = self.binary_actions(&name)?;
        Ok((name, actions))
    }

    pub(crate) fn text_actions_for(
        &self,
        object: &dyn Object,
    ) -> Result<(Cow<'static, str>, TextActions), Error> {
        let name = object.object_type_name();
        self.insert(object.registration())?;
        let actions = self.text_actions(&name)?;
        Ok((name, actions))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
