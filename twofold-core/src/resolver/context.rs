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
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::binary::{BinaryReader, BinaryWriter};
use crate::error::Error;
use crate::resolver::id_dispenser::IdDispenser;
use crate::resolver::type_registry::TypeRegistry;
use crate::serializer::{Object, Serializer};
use crate::text::{TextReader, TextWriter};
use crate::util::expect_input;

pub(crate) type BinaryMarshalFn =
    Box<dyn Fn(&mut BinaryWriter<'_>, &dyn Any) -> Result<(), Error> + Send + Sync>;
pub(crate) type TextMarshalFn =
    Box<dyn Fn(&mut TextWriter<'_>, &dyn Any) -> Result<(), Error> + Send + Sync>;
pub(crate) type BinaryUnmarshalFn =
    Box<dyn Fn(&mut BinaryReader<'_>) -> Result<Box<dyn Object>, Error> + Send + Sync>;
pub(crate) type TextUnmarshalFn =
    Box<dyn Fn(&mut TextReader<'_>) -> Result<Box<dyn Object>, Error> + Send + Sync>;

/// Write-side substitution for one declared type.
pub(crate) struct MarshalOverride {
    pub(crate) binary: BinaryMarshalFn,
    pub(crate) text: TextMarshalFn,
}

/// Read-side substitution for one declared type, producing `output` values.
pub(crate) struct UnmarshalOverride {
    pub(crate) output: TypeId,
    pub(crate) binary: BinaryUnmarshalFn,
    pub(crate) text: TextUnmarshalFn,
}

#[derive(Default)]
struct TypeOverrides {
    marshal: Option<MarshalOverride>,
    unmarshal: Option<UnmarshalOverride>,
}

fn binary_marshal<F>(f: F) -> BinaryMarshalFn
where
    F: Fn(&mut BinaryWriter<'_>, &dyn Any) -> Result<(), Error> + Send + Sync + 'static,
{
    Box::new(f)
}

fn text_marshal<F>(f: F) -> TextMarshalFn
where
    F: Fn(&mut TextWriter<'_>, &dyn Any) -> Result<(), Error> + Send + Sync + 'static,
{
    Box::new(f)
}

fn binary_unmarshal<F>(f: F) -> BinaryUnmarshalFn
where
    F: Fn(&mut BinaryReader<'_>) -> Result<Box<dyn Object>, Error> + Send + Sync + 'static,
{
    Box::new(f)
}

fn text_unmarshal<F>(f: F) -> TextUnmarshalFn
where
    F: Fn(&mut TextReader<'_>) -> Result<Box<dyn Object>, Error> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Name announced for a marshalled value. The output type is registered so
/// the name resolves when the value is read back.
fn marshalled_name<TOut: Serializer>() -> Result<Cow<'static, str>, Error> {
    let registration = TypeRegistry::global().register::<TOut>()?;
    Ok(Cow::Owned(registration.name().to_owned()))
}

/// Per-call type substitutions.
///
/// A context is bound to one or more serialize or deserialize calls. While
/// bound, every value whose declared type has an override is converted on
/// the way out (marshal) or on the way in (unmarshal), in both wire formats.
/// Overrides are keyed by the declared type at the point of dispatch: a
/// field of type `i32` inside a struct is affected by an `i32` override, the
/// struct itself is not.
///
/// ```rust,ignore
/// let context = SerializationContext::new()
///     .marshal(|i: &i32| format!("value {i}"));
/// let bytes = BinarySerializer::default().to_bytes_with_context(&42, &context)?;
/// ```
///
/// Dropping the context releases its slot id and every override it holds.
pub struct SerializationContext {
    id: usize,
    overrides: HashMap<TypeId, TypeOverrides>,
}

impl SerializationContext {
    pub fn new() -> SerializationContext {
        let id = IdDispenser::global().take();
        trace!("serialization context {id} created");
        SerializationContext {
            id,
            overrides: HashMap::new(),
        }
    }

    /// Slot id of this context. Ids of dropped contexts are handed out again.
    #[inline(always)]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Writes every `TIn` as the `TOut` returned by `converter`, announcing
    /// `TOut` by name so readers decode it as such.
    pub fn marshal<TIn, TOut, F>(mut self, converter: F) -> Self
    where
        TIn: Serializer,
        TOut: Serializer,
        F: Fn(&TIn) -> TOut + Send + Sync + 'static,
    {
        self.set_marshal(converter);
        self
    }

    pub fn set_marshal<TIn, TOut, F>(&mut self, converter: F) -> &mut Self
    where
        TIn: Serializer,
        TOut: Serializer,
        F: Fn(&TIn) -> TOut + Send + Sync + 'static,
    {
        let converter = Arc::new(converter);
        let binary = {
            let converter = Arc::clone(&converter);
            binary_marshal(move |writer, value| {
                let value = expect_input::<TIn>(value)?;
                writer.write_type_marshalling(marshalled_name::<TOut>()?);
                writer.write_value(&converter(value))
            })
        };
        let text = text_marshal(move |writer, value| {
            let value = expect_input::<TIn>(value)?;
            writer.write_type_marshalling(marshalled_name::<TOut>()?);
            writer.write_value(&converter(value))
        });
        self.overrides.entry(TypeId::of::<TIn>()).or_default().marshal =
            Some(MarshalOverride { binary, text });
        self
    }

    /// Removes the marshal override for `TIn`; its values are written
    /// normally again.
    pub fn clear_marshal<TIn: Serializer>(&mut self) -> &mut Self {
        if let Some(overrides) = self.overrides.get_mut(&TypeId::of::<TIn>()) {
            overrides.marshal = None;
        }
        self
    }

    /// Reads every `TIn` normally, then hands the value to `converter`. The
    /// result replaces the value when the requested type can hold a `TOut`.
    pub fn unmarshal<TIn, TOut, F>(mut self, converter: F) -> Self
    where
        TIn: Serializer,
        TOut: Serializer,
        F: Fn(TIn) -> TOut + Send + Sync + 'static,
    {
        self.set_unmarshal(converter);
        self
    }

    pub fn set_unmarshal<TIn, TOut, F>(&mut self, converter: F) -> &mut Self
    where
        TIn: Serializer,
        TOut: Serializer,
        F: Fn(TIn) -> TOut + Send + Sync + 'static,
    {
        let converter = Arc::new(converter);
        let binary = {
            let converter = Arc::clone(&converter);
            binary_unmarshal(move |reader| {
                let raw = reader.read_value::<TIn>()?;
                Ok(Box::new(converter(raw)) as Box<dyn Object>)
            })
        };
        let text = text_unmarshal(move |reader| {
            let raw = reader.read_value::<TIn>()?;
            Ok(Box::new(converter(raw)) as Box<dyn Object>)
        });
        self.overrides.entry(TypeId::of::<TIn>()).or_default().unmarshal =
            Some(UnmarshalOverride {
                output: TypeId::of::<TOut>(),
                binary,
                text,
            });
        self
    }

    pub fn clear_unmarshal<TIn: Serializer>(&mut self) -> &mut Self {
        if let Some(overrides) = self.overrides.get_mut(&TypeId::of::<TIn>()) {
            overrides.unmarshal = None;
        }
        self
    }

    pub fn has_marshal<T: Serializer>(&self) -> bool {
        self.marshal_for(TypeId::of::<T>()).is_some()
    }

    pub fn has_unmarshal<T: Serializer>(&self) -> bool {
        self.overrides
            .get(&TypeId::of::<T>())
            .is_some_and(|overrides| overrides.unmarshal.is_some())
    }

    #[inline]
    pub(crate) fn marshal_for(&self, type_id: TypeId) -> Option<&MarshalOverride> {
        if self.overrides.is_empty() {
            return None;
        }
        self.overrides.get(&type_id)?.marshal.as_ref()
    }

    /// The unmarshal override for values of type `type_id`, if its output
    /// can be turned into a `T`.
    #[inline]
    pub(crate) fn unmarshal_for<T: Serializer>(&self, type_id: TypeId) -> Option<&UnmarshalOverride> {
        if self.overrides.is_empty() {
            return None;
        }
        self.overrides
            .get(&type_id)?
            .unmarshal
            .as_ref()
            .filter(|unmarshal| T::accepts(unmarshal.output))
    }
}

impl Default for SerializationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SerializationContext {
    fn drop(&mut self) {
        trace!("serialization context {} dropped", self.id);
        IdDispenser::global().release(self.id);
    }
}

impl fmt::Debug for SerializationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marshals = self.overrides.values().filter(|o| o.marshal.is_some()).count();
        let unmarshals = self.overrides.values().filter(|o| o.unmarshal.is_some()).count();
        f.debug_struct("SerializationContext")
            .field("id", &self.id)
            .field("marshals", &marshals)
            .field("unmarshals", &unmarshals)
            .finish()
    }
}
