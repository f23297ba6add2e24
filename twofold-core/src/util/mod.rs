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

use std::any::{type_name, Any};

use crate::error::Error;

/// Views `value` as `B`. Succeeds only when `A` and `B` are the same type;
/// codec builders use it after classification has established that.
#[inline]
pub(crate) fn cast_ref<A: 'static, B: 'static>(value: &A) -> Result<&B, Error> {
    (value as &dyn Any)
        .downcast_ref::<B>()
        .ok_or_else(|| mismatch::<A, B>())
}

/// Moves `value` into `B` without boxing. Same contract as [`cast_ref`].
#[inline]
pub(crate) fn cast<A: 'static, B: 'static>(value: A) -> Result<B, Error> {
    let mut slot = Some(value);
    (&mut slot as &mut dyn Any)
        .downcast_mut::<Option<B>>()
        .and_then(Option::take)
        .ok_or_else(|| mismatch::<A, B>())
}

/// Stores `value` into a `&mut Option<T>` slot handed over as `dyn Any`.
#[inline]
pub(crate) fn fill_slot<T: 'static>(slot: &mut dyn Any, value: T) -> Result<(), Error> {
    match slot.downcast_mut::<Option<T>>() {
        Some(slot) => {
            *slot = Some(value);
            Ok(())
        }
        None => Err(Error::invalid_operation(format!(
            "read slot does not hold {}",
            type_name::<T>()
        ))),
    }
}

/// Downcasts an erased input handed to a type-specific procedure.
#[inline]
pub(crate) fn expect_input<T: 'static>(value: &dyn Any) -> Result<&T, Error> {
    value.downcast_ref::<T>().ok_or_else(|| {
        Error::invalid_operation(format!(
            "expected a value of type {}",
            type_name::<T>()
        ))
    })
}

#[cold]
fn mismatch<A, B>() -> Error {
    Error::invalid_operation(format!(
        "{} cannot be used as {}",
        type_name::<A>(),
        type_name::<B>()
    ))
}
