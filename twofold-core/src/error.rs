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

//! Error type shared by both wire formats.
//!
//! Constructors are `#[cold]` and `#[track_caller]`: they sit on every read
//! and write path, and keeping them out of line keeps the successful paths
//! small.

use std::borrow::Cow;
use std::io;

use thiserror::Error;

/// Set `TWOFOLD_PANIC_ON_ERROR` at compile time to make every error
/// constructor panic where the error is created.
pub const PANIC_ON_ERROR: bool = option_env!("TWOFOLD_PANIC_ON_ERROR").is_some();

/// Error type for twofold serialization and deserialization.
///
/// Always build errors through the static constructors
/// ([`Error::invalid_operation`], [`Error::end_of_stream`], ...) rather than
/// the variants, so that `TWOFOLD_PANIC_ON_ERROR` is honoured everywhere.
///
/// ```rust
/// use twofold_core::error::Error;
///
/// let err = Error::end_of_stream("i32");
/// assert_eq!(err.to_string(), "Could not deserialize type i32");
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An abstract type was written or read as its own declared type, or a
    /// type name could not be resolved during tag-2 dispatch.
    #[error("{0}")]
    InvalidOperation(Cow<'static, str>),

    /// The stream ended before the value of `type_name` was complete.
    #[error("Could not deserialize type {type_name}")]
    EndOfStream { type_name: Cow<'static, str> },

    /// An argument was rejected, e.g. a conflicting type registration.
    #[error("{0}")]
    Argument(Cow<'static, str>),

    /// Malformed text input.
    #[error("line {line}: {message}")]
    Parse {
        line: usize,
        message: Cow<'static, str>,
    },

    /// Bytes or tokens that cannot represent the requested value.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// Nested tag-2 dispatch went deeper than `Config::max_dyn_depth`.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// The underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Creates a new [`Error::InvalidOperation`].
    ///
    /// ```
    /// use twofold_core::error::Error;
    ///
    /// let err = Error::invalid_operation("object cannot be written directly");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_operation<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidOperation(s.into());
        if PANIC_ON_ERROR {
            panic!("TWOFOLD_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::EndOfStream`] naming the type being read.
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn end_of_stream<S: Into<Cow<'static, str>>>(type_name: S) -> Self {
        let err = Error::EndOfStream {
            type_name: type_name.into(),
        };
        if PANIC_ON_ERROR {
            panic!("TWOFOLD_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Argument`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn argument<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::Argument(s.into());
        if PANIC_ON_ERROR {
            panic!("TWOFOLD_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::Parse`] at the given 1-based line.
    ///
    /// ```
    /// use twofold_core::error::Error;
    ///
    /// let err = Error::parse(3, "unterminated quoted string");
    /// assert_eq!(err.to_string(), "line 3: unterminated quoted string");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn parse<S: Into<Cow<'static, str>>>(line: usize, message: S) -> Self {
        let err = Error::Parse {
            line,
            message: message.into(),
        };
        if PANIC_ON_ERROR {
            panic!("TWOFOLD_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::InvalidData`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::InvalidData(s.into());
        if PANIC_ON_ERROR {
            panic!("TWOFOLD_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::DepthExceed`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceed<S: Into<Cow<'static, str>>>(s: S) -> Self {
        let err = Error::DepthExceed(s.into());
        if PANIC_ON_ERROR {
            panic!("TWOFOLD_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Maps an I/O failure met while reading `type_name`. A short read
    /// becomes [`Error::EndOfStream`], anything else stays [`Error::Io`].
    #[inline(never)]
    #[track_caller]
    pub fn from_read<S: Into<Cow<'static, str>>>(err: io::Error, type_name: S) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::end_of_stream(type_name)
        } else {
            Error::Io(err)
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use twofold_core::ensure;
/// use twofold_core::error::Error;
///
/// fn check_len(n: i32) -> Result<(), Error> {
///     ensure!(n >= 0, "negative length {}", n);
///     ensure!(n < 16, Error::invalid_data("too long"));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::InvalidOperation`].
///
/// ```
/// use twofold_core::bail;
/// use twofold_core::error::Error;
///
/// fn refuse() -> Result<(), Error> {
///     bail!("abstract types cannot be read directly");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::invalid_operation($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_operation(format!($fmt, $($arg)*)))
    };
}
