//! Central error types for the Megalo codec.
//!
//! Every failure aborts the whole serialization pass. Variants carry enough
//! context (field path, position, expected vs. actual) to pin down a format
//! mismatch without re-running the pass under a debugger.

use core::fmt;
use std::borrow::Cow;

use crate::parameter::ParameterKind;

/// All errors a serialization pass can report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A count or unsigned field does not fit its bit width (encode only).
    CapacityExceeded {
        /// Feldpfad, leer wenn nicht bekannt.
        field: Cow<'static, str>,
        value: u64,
        bits: u8,
    },
    /// A collection exceeds a logical limit that is tighter than its count field.
    LimitExceeded {
        field: Cow<'static, str>,
        count: usize,
        max: usize,
    },
    /// A signed value cannot be represented by its encoding (plus-one fields).
    ValueOutOfRange {
        field: Cow<'static, str>,
        value: i64,
        bits: u8,
    },
    /// Encode-side parameter list length disagrees with the definition.
    ParameterCountMismatch {
        field: Cow<'static, str>,
        definition: String,
        expected: usize,
        actual: usize,
    },
    /// Encode-side parameter kind at `index` disagrees with the definition.
    ParameterKindMismatch {
        field: Cow<'static, str>,
        definition: String,
        index: usize,
        expected: ParameterKind,
        found: ParameterKind,
    },
    /// Decode-side definition references a kind without a registered factory.
    UnknownParameterKind {
        field: Cow<'static, str>,
        definition: String,
        index: usize,
        kind: ParameterKind,
    },
    /// No definition registered for an opcode.
    UnknownOpcode {
        field: Cow<'static, str>,
        table: &'static str,
        opcode: u32,
    },
    /// A code does not name a member of the target enum.
    InvalidEnumValue {
        field: Cow<'static, str>,
        value: u64,
    },
    /// A layout width the stream primitives cannot handle.
    InvalidWidth {
        field: Cow<'static, str>,
        bits: u8,
    },
    /// String pool text is not valid UTF-8.
    InvalidUtf8 { field: Cow<'static, str>, index: usize },
    /// A read ran past the end of the buffer.
    TruncatedStream {
        field: Cow<'static, str>,
        position: usize,
        requested: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { field, value, bits } => {
                write!(f, "value {value} does not fit in {bits} bits")?;
                write_field(f, field)
            }
            Self::LimitExceeded { field, count, max } => {
                write!(f, "{count} entries exceed the limit of {max}")?;
                write_field(f, field)
            }
            Self::ValueOutOfRange { field, value, bits } => {
                write!(f, "value {value} is not representable as plus-one in {bits} bits")?;
                write_field(f, field)
            }
            Self::ParameterCountMismatch { field, definition, expected, actual } => {
                write!(
                    f,
                    "parameter count mismatch for {definition}: expected {expected}, got {actual}"
                )?;
                write_field(f, field)
            }
            Self::ParameterKindMismatch { field, definition, index, expected, found } => {
                write!(
                    f,
                    "parameter kind mismatch for {definition}: expected {expected} but got {found} (index: {index})"
                )?;
                write_field(f, field)
            }
            Self::UnknownParameterKind { field, definition, index, kind } => {
                write!(f, "unhandled parameter kind {kind} for {definition} (index: {index})")?;
                write_field(f, field)
            }
            Self::UnknownOpcode { field, table, opcode } => {
                write!(f, "no {table} definition for opcode {opcode}")?;
                write_field(f, field)
            }
            Self::InvalidEnumValue { field, value } => {
                write!(f, "invalid enum value {value}")?;
                write_field(f, field)
            }
            Self::InvalidWidth { field, bits } => {
                write!(f, "invalid bit width {bits}")?;
                write_field(f, field)
            }
            Self::InvalidUtf8 { field, index } => {
                write!(f, "string pool entry {index} is not valid UTF-8")?;
                write_field(f, field)
            }
            Self::TruncatedStream { field, position, requested } => {
                write!(f, "truncated stream: {requested} bits requested at bit {position}")?;
                write_field(f, field)
            }
        }
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: &str) -> fmt::Result {
    if field.is_empty() {
        Ok(())
    } else {
        write!(f, " (field '{field}')")
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Erstellt einen `CapacityExceeded` Fehler ohne Feldkontext.
    pub fn capacity(value: u64, bits: u8) -> Self {
        Self::CapacityExceeded { field: Cow::Borrowed(""), value, bits }
    }

    /// Erstellt einen `InvalidEnumValue` Fehler ohne Feldkontext.
    pub fn invalid_enum(value: u64) -> Self {
        Self::InvalidEnumValue { field: Cow::Borrowed(""), value }
    }

    /// Erstellt einen `TruncatedStream` Fehler ohne Feldkontext.
    pub fn truncated(position: usize, requested: usize) -> Self {
        Self::TruncatedStream { field: Cow::Borrowed(""), position, requested }
    }

    /// Prefixes the field path with `name`.
    ///
    /// Applied on the way up, so nested containers yield `outer.inner`.
    pub fn in_field(mut self, name: &'static str) -> Self {
        let field = self.field_mut();
        *field = if field.is_empty() {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(format!("{name}.{field}"))
        };
        self
    }

    /// Returns the field path, empty when unknown.
    pub fn field(&self) -> &str {
        match self {
            Self::CapacityExceeded { field, .. }
            | Self::LimitExceeded { field, .. }
            | Self::ValueOutOfRange { field, .. }
            | Self::ParameterCountMismatch { field, .. }
            | Self::ParameterKindMismatch { field, .. }
            | Self::UnknownParameterKind { field, .. }
            | Self::UnknownOpcode { field, .. }
            | Self::InvalidEnumValue { field, .. }
            | Self::InvalidWidth { field, .. }
            | Self::InvalidUtf8 { field, .. }
            | Self::TruncatedStream { field, .. } => field,
        }
    }

    fn field_mut(&mut self) -> &mut Cow<'static, str> {
        match self {
            Self::CapacityExceeded { field, .. }
            | Self::LimitExceeded { field, .. }
            | Self::ValueOutOfRange { field, .. }
            | Self::ParameterCountMismatch { field, .. }
            | Self::ParameterKindMismatch { field, .. }
            | Self::UnknownParameterKind { field, .. }
            | Self::UnknownOpcode { field, .. }
            | Self::InvalidEnumValue { field, .. }
            | Self::InvalidWidth { field, .. }
            | Self::InvalidUtf8 { field, .. }
            | Self::TruncatedStream { field, .. } => field,
        }
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
