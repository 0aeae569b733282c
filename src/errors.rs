use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::varint::VarintError;
use crate::wire::WireType;

/// Errors decoding Protocol Buffers wire data.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeError {
    kind: ErrorKind,
    offset: usize,
    tag: Option<u32>,
}

impl DecodeError {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            tag: None,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return the read position, relative to the start of the cursor's
    /// buffer, at which the error was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Return the number of the field being read when the error occurred.
    pub fn tag(&self) -> Option<u32> {
        self.tag
    }

    /// Associate a field number with this error.
    pub fn with_tag(mut self, tag: Option<u32>) -> Self {
        self.tag = tag;
        self
    }

    /// Return true if this error was caused by using the wrong accessor for
    /// the current field, rather than by malformed input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self.kind, ErrorKind::WireTypeMismatch { .. })
    }

    /// Return true if this error was caused by truncated or malformed input.
    pub fn is_corrupt_input(&self) -> bool {
        !self.is_contract_violation()
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.tag {
            Some(tag) => write!(
                f,
                "error at offset {} in field {}: {}",
                self.offset, tag, self.kind
            ),
            None => write!(f, "error at offset {}: {}", self.offset, self.kind),
        }
    }
}

impl Error for DecodeError {}

/// Construct an error for a failed read of field `tag` at `offset`.
///
/// All errors reported by cursors are created here.
pub(crate) fn decode_error(kind: ErrorKind, offset: usize, tag: Option<u32>) -> DecodeError {
    let err = DecodeError::new(kind, offset).with_tag(tag);
    #[cfg(feature = "tracing")]
    tracing::debug!(
        kind = %err.kind,
        offset = err.offset,
        tag = ?err.tag,
        "protobuf decode failed"
    );
    err
}

impl From<VarintError> for ErrorKind {
    fn from(val: VarintError) -> Self {
        match val {
            VarintError::Unterminated => ErrorKind::UnterminatedVarint,
            VarintError::TooLong => ErrorKind::VarintTooLong,
        }
    }
}

/// Enum describing the kind of a [`DecodeError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The buffer ended before the last byte of a varint.
    UnterminatedVarint,

    /// A varint has more than 10 bytes.
    VarintTooLong,

    /// A field value could not be skipped because its wire type is not one of
    /// varint, 64-bit, length-delimited or 32-bit.
    ///
    /// This includes the deprecated group start/end types.
    UnknownFieldType(u8),

    /// A fixed-width or length-delimited value extends past the end of the
    /// buffer.
    EndOfBuffer,

    /// A `bool` field was encoded using more than one byte.
    InvalidBoolean,

    /// A `string` field contained invalid UTF-8.
    InvalidUtf8,

    /// A packed repeated field has a length that is not a multiple of the
    /// element size.
    FieldLengthMismatch,

    /// Attempted to read a field value using an accessor that doesn't match
    /// the field's wire type.
    ///
    /// Unlike the other variants, this indicates a bug in the caller.
    WireTypeMismatch {
        expected: WireType,
        actual: WireType,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnterminatedVarint => write!(f, "unterminated varint"),
            ErrorKind::VarintTooLong => write!(f, "varint too long"),
            ErrorKind::UnknownFieldType(wire_type) => {
                write!(f, "unknown field type {}", wire_type)
            }
            ErrorKind::EndOfBuffer => write!(f, "end of buffer"),
            ErrorKind::InvalidBoolean => write!(f, "bool value is not a 1 byte varint"),
            ErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 in string"),
            ErrorKind::FieldLengthMismatch => write!(f, "packed field length mismatch"),
            ErrorKind::WireTypeMismatch { expected, actual } => {
                write!(f, "expected {} field but found {}", expected, actual)
            }
        }
    }
}
