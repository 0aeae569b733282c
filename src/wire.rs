//! Wire format constants.
//!
//! See <https://protobuf.dev/programming-guides/encoding/#structure>.

use std::fmt::{Display, Formatter};

/// Maximum number of bytes for an encoded varint.
///
/// A decoded varint is a u64 value. Each byte contains 7 value bits and one
/// continuation bit. Hence we need 9 "full" bytes plus one bit from the 10th byte.
pub const MAX_VARINT_LEN: usize = 10;

/// Bit that is set in every byte of a varint except the last.
pub const CONTINUATION_BIT: u8 = 0x80;

/// Number of low bits of a field key which hold the wire type.
const WIRE_TYPE_BITS: u32 = 3;

/// Wire type of a field, stored in the low 3 bits of the field key.
///
/// Protocol Buffers uses 3 bits for the wire type but only defines six values.
/// Values 6 and 7 can still appear in malformed input, so this is a newtype
/// rather than an enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WireType(pub u8);

impl WireType {
    pub const VARINT: Self = Self(0);
    pub const FIXED64: Self = Self(1);
    pub const LEN: Self = Self(2);

    /// Deprecated start-of-group type.
    pub const START_GROUP: Self = Self(3);

    /// Deprecated end-of-group type.
    pub const END_GROUP: Self = Self(4);

    pub const FIXED32: Self = Self(5);

    /// Extract the wire type from a field key.
    pub const fn from_key(key: u32) -> Self {
        Self((key & 0x7) as u8)
    }
}

impl Display for WireType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::VARINT => write!(f, "varint"),
            Self::FIXED64 => write!(f, "fixed64"),
            Self::LEN => write!(f, "len"),
            Self::START_GROUP => write!(f, "start group"),
            Self::END_GROUP => write!(f, "end group"),
            Self::FIXED32 => write!(f, "fixed32"),
            Self(other) => write!(f, "wire type {}", other),
        }
    }
}

/// Pack a field number and wire type into a field key.
pub const fn field_key(tag: u32, wire_type: WireType) -> u32 {
    (tag << WIRE_TYPE_BITS) | wire_type.0 as u32
}

/// Extract the field number from a field key.
pub const fn key_tag(key: u32) -> u32 {
    key >> WIRE_TYPE_BITS
}

#[cfg(test)]
mod tests {
    use super::{WireType, field_key, key_tag};

    #[test]
    fn test_field_key() {
        // Example from https://protobuf.dev/programming-guides/encoding/#simple.
        assert_eq!(field_key(1, WireType::VARINT), 0x08);
        assert_eq!(field_key(2, WireType::LEN), 0x12);

        let key = field_key(150, WireType::FIXED32);
        assert_eq!(key_tag(key), 150);
        assert_eq!(WireType::from_key(key), WireType::FIXED32);
    }

    #[test]
    fn test_display() {
        assert_eq!(WireType::LEN.to_string(), "len");
        assert_eq!(WireType::START_GROUP.to_string(), "start group");
        assert_eq!(WireType(7).to_string(), "wire type 7");
    }
}
