//! Types which scalar field values can be decoded into.
//!
//! These traits are sealed. They exist to constrain the type parameters of
//! the generic [`Cursor`](crate::Cursor) accessors, so that eg. an unsigned
//! type cannot be used with zigzag decoding and an 8-byte type cannot be read
//! from a 32-bit field.

use crate::varint::{zigzag_decode32, zigzag_decode64};
use crate::wire::WireType;

mod sealed {
    pub trait Varint {}
    pub trait ZigZag {}
    pub trait Fixed {}
}

/// Integer type produced by [`Cursor::varint`](crate::Cursor::varint).
pub trait Varint: Copy + sealed::Varint {
    /// Convert a decoded 64-bit varint to `Self`.
    ///
    /// Bits that don't fit in `Self` are discarded, as with an `as` cast.
    fn from_u64(val: u64) -> Self;
}

macro_rules! impl_varint {
    ($($type:ty),*) => {
        $(
            impl sealed::Varint for $type {}

            impl Varint for $type {
                #[inline]
                fn from_u64(val: u64) -> Self {
                    val as $type
                }
            }
        )*
    };
}

impl_varint!(u8, u16, u32, u64, usize, i32, i64);

/// Signed integer type produced by [`Cursor::svarint`](crate::Cursor::svarint).
pub trait ZigZag: Copy + sealed::ZigZag {
    /// Unsigned type of the same width, which the varint is truncated to
    /// before zigzag decoding.
    type Unsigned: Varint;

    fn zigzag_decode(n: Self::Unsigned) -> Self;
}

impl sealed::ZigZag for i32 {}

impl ZigZag for i32 {
    type Unsigned = u32;

    #[inline]
    fn zigzag_decode(n: u32) -> i32 {
        zigzag_decode32(n)
    }
}

impl sealed::ZigZag for i64 {}

impl ZigZag for i64 {
    type Unsigned = u64;

    #[inline]
    fn zigzag_decode(n: u64) -> i64 {
        zigzag_decode64(n)
    }
}

/// Fixed-width type produced by [`Cursor::fixed`](crate::Cursor::fixed).
pub trait Fixed: Copy + sealed::Fixed {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Wire type of fields holding a single value of this type.
    const WIRE_TYPE: WireType;

    /// Read a little-endian value from the start of `bytes`.
    ///
    /// Returns `None` if `bytes` is shorter than [`WIDTH`](Fixed::WIDTH).
    fn read_le(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_fixed {
    ($type:ty, $width:literal, $wire_type:expr) => {
        impl sealed::Fixed for $type {}

        impl Fixed for $type {
            const WIDTH: usize = $width;
            const WIRE_TYPE: WireType = $wire_type;

            #[inline]
            fn read_le(bytes: &[u8]) -> Option<Self> {
                bytes
                    .first_chunk::<$width>()
                    .map(|chunk| <$type>::from_le_bytes(*chunk))
            }
        }
    };
}

impl_fixed!(u32, 4, WireType::FIXED32);
impl_fixed!(i32, 4, WireType::FIXED32);
impl_fixed!(f32, 4, WireType::FIXED32);
impl_fixed!(u64, 8, WireType::FIXED64);
impl_fixed!(i64, 8, WireType::FIXED64);
impl_fixed!(f64, 8, WireType::FIXED64);
