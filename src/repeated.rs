use std::iter::FusedIterator;

use crate::errors::{DecodeError, ErrorKind, decode_error};
use crate::scalar::{Fixed, Varint, ZigZag};
use crate::varint::decode_varint;

/// Function which decodes one element of a packed field from the start of a
/// buffer, returning the value and its encoded size.
type DecodeElement<T> = fn(&[u8]) -> Result<(T, usize), ErrorKind>;

/// Iterator over the values of a repeated scalar field.
///
/// Repeated scalar fields may use either a packed or un-packed representation.
/// In the un-packed form each value is a separate field with the same number,
/// and this iterator yields a single value. In the packed form, a single
/// length-delimited field contains all the values.
///
/// See <https://protobuf.dev/programming-guides/encoding/#repeated>.
///
/// After an error is returned, the iterator yields no further items.
#[derive(Clone, Debug)]
pub struct Repeated<'a, T> {
    inner: Inner<'a, T>,
}

#[derive(Clone, Debug)]
enum Inner<'a, T> {
    Unpacked(Option<T>),
    Packed {
        data: &'a [u8],
        pos: usize,

        /// Offset of `data` in the parent cursor's buffer.
        base: usize,
        tag: u32,
        decode: DecodeElement<T>,
    },
}

impl<'a, T> Repeated<'a, T> {
    pub(crate) fn unpacked(value: T) -> Self {
        Self {
            inner: Inner::Unpacked(Some(value)),
        }
    }

    pub(crate) fn packed(data: &'a [u8], base: usize, tag: u32, decode: DecodeElement<T>) -> Self {
        Self {
            inner: Inner::Packed {
                data,
                pos: 0,
                base,
                tag,
                decode,
            },
        }
    }
}

impl<T> Iterator for Repeated<'_, T> {
    type Item = Result<T, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Unpacked(value) => value.take().map(Ok),
            Inner::Packed {
                data,
                pos,
                base,
                tag,
                decode,
            } => {
                let remaining = data.get(*pos..).filter(|r| !r.is_empty())?;
                match (*decode)(remaining) {
                    Ok((value, len)) => {
                        *pos += len;
                        Some(Ok(value))
                    }
                    Err(kind) => {
                        let err = decode_error(kind, *base + *pos, Some(*tag));
                        *pos = data.len();
                        Some(Err(err))
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::Unpacked(value) => {
                let len = value.is_some() as usize;
                (len, Some(len))
            }
            // Each element occupies at least one byte.
            Inner::Packed { data, pos, .. } => (0, Some(data.len().saturating_sub(*pos))),
        }
    }
}

impl<T> FusedIterator for Repeated<'_, T> {}

pub(crate) fn decode_packed_varint<T: Varint>(buf: &[u8]) -> Result<(T, usize), ErrorKind> {
    let (val, len) = decode_varint(buf)?;
    Ok((T::from_u64(val), len))
}

pub(crate) fn decode_packed_svarint<T: ZigZag>(buf: &[u8]) -> Result<(T, usize), ErrorKind> {
    let (val, len) = decode_packed_varint::<T::Unsigned>(buf)?;
    Ok((T::zigzag_decode(val), len))
}

pub(crate) fn decode_packed_fixed<T: Fixed>(buf: &[u8]) -> Result<(T, usize), ErrorKind> {
    T::read_le(buf)
        .map(|val| (val, T::WIDTH))
        .ok_or(ErrorKind::EndOfBuffer)
}
