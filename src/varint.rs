//! Decode varints from byte slices.
//!
//! Variable length integers (_varints_) are the default encoding of integers
//! in Protocol Buffers messages, including field keys and lengths.
//!
//! See <https://protobuf.dev/programming-guides/encoding/#varints>.

use crate::wire::{CONTINUATION_BIT, MAX_VARINT_LEN};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VarintError {
    /// The end of the buffer was reached before the last byte of the varint.
    Unterminated,
    /// The 10th byte of the varint has the continuation bit set.
    TooLong,
}

/// Decode a varint from the start of `buf`.
///
/// Returns the value and the number of bytes it occupied, which is between
/// one and ten. Value bits beyond the 64th are discarded.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value = 0;

    for index in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(index) else {
            return Err(VarintError::Unterminated);
        };

        // High bit is continuation bit. Low 7 bits are the payload.
        value |= ((byte & !CONTINUATION_BIT) as u64) << (index * 7);
        if byte & CONTINUATION_BIT == 0 {
            return Ok((value, index + 1));
        }
    }

    Err(VarintError::TooLong)
}

/// Map a zigzag-encoded 32-bit value back to a signed integer.
///
/// See <https://protobuf.dev/programming-guides/encoding/#signed-ints>.
pub const fn zigzag_decode32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Map a zigzag-encoded 64-bit value back to a signed integer.
pub const fn zigzag_decode64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

#[cfg(test)]
mod tests {
    use pbf_testing::TestCases;
    use pbf_testing::encode::{encode_varint, encode_zigzag32, encode_zigzag64};

    use super::{VarintError, decode_varint, zigzag_decode32, zigzag_decode64};

    #[test]
    fn test_decode_varint() {
        let mut values: Vec<u64> = (0..1024).collect();
        values.extend([u32::MAX as u64, 1 << 35, u64::MAX - 1, u64::MAX]);
        for val in values {
            let buf = encode_varint(val);
            let (decoded_val, len) = decode_varint(&buf).unwrap();
            assert_eq!(decoded_val, val);
            assert_eq!(len, buf.len());
        }
    }

    #[test]
    fn test_decode_varint_sequence() {
        // Example from https://protobuf.dev/programming-guides/encoding/#simple.
        let buf = [0x08, 0x96, 0x01];
        let (key, len) = decode_varint(&buf).unwrap();
        assert_eq!((key, len), (8, 1));

        let (val, len) = decode_varint(&buf[1..]).unwrap();
        assert_eq!((val, len), (150, 2));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let (val, len) = decode_varint(&[0x01, 0xff, 0xff]).unwrap();
        assert_eq!((val, len), (1, 1));
    }

    #[test]
    fn test_unterminated_varint() {
        #[derive(Debug)]
        struct Case {
            buf: Vec<u8>,
        }

        let cases = [
            Case { buf: vec![] },
            Case { buf: vec![0x80] },
            Case {
                buf: vec![0x96, 0x81],
            },
            Case {
                buf: encode_varint(u64::MAX)[..9].to_vec(),
            },
        ];

        cases.test_each(|case| {
            assert_eq!(decode_varint(&case.buf), Err(VarintError::Unterminated));
        })
    }

    #[test]
    fn test_varint_too_long() {
        let buf = [0xff; 10];
        assert_eq!(decode_varint(&buf), Err(VarintError::TooLong));

        // Still too long if there are terminating bytes after the 10th.
        let mut buf = vec![0x80; 10];
        buf.push(0x01);
        assert_eq!(decode_varint(&buf), Err(VarintError::TooLong));
    }

    #[test]
    fn test_tenth_byte_excess_bits_are_discarded() {
        let mut buf = encode_varint(u64::MAX);
        assert_eq!(buf.len(), 10);
        buf[9] = 0x7f;
        assert_eq!(decode_varint(&buf), Ok((u64::MAX, 10)));
    }

    #[test]
    fn test_zigzag_decode() {
        #[derive(Debug)]
        struct Case {
            encoded: u64,
            decoded: i64,
        }

        // Examples from https://protobuf.dev/programming-guides/encoding/#signed-ints.
        let cases = [
            Case {
                encoded: 0,
                decoded: 0,
            },
            Case {
                encoded: 1,
                decoded: -1,
            },
            Case {
                encoded: 2,
                decoded: 1,
            },
            Case {
                encoded: 0x7ffffffe,
                decoded: 0x3fffffff,
            },
            Case {
                encoded: 0xfffffffe,
                decoded: 0x7fffffff,
            },
            Case {
                encoded: 0xffffffff,
                decoded: -0x80000000,
            },
        ];

        cases.test_each(|case| {
            assert_eq!(zigzag_decode64(case.encoded), case.decoded);
            assert_eq!(zigzag_decode32(case.encoded as u32), case.decoded as i32);
        })
    }

    #[test]
    fn test_zigzag_extremes() {
        for val in [i32::MIN, i32::MIN + 1, -1, 0, 1, i32::MAX] {
            assert_eq!(zigzag_decode32(encode_zigzag32(val)), val);
        }
        for val in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX] {
            assert_eq!(zigzag_decode64(encode_zigzag64(val)), val);
        }
    }
}
