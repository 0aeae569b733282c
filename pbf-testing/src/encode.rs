//! Minimal Protocol Buffers encoder for building test inputs.
//!
//! This is deliberately simple and unoptimized. It exists so that tests can
//! describe messages field-by-field instead of as hand-written byte arrays.

/// Encode `val` as a varint.
pub fn encode_varint(mut val: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(10);

    loop {
        let byte = (val & 0x7f) as u8;
        if val <= 0x7f {
            bytes.push(byte);
            break;
        }
        bytes.push(byte | 0x80);
        val >>= 7;
    }

    bytes
}

/// Map a signed 32-bit value to its zigzag encoding.
pub fn encode_zigzag32(val: i32) -> u32 {
    ((val << 1) ^ (val >> 31)) as u32
}

/// Map a signed 64-bit value to its zigzag encoding.
pub fn encode_zigzag64(val: i64) -> u64 {
    ((val << 1) ^ (val >> 63)) as u64
}

/// Builder for an encoded message.
///
/// ```
/// use pbf_testing::encode::MessageBuilder;
///
/// let buf = MessageBuilder::new().varint(1, 150).finish();
/// assert_eq!(buf, [0x08, 0x96, 0x01]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MessageBuilder {
    buf: Vec<u8>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field key with an arbitrary wire type, including invalid ones.
    pub fn key(mut self, tag: u32, wire_type: u8) -> Self {
        self.buf
            .extend(encode_varint(((tag as u64) << 3) | wire_type as u64));
        self
    }

    /// Append raw bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn varint(self, tag: u32, val: u64) -> Self {
        self.key(tag, 0).raw(&encode_varint(val))
    }

    /// Append an `int32` field. Negative values are sign-extended to 64 bits.
    pub fn int32(self, tag: u32, val: i32) -> Self {
        self.varint(tag, val as i64 as u64)
    }

    pub fn sint64(self, tag: u32, val: i64) -> Self {
        self.varint(tag, encode_zigzag64(val))
    }

    pub fn sint32(self, tag: u32, val: i32) -> Self {
        self.varint(tag, encode_zigzag32(val) as u64)
    }

    pub fn fixed64(self, tag: u32, val: u64) -> Self {
        self.key(tag, 1).raw(&val.to_le_bytes())
    }

    pub fn fixed32(self, tag: u32, val: u32) -> Self {
        self.key(tag, 5).raw(&val.to_le_bytes())
    }

    pub fn float(self, tag: u32, val: f32) -> Self {
        self.fixed32(tag, val.to_bits())
    }

    pub fn double(self, tag: u32, val: f64) -> Self {
        self.fixed64(tag, val.to_bits())
    }

    pub fn bytes(self, tag: u32, val: &[u8]) -> Self {
        self.key(tag, 2)
            .raw(&encode_varint(val.len() as u64))
            .raw(val)
    }

    pub fn string(self, tag: u32, val: &str) -> Self {
        self.bytes(tag, val.as_bytes())
    }

    /// Append an embedded message field.
    pub fn message(self, tag: u32, msg: &MessageBuilder) -> Self {
        self.bytes(tag, &msg.buf)
    }

    /// Append a packed repeated varint field.
    pub fn packed_varints(self, tag: u32, vals: &[u64]) -> Self {
        let payload: Vec<u8> = vals.iter().copied().flat_map(encode_varint).collect();
        self.bytes(tag, &payload)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageBuilder, encode_varint, encode_zigzag32, encode_zigzag64};

    #[test]
    fn test_encode_varint() {
        assert_eq!(encode_varint(0), [0x00]);
        assert_eq!(encode_varint(150), [0x96, 0x01]);
        assert_eq!(encode_varint(u64::MAX).len(), 10);
    }

    #[test]
    fn test_encode_zigzag() {
        assert_eq!(encode_zigzag32(0), 0);
        assert_eq!(encode_zigzag32(-1), 1);
        assert_eq!(encode_zigzag32(1), 2);
        assert_eq!(encode_zigzag32(i32::MIN), u32::MAX);
        assert_eq!(encode_zigzag64(i64::MAX), u64::MAX - 1);
    }

    #[test]
    fn test_message_builder() {
        let sub = MessageBuilder::new().varint(1, 1);
        let buf = MessageBuilder::new()
            .string(2, "hi")
            .message(3, &sub)
            .fixed32(4, 1)
            .finish();
        assert_eq!(
            buf,
            [
                0x12, 0x02, b'h', b'i', // string
                0x1a, 0x02, 0x08, 0x01, // message
                0x25, 0x01, 0x00, 0x00, 0x00, // fixed32
            ]
        );
    }

    #[test]
    fn test_int32_sign_extension() {
        let buf = MessageBuilder::new().int32(1, -1).finish();
        assert_eq!(buf.len(), 11);
    }
}
