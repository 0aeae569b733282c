use crate::errors::{DecodeError, ErrorKind, decode_error};
use crate::repeated::{
    Repeated, decode_packed_fixed, decode_packed_svarint, decode_packed_varint,
};
use crate::scalar::{Fixed, Varint, ZigZag};
use crate::varint::decode_varint;
use crate::wire::{CONTINUATION_BIT, WireType, key_tag};

/// Forward-only cursor over the fields of an encoded message.
///
/// A cursor borrows the buffer it reads from, so the buffer cannot be modified
/// or dropped while the cursor, or any cursor for an embedded message obtained
/// from it, is alive:
///
/// ```compile_fail
/// use pbf_cursor::Cursor;
///
/// let mut buf = vec![0x08, 0x96, 0x01];
/// let mut cursor = Cursor::new(&buf);
/// buf.clear();
/// cursor.next().unwrap();
/// ```
///
/// Fields are visited by calling [`next`](Cursor::next) in a loop. After each
/// call the field's number and wire type are available via
/// [`tag`](Cursor::tag) and [`wire_type`](Cursor::wire_type). The caller must
/// then either read the value with an accessor that matches the wire type, or
/// discard it using [`skip`](Cursor::skip), before advancing again.
///
/// Any method that returns an error leaves the read position unchanged.
///
/// Cursors are `Clone` but not `Copy`. Cloning a cursor saves the current
/// position, which can be used to re-read fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,

    /// Key of the most recently read field, or `None` before the first.
    key: Option<u32>,
}

impl<'a> Cursor<'a> {
    /// Create a cursor which reads fields from `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            key: None,
        }
    }

    /// Return the whole buffer viewed by this cursor.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Return the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return the bytes which have not yet been read.
    pub fn remaining(&self) -> &'a [u8] {
        let buf = self.buf;
        &buf[self.pos..]
    }

    /// Return true if there is unread data in the buffer.
    pub fn has_more(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Return the key of the current field.
    ///
    /// This packs the field number and wire type. It is zero if no field has
    /// been read yet.
    pub fn key(&self) -> u32 {
        self.key.unwrap_or(0)
    }

    /// Return the field number of the current field.
    pub fn tag(&self) -> u32 {
        key_tag(self.key())
    }

    pub fn wire_type(&self) -> WireType {
        WireType::from_key(self.key())
    }

    pub fn is_wire_type(&self, wire_type: WireType) -> bool {
        self.wire_type() == wire_type
    }

    /// Advance to the next field.
    ///
    /// Returns `Ok(true)` if a field key was read, or `Ok(false)` if the end
    /// of the buffer was reached.
    #[allow(clippy::should_implement_trait)] // Fallible, and values are read from the cursor itself.
    pub fn next(&mut self) -> Result<bool, DecodeError> {
        if !self.has_more() {
            return Ok(false);
        }
        let (key, len) =
            decode_varint(self.remaining()).map_err(|err| self.error_in(err.into(), None))?;

        // Valid keys fit in 32 bits. Higher bits are discarded.
        self.key = Some(key as u32);
        self.pos += len;
        Ok(true)
    }

    /// Advance to the next field with number `tag`, skipping other fields.
    ///
    /// Returns `Ok(false)` if the end of the buffer was reached without
    /// finding a match. In that case all remaining fields will have been
    /// skipped. Fields before the current position are not searched. To look
    /// for several fields in any order, clone the cursor first.
    ///
    /// If an error occurs, the cursor is left where it was before the call.
    pub fn next_tag(&mut self, tag: u32) -> Result<bool, DecodeError> {
        self.rollback_on_error(|cursor| {
            while cursor.next()? {
                if cursor.tag() == tag {
                    return Ok(true);
                }
                cursor.skip()?;
            }
            Ok(false)
        })
    }

    /// Read a varint value from a field with wire type `VARINT` or `LEN`.
    ///
    /// The result is truncated to `T` in the same way as an `as` cast. This
    /// is the correct decoding for `.proto` types `int32`, `int64`, `uint32`,
    /// `uint64` and enums. For `sint32` and `sint64` use
    /// [`svarint`](Self::svarint).
    pub fn varint<T: Varint>(&mut self) -> Result<T, DecodeError> {
        if !self.is_wire_type(WireType::VARINT) && !self.is_wire_type(WireType::LEN) {
            return Err(self.mismatch(WireType::VARINT));
        }
        self.read_varint().map(T::from_u64)
    }

    /// Read a zigzag-encoded signed varint.
    pub fn svarint<T: ZigZag>(&mut self) -> Result<T, DecodeError> {
        self.varint::<T::Unsigned>().map(T::zigzag_decode)
    }

    /// Read a fixed-width little-endian value.
    ///
    /// The field's wire type must be `FIXED32` for 4-byte types and `FIXED64`
    /// for 8-byte types.
    pub fn fixed<T: Fixed>(&mut self) -> Result<T, DecodeError> {
        self.expect_wire_type(T::WIRE_TYPE)?;
        let value =
            T::read_le(self.remaining()).ok_or_else(|| self.error(ErrorKind::EndOfBuffer))?;
        self.skip_bytes(T::WIDTH)?;
        Ok(value)
    }

    pub fn float32(&mut self) -> Result<f32, DecodeError> {
        self.fixed()
    }

    pub fn float64(&mut self) -> Result<f64, DecodeError> {
        self.fixed()
    }

    pub fn uint32(&mut self) -> Result<u32, DecodeError> {
        self.varint()
    }

    pub fn uint64(&mut self) -> Result<u64, DecodeError> {
        self.varint()
    }

    pub fn int32(&mut self) -> Result<i32, DecodeError> {
        self.varint()
    }

    pub fn int64(&mut self) -> Result<i64, DecodeError> {
        self.varint()
    }

    pub fn sint32(&mut self) -> Result<i32, DecodeError> {
        self.svarint()
    }

    pub fn sint64(&mut self) -> Result<i64, DecodeError> {
        self.svarint()
    }

    pub fn fixed32(&mut self) -> Result<u32, DecodeError> {
        self.fixed()
    }

    pub fn fixed64(&mut self) -> Result<u64, DecodeError> {
        self.fixed()
    }

    pub fn sfixed32(&mut self) -> Result<i32, DecodeError> {
        self.fixed()
    }

    pub fn sfixed64(&mut self) -> Result<i64, DecodeError> {
        self.fixed()
    }

    /// Read the value of a field whose schema type is an enum.
    pub fn enum_value(&mut self) -> Result<i32, DecodeError> {
        self.varint()
    }

    /// Read a `bool` value.
    ///
    /// Unlike the other varint accessors, this requires the value to be
    /// encoded in a single byte.
    pub fn boolean(&mut self) -> Result<bool, DecodeError> {
        self.expect_wire_type(WireType::VARINT)?;
        let byte = match self.remaining().first() {
            None => return Err(self.error(ErrorKind::EndOfBuffer)),
            Some(byte) if byte & CONTINUATION_BIT != 0 => {
                return Err(self.error(ErrorKind::InvalidBoolean));
            }
            Some(&byte) => byte,
        };
        self.skip_bytes(1)?;
        Ok(byte != 0)
    }

    /// Read the contents of a length-delimited field as an owned string.
    pub fn string(&mut self) -> Result<String, DecodeError> {
        self.str().map(|s| s.to_string())
    }

    /// Read the contents of a length-delimited field as a string slice,
    /// without copying.
    pub fn str(&mut self) -> Result<&'a str, DecodeError> {
        self.rollback_on_error(|cursor| {
            let bytes = cursor.bytes()?;
            std::str::from_utf8(bytes).map_err(|_| cursor.error(ErrorKind::InvalidUtf8))
        })
    }

    /// Read the contents of a length-delimited field, without copying.
    pub fn bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        self.expect_wire_type(WireType::LEN)?;
        self.read_payload()
    }

    /// Return a cursor over the embedded message in a length-delimited field.
    ///
    /// This cursor is advanced past the message, whether or not the returned
    /// cursor is used.
    pub fn message(&mut self) -> Result<Cursor<'a>, DecodeError> {
        self.bytes().map(Cursor::new)
    }

    /// Read the values of a repeated varint field.
    ///
    /// This accepts both the packed (`LEN`) and un-packed (`VARINT`) forms. In
    /// the un-packed case the iterator yields a single value and the caller
    /// will see the field again for each subsequent value.
    pub fn repeated_varint<T: Varint>(&mut self) -> Result<Repeated<'a, T>, DecodeError> {
        match self.wire_type() {
            WireType::VARINT => self.varint().map(Repeated::unpacked),
            WireType::LEN => self.read_packed(1, decode_packed_varint::<T>),
            _ => Err(self.mismatch(WireType::VARINT)),
        }
    }

    /// Read the values of a repeated `sint32` or `sint64` field.
    pub fn repeated_svarint<T: ZigZag>(&mut self) -> Result<Repeated<'a, T>, DecodeError> {
        match self.wire_type() {
            WireType::VARINT => self.svarint().map(Repeated::unpacked),
            WireType::LEN => self.read_packed(1, decode_packed_svarint::<T>),
            _ => Err(self.mismatch(WireType::VARINT)),
        }
    }

    /// Read the values of a repeated fixed-width field.
    ///
    /// The packed form fails with [`ErrorKind::FieldLengthMismatch`] if its
    /// length is not a multiple of the element size.
    pub fn repeated_fixed<T: Fixed>(&mut self) -> Result<Repeated<'a, T>, DecodeError> {
        match self.wire_type() {
            wire_type if wire_type == T::WIRE_TYPE => self.fixed().map(Repeated::unpacked),
            WireType::LEN => self.read_packed(T::WIDTH, decode_packed_fixed::<T>),
            _ => Err(self.mismatch(T::WIRE_TYPE)),
        }
    }

    /// Skip over the value of the current field.
    pub fn skip(&mut self) -> Result<(), DecodeError> {
        self.skip_value(self.key())
    }

    /// Skip over a value with the wire type encoded in `key`.
    pub fn skip_value(&mut self, key: u32) -> Result<(), DecodeError> {
        match WireType::from_key(key) {
            WireType::VARINT => self.read_varint().map(|_| ()),
            WireType::FIXED64 => self.skip_bytes(8),
            WireType::LEN => self.read_payload().map(|_| ()),
            WireType::FIXED32 => self.skip_bytes(4),
            WireType(other) => Err(self.error(ErrorKind::UnknownFieldType(other))),
        }
    }

    /// Advance the read position by `len` bytes.
    ///
    /// This is the only place where the read position moves by more than the
    /// length of a varint.
    pub fn skip_bytes(&mut self, len: usize) -> Result<(), DecodeError> {
        if self.buf.len() - self.pos < len {
            return Err(self.error(ErrorKind::EndOfBuffer));
        }
        self.pos += len;
        Ok(())
    }

    /// Read a varint without checking the wire type.
    fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let (value, len) =
            decode_varint(self.remaining()).map_err(|err| self.error(err.into()))?;
        self.pos += len;
        Ok(value)
    }

    /// Read a length prefix and return the payload that follows it.
    fn read_payload(&mut self) -> Result<&'a [u8], DecodeError> {
        self.rollback_on_error(|cursor| {
            let len = cursor.read_varint()?;

            // A length which doesn't fit in `usize` can't fit in the buffer.
            let len = usize::try_from(len).unwrap_or(usize::MAX);
            let start = cursor.pos;
            cursor.skip_bytes(len)?;
            let buf = cursor.buf;
            Ok(&buf[start..cursor.pos])
        })
    }

    /// Read the payload of a packed field whose elements are at least
    /// `elem_size` bytes and whose length must be a multiple of it.
    fn read_packed<T>(
        &mut self,
        elem_size: usize,
        decode: fn(&[u8]) -> Result<(T, usize), ErrorKind>,
    ) -> Result<Repeated<'a, T>, DecodeError> {
        let tag = self.tag();
        self.rollback_on_error(|cursor| {
            let payload = cursor.read_payload()?;
            let base = cursor.pos - payload.len();
            if payload.len() % elem_size != 0 {
                return Err(decode_error(
                    ErrorKind::FieldLengthMismatch,
                    base,
                    Some(tag),
                ));
            }
            Ok(Repeated::packed(payload, base, tag, decode))
        })
    }

    /// Run `read`, restoring the read position and current key if it fails.
    fn rollback_on_error<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let (pos, key) = (self.pos, self.key);
        let result = read(self);
        if result.is_err() {
            self.pos = pos;
            self.key = key;
        }
        result
    }

    fn expect_wire_type(&self, expected: WireType) -> Result<(), DecodeError> {
        if self.is_wire_type(expected) {
            Ok(())
        } else {
            Err(self.mismatch(expected))
        }
    }

    fn mismatch(&self, expected: WireType) -> DecodeError {
        self.error(ErrorKind::WireTypeMismatch {
            expected,
            actual: self.wire_type(),
        })
    }

    fn error(&self, kind: ErrorKind) -> DecodeError {
        let tag = self.key.map(key_tag);
        self.error_in(kind, tag)
    }

    fn error_in(&self, kind: ErrorKind, tag: Option<u32>) -> DecodeError {
        decode_error(kind, self.pos, tag)
    }
}

impl<'a> From<&'a [u8]> for Cursor<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self::new(buf)
    }
}
