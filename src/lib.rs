//! This crate provides a zero-copy, forward-only decoder for the
//! [Protocol Buffers][protobuf] binary wire format.
//!
//! # About the decoder
//!
//! There is no schema, descriptor or code generation. A [`Cursor`] walks the
//! fields of an encoded message in order and exposes each field's number and
//! wire type. The caller, which knows the schema, decides how to interpret
//! each value: read it with a typed accessor, descend into it as an embedded
//! message, or skip it.
//!
//! Cursors borrow the buffer they read from. Strings, bytes and embedded
//! messages are returned as slices or cursors over the same buffer, so the
//! only copies made are for values requested as owned types
//! ([`Cursor::string`]).
//!
//! # Usage
//!
//! Given the schema:
//!
//! ```proto
//! message Point {
//!     sint32 x = 1;
//!     sint32 y = 2;
//! }
//!
//! message Shape {
//!     string name = 1;
//!     repeated Point points = 2;
//! }
//! ```
//!
//! A decoder for `Shape` could be written as:
//!
//! ```
//! use pbf_cursor::{Cursor, DecodeError};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Shape<'a> {
//!     name: &'a str,
//!     points: Vec<(i32, i32)>,
//! }
//!
//! fn decode_point(mut cursor: Cursor) -> Result<(i32, i32), DecodeError> {
//!     let mut point = (0, 0);
//!     while cursor.next()? {
//!         match cursor.tag() {
//!             1 => point.0 = cursor.sint32()?,
//!             2 => point.1 = cursor.sint32()?,
//!             _ => cursor.skip()?,
//!         }
//!     }
//!     Ok(point)
//! }
//!
//! fn decode_shape(buf: &[u8]) -> Result<Shape<'_>, DecodeError> {
//!     let mut shape = Shape::default();
//!     let mut cursor = Cursor::new(buf);
//!     while cursor.next()? {
//!         match cursor.tag() {
//!             1 => shape.name = cursor.str()?,
//!             2 => shape.points.push(decode_point(cursor.message()?)?),
//!             // Skip over fields that are unrecognized.
//!             _ => cursor.skip()?,
//!         }
//!     }
//!     Ok(shape)
//! }
//!
//! let buf = [
//!     0x0a, 0x03, b't', b'r', b'i', // name = "tri"
//!     0x12, 0x04, 0x08, 0x02, 0x10, 0x01, // points { x: 1, y: -1 }
//!     0x18, 0x2a, // unknown field 3
//! ];
//! let shape = decode_shape(&buf).unwrap();
//! assert_eq!(shape, Shape { name: "tri", points: vec![(1, -1)] });
//! ```
//!
//! # Errors
//!
//! Malformed input never causes a panic or an out-of-bounds read. Truncated
//! or corrupt data, and calls to an accessor that doesn't match the current
//! field's wire type, are reported as a [`DecodeError`]. The two cases can be
//! told apart using [`DecodeError::is_contract_violation`].
//!
//! # Features
//!
//! - `tracing` (enabled by default): emit a `debug` level
//!   [tracing](https://docs.rs/tracing) event for each decode error, with the
//!   error kind, offset and field number as fields.
//!
//! [protobuf]: https://protobuf.dev/programming-guides/encoding/

// This is a crate for parsing potentially untrusted data, so it is preferable
// to avoid unsafe code.
#![forbid(unsafe_code)]

mod cursor;
mod errors;
mod repeated;
pub mod scalar;
pub mod varint;
pub mod wire;

pub use cursor::Cursor;
pub use errors::{DecodeError, ErrorKind};
pub use repeated::Repeated;
pub use wire::WireType;
