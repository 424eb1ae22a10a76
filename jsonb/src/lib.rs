/***************************************************************************************************
 * Copyright (c) 2024, Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * jsonb module definition
 *
 * A compact, memory efficient, serializer, deserializer and framer for binary JSON (JSONB).
 * This implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/

// Default configuration
#![no_std]
#![warn(missing_docs)]

//! # JSONB
//!
//! The `jsonb` crate provides a binary encoding of JSON-shaped documents together with a framing
//! layer suitable for transmission across a byte-oriented, terminator-sensitive channel, such as
//! the simple serial-over-I2C link to a companion module.
//!
//! Every value in a payload is introduced by a single-byte opcode; the completed payload is
//! wrapped in a `{:` … `:}` signature and COBS-encoded so that the newline frame terminator can
//! never appear inside the frame body. The default configuration does not require an allocator:
//! formatting and parsing both operate on a byte buffer of your choice, and parsing decodes the
//! frame in place.
//!
//! ## Features
//!
//! - Append-only [`encoder::Formatter`] with typed scalar, string, binary and container
//!   operations, and `*_to_object` conveniences that emit the item name for you.
//! - Capacity errors are sticky: appends never fail individually, and an overrun is reported
//!   once at [`encoder::Formatter::format_end`]. An optional growth seam
//!   ([`encoder::FrameBuffer`]) lets a buffer expand instead of overrunning.
//! - In-place [`decoder::Parser`] over a received frame, with enumeration of elements and
//!   name-keyed lookup with cross-type numeric coercion.
//! - XOR-parameterized COBS primitives in [`framing`], usable on their own.
//!
//! ## Formatting
//!
//! The example below formats `{ "req": "card.version", "seq": 7 }` as a wire frame on a fixed
//! stack buffer.
//!
//! ```
//! use jsonb::encoder::Formatter;
//!
//! # fn main() -> Result<(), jsonb::error::JsonbError> {
//! let mut buf = [0u8; 64];
//! let mut fmt = Formatter::new(&mut buf[..]);
//! fmt.add_object_begin();
//! fmt.add_string_to_object("req", "card.version");
//! fmt.add_uint32_to_object("seq", 7);
//! fmt.add_object_end();
//! let len = fmt.format_end()?;
//!
//! let frame = fmt.frame()?;
//! assert_eq!(frame.len(), len);
//! assert!(frame.starts_with(b"{:"));
//! assert!(frame.ends_with(b":}\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Parsing
//!
//! The inverse direction unwraps the frame in place and looks items up by name. Typed getters
//! return the type's zero value when an item is missing or of an incompatible type; callers that
//! need to distinguish the two use [`decoder::Parser::get_object_item`] directly.
//!
//! ```
//! use jsonb::decoder::Parser;
//! use jsonb::encoder::Formatter;
//!
//! # fn main() -> Result<(), jsonb::error::JsonbError> {
//! let mut buf = [0u8; 64];
//! let len = {
//!     let mut fmt = Formatter::new(&mut buf[..]);
//!     fmt.add_object_begin();
//!     fmt.add_string_to_object("err", "not supported");
//!     fmt.add_int32_to_object("total", -12);
//!     fmt.add_object_end();
//!     fmt.format_end()?
//! };
//!
//! let mut parser = Parser::parse(&mut buf[..len])?;
//! assert_eq!(parser.get_err(), "not supported");
//! assert_eq!(parser.get_int32("total"), -12);
//! assert_eq!(parser.get_double("total"), -12.0);
//! assert_eq!(parser.get_string("missing"), "");
//! # Ok(())
//! # }
//! ```

// Pull in std if we are testing or if it is defined as feature (because we run tests on a
// platform supporting I/O and full feature set.
#[cfg(any(feature = "std", test))]
extern crate std;

// If we are really building no_std, pull in core as well. It is aliased as std so that "use"
// statements are always the same
#[cfg(all(not(feature = "std"), not(test)))]
extern crate core as std;

pub(crate) mod buffer;
pub(crate) mod cobs;
pub(crate) mod constants;
pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod opcode;

/// The `error` module contains error definitions used throughout `jsonb`.
pub mod error;

/// The `types` module exports the [`types::Opcode`] type tags, the frame signature bytes and
/// the opcode nibble masks of the wire format.
pub mod types {
    pub use super::constants::{
        GROUP_BIN, GROUP_CONTAINER, GROUP_INT, GROUP_ITEM, GROUP_LITERAL, GROUP_MASK, GROUP_REAL,
        GROUP_STRING, GROUP_UINT, HEADER, TERMINATOR, TRAILER, WIDTH_MASK,
    };
    pub use super::opcode::Opcode;
}

/// The `framing` module exports the COBS primitives used to keep the frame terminator out of the
/// encoded frame body. They are independent of the JSONB payload format.
pub mod framing {
    pub use super::cobs::{
        decode_in_place, encode, encoded_length, guaranteed_fit, max_encoded_length,
    };
}

/// The `encoder` module exports the [`encoder::Formatter`] used to build payloads and emit wire
/// frames, the [`encoder::FrameBuffer`] storage seam and the [`encoder::AppendValue`] trait.
pub mod encoder {
    pub use super::buffer::FrameBuffer;
    pub use super::encode::{AppendValue, Formatter};
}

/// The `decoder` module exports the in-place frame [`decoder::Parser`] and the
/// [`decoder::Element`] items it yields during enumeration.
pub mod decoder {
    pub use super::decode::{Element, Parser};
}
