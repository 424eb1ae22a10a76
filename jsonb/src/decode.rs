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
 * jsonb Parser
 *
 * A compact, memory efficient, serializer, deserializer and framer for binary JSON (JSONB).
 * This implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/
use crate::cobs;
use crate::constants::{HEADER, TERMINATOR, TRAILER};
use crate::error::{JsonbError, Result};
use crate::opcode::Opcode;

use std::convert::{TryFrom, TryInto};
use std::str::from_utf8;

/// One element of a payload stream, as yielded by the [`Parser`] enumerator.
///
/// `value` is the raw little-endian value bytes: empty for containers and literals, the string
/// bytes including the trailing NUL for strings, and the content bytes for binaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element<'buf> {
    /// `true` when this element is the first inside its object or array (or the stream)
    pub first: bool,
    /// The value's type tag
    pub opcode: Opcode,
    /// The item name, without its NUL, when the element is a named child of an object
    pub name: Option<&'buf [u8]>,
    /// The raw value bytes
    pub value: &'buf [u8],
}

/// Parser over a decoded payload.
///
/// [`Parser::parse`] consumes a received wire frame, decoding it in place; the parser then
/// enumerates elements through its `Iterator` implementation and answers name-keyed lookups.
/// A malformed element (truncated name or string, unknown opcode, short value) ends the
/// enumeration exactly like the end of the payload does: both mean no more well-formed
/// elements.
#[derive(Debug)]
pub struct Parser<'buf> {
    payload: &'buf [u8],
    cursor: usize,
    last: Opcode,
}

impl<'buf> Parser<'buf> {
    /// Unwrap a frame and COBS-decode its body in place.
    ///
    /// Stray bytes below 0x20 before the header and after the trailer are tolerated, so a
    /// transport can hand over its receive window without exact trimming.
    pub fn parse(frame: &'buf mut [u8]) -> Result<Parser<'buf>> {
        let mut lo = 0;
        let mut hi = frame.len();
        while lo < hi && frame[lo] < 0x20 {
            lo += 1;
        }
        while hi > lo && frame[hi - 1] < 0x20 {
            hi -= 1;
        }
        let trimmed = &mut frame[lo..hi];
        if trimmed.len() < HEADER.len() || &trimmed[..HEADER.len()] != HEADER {
            return Err(JsonbError::MissingHeader);
        }
        let body = &mut trimmed[HEADER.len()..];
        if body.len() < TRAILER.len() || &body[body.len() - TRAILER.len()..] != TRAILER {
            return Err(JsonbError::MissingTrailer);
        }
        let body_len = body.len() - TRAILER.len();
        let decoded = cobs::decode_in_place(&mut body[..body_len], TERMINATOR)?;
        Ok(Parser {
            payload: &body[..decoded],
            cursor: 0,
            last: Opcode::Invalid,
        })
    }

    /// Construct a parser directly over an already-decoded payload.
    pub fn from_payload(payload: &'buf [u8]) -> Parser<'buf> {
        Parser {
            payload,
            cursor: 0,
            last: Opcode::Invalid,
        }
    }

    /// The decoded payload bytes.
    pub fn payload(&self) -> &'buf [u8] {
        self.payload
    }

    /// Restart enumeration from the first element.
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.last = Opcode::Invalid;
    }

    /// Find a direct child of the outermost object by name, returning its type tag and raw
    /// value bytes. The cursor is left just past the matched element, so array contents can be
    /// enumerated from the returned position; observable results are unaffected by any prior
    /// cursor position.
    pub fn get_object_item(&mut self, name: &str) -> Option<(Opcode, &'buf [u8])> {
        let want = name.as_bytes();
        self.rewind();
        let mut nesting = 0i32;
        while let Some(el) = self.next() {
            match el.opcode {
                Opcode::BeginObject => nesting += 1,
                Opcode::EndObject => nesting -= 1,
                _ => {}
            }
            if nesting == 0 {
                // Left the outermost object
                break;
            }
            if nesting != 1 {
                continue;
            }
            if el.name == Some(want) {
                return Some((el.opcode, el.value));
            }
        }
        None
    }

    /// Get a named boolean. `true` only when the item is present and `true`.
    pub fn get_bool(&mut self, name: &str) -> bool {
        matches!(self.get_object_item(name), Some((Opcode::True, _)))
    }

    /// Get a named string, or `""` when missing, not a string, or not valid UTF-8.
    pub fn get_string(&mut self, name: &str) -> &'buf str {
        match self.get_object_item(name) {
            Some((Opcode::String, v)) if !v.is_empty() => {
                from_utf8(&v[..v.len() - 1]).unwrap_or("")
            }
            _ => "",
        }
    }

    /// Get the conventional `"err"` string of a response object, or `""` when absent.
    pub fn get_err(&mut self) -> &'buf str {
        self.get_string("err")
    }

    /// Get a named number widened to `f64`. Missing or non-numeric items read as `0.0`.
    pub fn get_double(&mut self, name: &str) -> f64 {
        match self.get_object_item(name).and_then(|(op, v)| Number::read(op, v)) {
            Some(n) => n.as_f64(),
            None => 0.0,
        }
    }

    /// Get a named number as `f32`. Missing or non-numeric items read as `0.0`.
    pub fn get_float(&mut self, name: &str) -> f32 {
        self.get_double(name) as f32
    }

    /// Get a named number as a signed 64-bit integer. Reals truncate toward zero; missing or
    /// non-numeric items read as 0.
    pub fn get_int64(&mut self, name: &str) -> i64 {
        match self.get_object_item(name).and_then(|(op, v)| Number::read(op, v)) {
            Some(n) => n.as_i64(),
            None => 0,
        }
    }

    /// Get a named number as a signed 32-bit integer, truncating the 64-bit reading.
    pub fn get_int32(&mut self, name: &str) -> i32 {
        self.get_int64(name) as i32
    }

    /// Get a named number as an unsigned 64-bit integer. Negative integers reinterpret
    /// two's-complement; negative reals saturate to 0.
    pub fn get_uint64(&mut self, name: &str) -> u64 {
        match self.get_object_item(name).and_then(|(op, v)| Number::read(op, v)) {
            Some(n) => n.as_u64(),
            None => 0,
        }
    }

    /// Get a named number as an unsigned 32-bit integer, truncating the 64-bit reading.
    pub fn get_uint32(&mut self, name: &str) -> u32 {
        self.get_uint64(name) as u32
    }

    /// Read the opcode byte at the cursor. Bytes outside the opcode table end the enumeration.
    fn take_opcode(&mut self) -> Option<Opcode> {
        let b = *self.payload.get(self.cursor)?;
        self.cursor += 1;
        Opcode::try_from(b).ok()
    }

    /// Take a NUL-terminated byte run at the cursor, yielding it without the NUL.
    fn take_name(&mut self) -> Option<&'buf [u8]> {
        let rest = &self.payload[self.cursor..];
        let nul = rest.iter().position(|&b| b == 0)?;
        self.cursor += nul + 1;
        Some(&rest[..nul])
    }

    /// Length of the NUL-terminated string at the cursor, including its NUL.
    fn string_len(&self) -> Option<usize> {
        let rest = &self.payload[self.cursor..];
        rest.iter().position(|&b| b == 0).map(|nul| nul + 1)
    }

    /// Consume a `width`-byte little-endian binary length prefix at the cursor.
    fn take_bin_len(&mut self, width: usize) -> Option<usize> {
        let bytes = self.payload.get(self.cursor..self.cursor + width)?;
        self.cursor += width;
        let mut len = 0usize;
        for (i, &b) in bytes.iter().enumerate() {
            len |= (b as usize) << (8 * i);
        }
        Some(len)
    }
}

impl<'buf> Iterator for Parser<'buf> {
    type Item = Element<'buf>;

    /// Advance one logical element: an optional item name followed by a value.
    fn next(&mut self) -> Option<Element<'buf>> {
        if self.cursor >= self.payload.len() {
            return None;
        }
        let first = matches!(
            self.last,
            Opcode::BeginObject | Opcode::BeginArray | Opcode::Invalid
        );
        let mut op = self.take_opcode()?;
        let mut name = None;
        if op == Opcode::Item {
            name = Some(self.take_name()?);
            op = self.take_opcode()?;
            if op == Opcode::Item {
                // A name must introduce a value
                return None;
            }
        }
        let len = match op {
            Opcode::BeginObject
            | Opcode::EndObject
            | Opcode::BeginArray
            | Opcode::EndArray
            | Opcode::Null
            | Opcode::True
            | Opcode::False => 0,
            Opcode::String => self.string_len()?,
            Opcode::Bin8 => self.take_bin_len(1)?,
            Opcode::Bin16 => self.take_bin_len(2)?,
            Opcode::Bin24 => self.take_bin_len(3)?,
            Opcode::Bin32 => self.take_bin_len(4)?,
            _ => op.fixed_width()?,
        };
        let value = self.payload.get(self.cursor..self.cursor + len)?;
        self.cursor += len;
        self.last = op;
        Some(Element {
            first,
            opcode: op,
            name,
            value,
        })
    }
}

/***************************************************************************************************
 * Numeric coercion
 **************************************************************************************************/

/// A numeric value read at its native width, retaining signedness so that widening conversions
/// behave the same way the wire writer's host types would.
#[derive(Debug, Clone, Copy)]
enum Number {
    Signed(i64),
    Unsigned(u64),
    Real(f64),
}

impl Number {
    /// Reinterpret value bytes under a numeric opcode. `None` for non-numeric opcodes or a
    /// value slice of the wrong width.
    fn read(op: Opcode, v: &[u8]) -> Option<Number> {
        match op {
            Opcode::Int8 => Some(Number::Signed(i8::from_le_bytes(v.try_into().ok()?) as i64)),
            Opcode::Int16 => Some(Number::Signed(i16::from_le_bytes(v.try_into().ok()?) as i64)),
            Opcode::Int32 => Some(Number::Signed(i32::from_le_bytes(v.try_into().ok()?) as i64)),
            Opcode::Int64 => Some(Number::Signed(i64::from_le_bytes(v.try_into().ok()?))),
            Opcode::Uint8 => Some(Number::Unsigned(u8::from_le_bytes(v.try_into().ok()?) as u64)),
            Opcode::Uint16 => {
                Some(Number::Unsigned(u16::from_le_bytes(v.try_into().ok()?) as u64))
            }
            Opcode::Uint32 => {
                Some(Number::Unsigned(u32::from_le_bytes(v.try_into().ok()?) as u64))
            }
            Opcode::Uint64 => Some(Number::Unsigned(u64::from_le_bytes(v.try_into().ok()?))),
            Opcode::Float => Some(Number::Real(f32::from_le_bytes(v.try_into().ok()?) as f64)),
            Opcode::Double => Some(Number::Real(f64::from_le_bytes(v.try_into().ok()?))),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Signed(v) => v as f64,
            Number::Unsigned(v) => v as f64,
            Number::Real(v) => v,
        }
    }

    fn as_i64(self) -> i64 {
        match self {
            Number::Signed(v) => v,
            Number::Unsigned(v) => v as i64,
            Number::Real(v) => v as i64,
        }
    }

    fn as_u64(self) -> u64 {
        match self {
            Number::Signed(v) => v as u64,
            Number::Unsigned(v) => v,
            Number::Real(v) => v as u64,
        }
    }
}
