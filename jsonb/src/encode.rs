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
 * jsonb Formatter
 *
 * A compact, memory efficient, serializer, deserializer and framer for binary JSON (JSONB).
 * This implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/
use crate::buffer::FrameBuffer;
use crate::cobs;
use crate::constants::{FRAME_OVERHEAD, HEADER, TERMINATOR, TRAILER};
use crate::error::{JsonbError, Result};
use crate::opcode::Opcode;

/// Formatting progresses `Open` -> `Framed`, or `Open` -> `Overrun` if an append cannot be
/// served. Both terminal states are sticky: append operations are no-ops outside `Open`, so a
/// caller can issue a whole batch of appends and check the outcome once, at `format_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatState {
    Open,
    Overrun,
    Framed,
}

/// Streaming writer that appends type-tagged values and object/array structure to a buffer and
/// finally rewrites the buffer as a complete wire frame.
///
/// The formatter does not police payload grammar: balanced containers, and an item name before
/// each direct child of an object, are the caller's responsibility.
#[derive(Debug)]
pub struct Formatter<B: FrameBuffer> {
    buf: B,
    used: usize,
    state: FormatState,
}

impl<B: FrameBuffer> Formatter<B> {
    /// Begin formatting a payload on `buf`. Any previous content of the buffer is ignored.
    pub fn new(buf: B) -> Formatter<B> {
        Formatter {
            buf,
            used: 0,
            state: FormatState::Open,
        }
    }

    /// Make room for `needed` more bytes, growing the buffer if it supports that. On failure the
    /// formatter transitions to the sticky `Overrun` state.
    fn ensure(&mut self, needed: usize) -> bool {
        if self.used + needed > self.buf.capacity() {
            if !self.buf.grow(needed) || self.used + needed > self.buf.capacity() {
                self.state = FormatState::Overrun;
                return false;
            }
        }
        true
    }

    /// Append an opcode byte followed by its immediate payload bytes.
    fn push_opcode(&mut self, op: Opcode, payload: &[u8]) {
        if self.state != FormatState::Open || !self.ensure(payload.len() + 1) {
            return;
        }
        let at = self.used;
        let bytes = self.buf.bytes_mut();
        bytes[at] = op.byte();
        bytes[at + 1..at + 1 + payload.len()].copy_from_slice(payload);
        self.used += payload.len() + 1;
    }

    /// Append raw trailing bytes (string terminators, binary content) without an opcode.
    fn push_raw(&mut self, payload: &[u8]) {
        if self.state != FormatState::Open || !self.ensure(payload.len()) {
            return;
        }
        let at = self.used;
        self.buf.bytes_mut()[at..at + payload.len()].copy_from_slice(payload);
        self.used += payload.len();
    }

    /// Append the start of an object.
    pub fn add_object_begin(&mut self) -> &mut Self {
        self.push_opcode(Opcode::BeginObject, &[]);
        self
    }

    /// Append the end of an object.
    pub fn add_object_end(&mut self) -> &mut Self {
        self.push_opcode(Opcode::EndObject, &[]);
        self
    }

    /// Append the start of an array.
    pub fn add_array_begin(&mut self) -> &mut Self {
        self.push_opcode(Opcode::BeginArray, &[]);
        self
    }

    /// Append the end of an array.
    pub fn add_array_end(&mut self) -> &mut Self {
        self.push_opcode(Opcode::EndArray, &[]);
        self
    }

    /// Append a `null`.
    pub fn add_null(&mut self) -> &mut Self {
        self.push_opcode(Opcode::Null, &[]);
        self
    }

    /// Append `true`.
    pub fn add_true(&mut self) -> &mut Self {
        self.push_opcode(Opcode::True, &[]);
        self
    }

    /// Append `false`.
    pub fn add_false(&mut self) -> &mut Self {
        self.push_opcode(Opcode::False, &[]);
        self
    }

    /// Append a boolean.
    pub fn add_bool(&mut self, v: bool) -> &mut Self {
        self.push_opcode(if v { Opcode::True } else { Opcode::False }, &[]);
        self
    }

    /// Append a string, NUL-terminated on the wire.
    ///
    /// A parser treats the first NUL byte as the end of the string, so `s` should not contain
    /// embedded NULs.
    pub fn add_string(&mut self, s: &str) -> &mut Self {
        self.push_opcode(Opcode::String, s.as_bytes());
        self.push_raw(&[0]);
        self
    }

    /// Append a binary payload under the narrowest length prefix that holds its size.
    pub fn add_bin(&mut self, bin: &[u8]) -> &mut Self {
        let len = bin.len();
        if len < 0x100 {
            self.push_opcode(Opcode::Bin8, &(len as u8).to_le_bytes());
        } else if len < 0x1_0000 {
            self.push_opcode(Opcode::Bin16, &(len as u16).to_le_bytes());
        } else if len < 0x100_0000 {
            self.push_opcode(Opcode::Bin24, &(len as u32).to_le_bytes()[..3]);
        } else {
            self.push_opcode(Opcode::Bin32, &(len as u32).to_le_bytes());
        }
        self.push_raw(bin);
        self
    }

    /// Append an 8-bit signed integer.
    pub fn add_int8(&mut self, v: i8) -> &mut Self {
        self.push_opcode(Opcode::Int8, &v.to_le_bytes());
        self
    }

    /// Append a 16-bit signed integer.
    pub fn add_int16(&mut self, v: i16) -> &mut Self {
        self.push_opcode(Opcode::Int16, &v.to_le_bytes());
        self
    }

    /// Append a 32-bit signed integer.
    pub fn add_int32(&mut self, v: i32) -> &mut Self {
        self.push_opcode(Opcode::Int32, &v.to_le_bytes());
        self
    }

    /// Append a 64-bit signed integer.
    pub fn add_int64(&mut self, v: i64) -> &mut Self {
        self.push_opcode(Opcode::Int64, &v.to_le_bytes());
        self
    }

    /// Append an 8-bit unsigned integer.
    pub fn add_uint8(&mut self, v: u8) -> &mut Self {
        self.push_opcode(Opcode::Uint8, &v.to_le_bytes());
        self
    }

    /// Append a 16-bit unsigned integer.
    pub fn add_uint16(&mut self, v: u16) -> &mut Self {
        self.push_opcode(Opcode::Uint16, &v.to_le_bytes());
        self
    }

    /// Append a 32-bit unsigned integer.
    pub fn add_uint32(&mut self, v: u32) -> &mut Self {
        self.push_opcode(Opcode::Uint32, &v.to_le_bytes());
        self
    }

    /// Append a 64-bit unsigned integer.
    pub fn add_uint64(&mut self, v: u64) -> &mut Self {
        self.push_opcode(Opcode::Uint64, &v.to_le_bytes());
        self
    }

    /// Append a 32-bit real.
    pub fn add_float(&mut self, v: f32) -> &mut Self {
        self.push_opcode(Opcode::Float, &v.to_le_bytes());
        self
    }

    /// Append a 64-bit real.
    pub fn add_double(&mut self, v: f64) -> &mut Self {
        self.push_opcode(Opcode::Double, &v.to_le_bytes());
        self
    }

    /// Append an item name, introducing the next value as a named child of the enclosing
    /// object. The name is NUL-terminated on the wire and should not contain embedded NULs.
    pub fn add_item_to_object(&mut self, name: &str) -> &mut Self {
        self.push_opcode(Opcode::Item, name.as_bytes());
        self.push_raw(&[0]);
        self
    }

    /// Append a named string item to the enclosing object.
    pub fn add_string_to_object(&mut self, name: &str, s: &str) -> &mut Self {
        self.add_item_to_object(name).add_string(s)
    }

    /// Append a named binary item to the enclosing object.
    pub fn add_bin_to_object(&mut self, name: &str, bin: &[u8]) -> &mut Self {
        self.add_item_to_object(name).add_bin(bin)
    }

    /// Append a named 8-bit signed integer item to the enclosing object.
    pub fn add_int8_to_object(&mut self, name: &str, v: i8) -> &mut Self {
        self.add_item_to_object(name).add_int8(v)
    }

    /// Append a named 16-bit signed integer item to the enclosing object.
    pub fn add_int16_to_object(&mut self, name: &str, v: i16) -> &mut Self {
        self.add_item_to_object(name).add_int16(v)
    }

    /// Append a named 32-bit signed integer item to the enclosing object.
    pub fn add_int32_to_object(&mut self, name: &str, v: i32) -> &mut Self {
        self.add_item_to_object(name).add_int32(v)
    }

    /// Append a named 64-bit signed integer item to the enclosing object.
    pub fn add_int64_to_object(&mut self, name: &str, v: i64) -> &mut Self {
        self.add_item_to_object(name).add_int64(v)
    }

    /// Append a named 8-bit unsigned integer item to the enclosing object.
    pub fn add_uint8_to_object(&mut self, name: &str, v: u8) -> &mut Self {
        self.add_item_to_object(name).add_uint8(v)
    }

    /// Append a named 16-bit unsigned integer item to the enclosing object.
    pub fn add_uint16_to_object(&mut self, name: &str, v: u16) -> &mut Self {
        self.add_item_to_object(name).add_uint16(v)
    }

    /// Append a named 32-bit unsigned integer item to the enclosing object.
    pub fn add_uint32_to_object(&mut self, name: &str, v: u32) -> &mut Self {
        self.add_item_to_object(name).add_uint32(v)
    }

    /// Append a named 64-bit unsigned integer item to the enclosing object.
    pub fn add_uint64_to_object(&mut self, name: &str, v: u64) -> &mut Self {
        self.add_item_to_object(name).add_uint64(v)
    }

    /// Append a named 32-bit real item to the enclosing object.
    pub fn add_float_to_object(&mut self, name: &str, v: f32) -> &mut Self {
        self.add_item_to_object(name).add_float(v)
    }

    /// Append a named 64-bit real item to the enclosing object.
    pub fn add_double_to_object(&mut self, name: &str, v: f64) -> &mut Self {
        self.add_item_to_object(name).add_double(v)
    }

    /// Append a named `null` item to the enclosing object.
    pub fn add_null_to_object(&mut self, name: &str) -> &mut Self {
        self.add_item_to_object(name).add_null()
    }

    /// Append a named `true` item to the enclosing object.
    pub fn add_true_to_object(&mut self, name: &str) -> &mut Self {
        self.add_item_to_object(name).add_true()
    }

    /// Append a named `false` item to the enclosing object.
    pub fn add_false_to_object(&mut self, name: &str) -> &mut Self {
        self.add_item_to_object(name).add_false()
    }

    /// Append a named boolean item to the enclosing object.
    pub fn add_bool_to_object(&mut self, name: &str, v: bool) -> &mut Self {
        self.add_item_to_object(name).add_bool(v)
    }

    /// Append any [`AppendValue`] under its natural opcode.
    pub fn add<T: AppendValue + ?Sized>(&mut self, v: &T) -> &mut Self {
        v.append_value(self);
        self
    }

    /// Append any [`AppendValue`] as a named item of the enclosing object.
    pub fn add_to_object<T: AppendValue + ?Sized>(&mut self, name: &str, v: &T) -> &mut Self {
        self.add_item_to_object(name);
        v.append_value(self);
        self
    }

    /// Finish the payload and rewrite the buffer as a complete wire frame: the header
    /// signature, the COBS-encoded payload (with the terminator as the forbidden byte), the
    /// trailer signature and the final terminator. Returns the frame length.
    ///
    /// The raw payload is first relocated toward the end of the buffer so that the encoder can
    /// write downward from just after the header without overtaking its input. If the frame
    /// overhead does not fit, one growth attempt is made; a formatter that has overrun, or
    /// cannot fit the frame, yields no frame and reports [`JsonbError::Overrun`].
    pub fn format_end(&mut self) -> Result<usize> {
        match self.state {
            FormatState::Overrun => return Err(JsonbError::Overrun),
            FormatState::Framed => return Ok(self.used),
            FormatState::Open => {}
        }

        if !self.frame_fits() {
            // One sized growth attempt before giving up
            let wanted = self.used + self.used / 254 + 8 + FRAME_OVERHEAD;
            let missing = wanted.saturating_sub(self.buf.capacity()).max(1);
            if !self.buf.grow(missing) || !self.frame_fits() {
                self.state = FormatState::Overrun;
                return Err(JsonbError::Overrun);
            }
        }

        let used = self.used;
        let body = self.buf.capacity() - FRAME_OVERHEAD;
        let slack = body - cobs::guaranteed_fit(body);
        let shift = slack + FRAME_OVERHEAD;

        let bytes = self.buf.bytes_mut();
        bytes.copy_within(0..used, shift);
        bytes[..HEADER.len()].copy_from_slice(HEADER);
        let encoded = match cobs::encode_within(bytes, shift, used, HEADER.len(), TERMINATOR) {
            Ok(n) => n,
            Err(e) => {
                self.state = FormatState::Overrun;
                return Err(e);
            }
        };
        let mut at = HEADER.len() + encoded;
        bytes[at..at + TRAILER.len()].copy_from_slice(TRAILER);
        at += TRAILER.len();
        bytes[at] = TERMINATOR;
        at += 1;

        self.used = at;
        self.state = FormatState::Framed;
        Ok(at)
    }

    /// The current payload is guaranteed to frame within the current capacity.
    fn frame_fits(&self) -> bool {
        let body = self.buf.capacity().saturating_sub(FRAME_OVERHEAD);
        body >= 2 && self.used <= cobs::guaranteed_fit(body)
    }

    /// Borrow the completed frame. Only available after a successful [`Formatter::format_end`].
    pub fn frame(&self) -> Result<&[u8]> {
        if self.state == FormatState::Framed {
            Ok(&self.buf.bytes()[..self.used])
        } else {
            Err(JsonbError::NotFramed)
        }
    }

    /// The bytes written so far: the raw payload while formatting, or the completed frame after
    /// [`Formatter::format_end`].
    pub fn bytes(&self) -> &[u8] {
        &self.buf.bytes()[..self.used]
    }

    /// Number of buffer bytes in use.
    pub fn len(&self) -> usize {
        self.used
    }

    /// `true` when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// `true` once an append has failed for lack of space. Sticky until the formatter is
    /// re-created.
    pub fn overrun(&self) -> bool {
        self.state == FormatState::Overrun
    }

    /// Recover the backing buffer.
    pub fn into_inner(self) -> B {
        self.buf
    }
}

/***************************************************************************************************
 * Append Value
 **************************************************************************************************/

/// The `AppendValue` trait encapsulates appending as anything that has a natural opcode in the
/// payload stream. It backs the generic [`Formatter::add`] and [`Formatter::add_to_object`].
pub trait AppendValue {
    /// Append `self` to the formatter under its natural opcode.
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>);
}

impl AppendValue for bool {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_bool(*self);
    }
}

impl AppendValue for i8 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_int8(*self);
    }
}

impl AppendValue for i16 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_int16(*self);
    }
}

impl AppendValue for i32 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_int32(*self);
    }
}

impl AppendValue for i64 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_int64(*self);
    }
}

impl AppendValue for u8 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_uint8(*self);
    }
}

impl AppendValue for u16 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_uint16(*self);
    }
}

impl AppendValue for u32 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_uint32(*self);
    }
}

impl AppendValue for u64 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_uint64(*self);
    }
}

impl AppendValue for f32 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_float(*self);
    }
}

impl AppendValue for f64 {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_double(*self);
    }
}

impl AppendValue for str {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_string(self);
    }
}

impl AppendValue for [u8] {
    #[inline]
    fn append_value<B: FrameBuffer>(&self, fmt: &mut Formatter<B>) {
        fmt.add_bin(self);
    }
}
