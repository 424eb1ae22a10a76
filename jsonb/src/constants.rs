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
 * jsonb wire constants
 *
 * A compact, memory efficient, serializer, deserializer and framer for binary JSON (JSONB).
 * This implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/

/// Signature bytes that begin every frame
pub const HEADER: &[u8] = b"{:";
/// Signature bytes that end the encoded body of every frame
pub const TRAILER: &[u8] = b":}";
/// Frame delimiter. COBS encoding of the body guarantees this byte appears in a frame exactly
/// once, as its final byte.
pub const TERMINATOR: u8 = b'\n';

// Fixed framing cost of a payload: header, trailer and the trailing terminator
pub(crate) const FRAME_OVERHEAD: usize = HEADER.len() + TRAILER.len() + 1;

/// Opcode group bitmask (high nibble)
pub const GROUP_MASK: u8 = 0xF0;
/// Payload width bitmask (low nibble). For the integer and real groups the low nibble of the
/// opcode is the width of the value in bytes.
pub const WIDTH_MASK: u8 = 0x0F;

/// Opcode group: object and array delimiters
pub const GROUP_CONTAINER: u8 = 0x10;
/// Opcode group: null and boolean literals
pub const GROUP_LITERAL: u8 = 0x20;
/// Opcode group: item names (direct children of an object)
pub const GROUP_ITEM: u8 = 0x30;
/// Opcode group: NUL-terminated UTF-8 strings
pub const GROUP_STRING: u8 = 0x40;
/// Opcode group: length-prefixed binary payloads
pub const GROUP_BIN: u8 = 0x50;
/// Opcode group: little-endian signed integers
pub const GROUP_INT: u8 = 0x60;
/// Opcode group: little-endian unsigned integers
pub const GROUP_UINT: u8 = 0x70;
/// Opcode group: little-endian IEEE-754 reals
pub const GROUP_REAL: u8 = 0x80;
