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
 * XOR-parameterized COBS codec
 *
 * Consistent Overhead Byte Stuffing (Cheshire & Baker, IEEE/ACM Transactions on Networking 7(2))
 * generalized by a forbidden byte: every output byte of the canonical zero-eliminating encoding
 * is XORed with `xor`, so that `xor` itself is the byte guaranteed absent from the output and
 * can be used as an unambiguous frame delimiter on the wire.
 **************************************************************************************************/
use crate::error::{JsonbError, Result};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Worst-case encoded length for an `n`-byte payload: a leading code byte, plus one extra code
/// byte per 254 payload bytes.
#[inline]
pub fn max_encoded_length(n: usize) -> usize {
    n + n / 254 + 1
}

/// The largest payload guaranteed to fit in a buffer of `buflen` bytes after worst-case
/// encoding, or 0 when the buffer cannot even hold the encoding overhead.
#[cfg_attr(feature = "trace", trace)]
pub fn guaranteed_fit(buflen: usize) -> usize {
    let overhead = 1 + buflen / 254 + 1;
    if overhead > buflen {
        0
    } else {
        buflen - overhead
    }
}

/// The exact encoded length of `src`, without encoding it.
#[cfg_attr(feature = "trace", trace)]
pub fn encoded_length(src: &[u8]) -> usize {
    let mut len = 1;
    let mut code: u8 = 1;
    for &ch in src {
        if ch != 0 {
            len += 1;
            code += 1;
        }
        if ch == 0 || code == 0xFF {
            code = 1;
            len += 1;
        }
    }
    len
}

/// Encode `src` into `dst`, returning the number of bytes written.
///
/// No byte of the output equals `xor`. `dst` must be sized for the worst case (see
/// [`max_encoded_length`]); `Err(EndOfBuffer)` is returned if it is not.
#[cfg_attr(feature = "trace", trace)]
pub fn encode(src: &[u8], xor: u8, dst: &mut [u8]) -> Result<usize> {
    if dst.is_empty() {
        return Err(JsonbError::EndOfBuffer);
    }
    let mut code: u8 = 1;
    let mut code_at = 0; // Where the pending run length will be written
    let mut wr = 1;
    for &ch in src {
        if ch != 0 {
            if wr >= dst.len() {
                return Err(JsonbError::EndOfBuffer);
            }
            dst[wr] = ch ^ xor;
            wr += 1;
            code += 1;
        }
        if ch == 0 || code == 0xFF {
            // Zero input byte or complete run: emit the code and reserve the next position
            dst[code_at] = code ^ xor;
            code = 1;
            if wr >= dst.len() {
                return Err(JsonbError::EndOfBuffer);
            }
            code_at = wr;
            wr += 1;
        }
    }
    dst[code_at] = code ^ xor;
    Ok(wr)
}

/// Encode a region of `buf` into an earlier region of the same span.
///
/// This is the encoder used when finalizing a frame: the raw payload has been relocated toward
/// the end of the buffer, and the encoded form is written downward from `dst_start`. The caller
/// guarantees `dst_start + max_encoded_length(src_len) <= src_start + src_len`, so the write
/// cursor never overtakes the read cursor.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn encode_within(
    buf: &mut [u8],
    src_start: usize,
    src_len: usize,
    dst_start: usize,
    xor: u8,
) -> Result<usize> {
    if dst_start >= buf.len() || src_start + src_len > buf.len() {
        return Err(JsonbError::EndOfBuffer);
    }
    let mut rd = src_start;
    let end = src_start + src_len;
    let mut code: u8 = 1;
    let mut code_at = dst_start;
    let mut wr = dst_start + 1;
    while rd < end {
        let ch = buf[rd];
        rd += 1;
        if ch != 0 {
            if wr >= buf.len() {
                return Err(JsonbError::EndOfBuffer);
            }
            buf[wr] = ch ^ xor;
            wr += 1;
            code += 1;
        }
        if ch == 0 || code == 0xFF {
            buf[code_at] = code ^ xor;
            code = 1;
            if wr >= buf.len() {
                return Err(JsonbError::EndOfBuffer);
            }
            code_at = wr;
            wr += 1;
        }
    }
    buf[code_at] = code ^ xor;
    Ok(wr - dst_start)
}

/// Decode `buf` in place, returning the number of decoded bytes at the front of the span.
///
/// The decoded form is never longer than the encoded form, so decoding works on a single
/// mutable span with a read cursor that stays ahead of the write cursor; the usual
/// caller passes the same bytes it received from the wire. A decoded run length of zero (a
/// byte equal to `xor` on the wire) terminates the decode; a run that promises more bytes
/// than remain is malformed.
#[cfg_attr(feature = "trace", trace)]
pub fn decode_in_place(buf: &mut [u8], xor: u8) -> Result<usize> {
    let mut rd = 0;
    let mut wr = 0;
    let mut code: u8 = 0xFF;
    let mut copy: u8 = 0;
    while rd < buf.len() {
        if copy != 0 {
            buf[wr] = buf[rd] ^ xor;
            wr += 1;
            rd += 1;
        } else {
            if code != 0xFF {
                // The previous run ended short of 255 bytes: restore the zero it encoded
                buf[wr] = 0;
                wr += 1;
            }
            code = buf[rd] ^ xor;
            rd += 1;
            copy = code;
            if code == 0 {
                return Ok(wr);
            }
        }
        copy -= 1;
    }
    if copy != 0 {
        Err(JsonbError::MalformedEncoding)
    } else {
        Ok(wr)
    }
}
