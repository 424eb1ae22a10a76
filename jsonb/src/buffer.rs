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
 * Frame buffer storage seam
 *
 * A compact, memory efficient, serializer, deserializer and framer for binary JSON (JSONB).
 * This implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/
#[cfg(any(feature = "std", test))]
use std::vec::Vec;

/// Backing storage for a formatter or transport buffer: a span of initialized bytes with a
/// capacity and, optionally, the ability to grow.
///
/// A fixed `&mut [u8]` refuses growth, so a write that does not fit becomes an overrun; with the
/// `std` feature a `Vec<u8>` grows with headroom instead. Implementations must not retain
/// references to the span across calls: `grow` may move the storage.
pub trait FrameBuffer {
    /// The full backing span.
    fn bytes(&self) -> &[u8];

    /// The full backing span, mutably.
    fn bytes_mut(&mut self) -> &mut [u8];

    /// Current capacity in bytes.
    #[inline]
    fn capacity(&self) -> usize {
        self.bytes().len()
    }

    /// Make room for at least `needed` additional bytes, returning `false` when the storage
    /// cannot grow. Existing content is preserved.
    fn grow(&mut self, needed: usize) -> bool;
}

/// A caller-supplied fixed buffer. Growth is refused.
impl FrameBuffer for &mut [u8] {
    #[inline]
    fn bytes(&self) -> &[u8] {
        &**self
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut **self
    }

    #[inline]
    fn grow(&mut self, _needed: usize) -> bool {
        false
    }
}

/// A heap buffer whose length is its capacity. Growth zero-extends with headroom so that a long
/// run of small appends does not reallocate on every call.
#[cfg(any(feature = "std", test))]
impl FrameBuffer for Vec<u8> {
    #[inline]
    fn bytes(&self) -> &[u8] {
        self.as_slice()
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }

    fn grow(&mut self, needed: usize) -> bool {
        let headroom = needed.max(self.len() / 2).max(32);
        self.resize(self.len() + headroom, 0);
        true
    }
}
