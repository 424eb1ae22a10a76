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
 * jsonb Error API
 *
 * A compact, memory efficient, serializer, deserializer and framer for binary JSON (JSONB).
 * This implementation is designed for use in constrained systems and requires neither the Rust
 * standard library nor an allocator.
 **************************************************************************************************/
use std::result;

#[cfg(any(feature = "std", test))]
use thiserror::Error;

/// An alias for Result<T, JsonbError> used throughout this crate.
pub type Result<T> = result::Result<T, JsonbError>;

/// `JsonbError` describes the ways formatting, framing and parsing can fail.
#[cfg_attr(any(feature = "std", test), derive(Copy, Clone, Error, Debug))]
#[cfg_attr(all(not(feature = "std"), not(test)), derive(Copy, Clone, Debug))]
pub enum JsonbError {
    /// Buffer too short for the bytes being written
    #[cfg_attr(any(feature = "std", test), error("Buffer insufficient for the next write"))]
    EndOfBuffer,
    /// An append did not fit and the buffer refused to grow. The condition is sticky: once it
    /// occurs, no frame will be emitted for this formatting pass.
    #[cfg_attr(
        any(feature = "std", test),
        error("Formatter overran its buffer and no growth was available")
    )]
    Overrun,
    /// The buffer does not hold a completed frame
    #[cfg_attr(any(feature = "std", test), error("No completed frame in this buffer"))]
    NotFramed,
    /// The input does not begin with the frame header signature
    #[cfg_attr(any(feature = "std", test), error("Input does not begin with the frame header"))]
    MissingHeader,
    /// The input does not end with the frame trailer signature
    #[cfg_attr(any(feature = "std", test), error("Input does not end with the frame trailer"))]
    MissingTrailer,
    /// Encoding is illegal or unsupported
    #[cfg_attr(any(feature = "std", test), error("Encoding is illegal or unsupported"))]
    MalformedEncoding,
}
