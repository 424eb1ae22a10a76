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
 * soi2c Error API
 *
 * Serial-over-I2C transport for framed JSONB requests to a companion module.
 **************************************************************************************************/
use std::result;

#[cfg(any(feature = "std", test))]
use thiserror::Error;

/// An alias for Result<T, Soi2cError> used throughout this crate.
pub type Result<T> = result::Result<T, Soi2cError>;

/// `Soi2cError` describes the ways a transport transaction can fail. All are reported to the
/// caller; none is fatal to the link, and a later transaction may succeed.
#[cfg_attr(any(feature = "std", test), derive(Copy, Clone, Error, Debug))]
#[cfg_attr(all(not(feature = "std"), not(test)), derive(Copy, Clone, Debug))]
pub enum Soi2cError {
    /// The transport is not usable as configured (buffer too small to transact)
    #[cfg_attr(any(feature = "std", test), error("Transport configuration is unusable"))]
    Config,
    /// The request is not terminator-ended, so the module would wait forever
    #[cfg_attr(any(feature = "std", test), error("Request is not terminated"))]
    Terminator,
    /// No room to stage the transmit chunk header ahead of the request
    #[cfg_attr(any(feature = "std", test), error("Request leaves no room for the chunk header"))]
    TxBufferOverflow,
    /// The response outgrew the buffer and no growth was available
    #[cfg_attr(any(feature = "std", test), error("Response does not fit the buffer"))]
    RxBufferOverflow,
    /// The bus rejected a write
    #[cfg_attr(any(feature = "std", test), error("I2C transmit failed"))]
    IoTransmit,
    /// The bus rejected a read
    #[cfg_attr(any(feature = "std", test), error("I2C receive failed"))]
    IoReceive,
    /// The module produced no complete response within the poll budget
    #[cfg_attr(any(feature = "std", test), error("Timed out waiting for a response"))]
    IoTimeout,
    /// The module returned a different byte count than was requested
    #[cfg_attr(any(feature = "std", test), error("Module returned an unexpected byte count"))]
    IoBadSizeReturned,
}
