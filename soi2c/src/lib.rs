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
 * soi2c module definition
 *
 * Serial-over-I2C transport for framed JSONB requests to a companion module. Requests and
 * responses are newline-terminated frames; the transport moves them across the bus in small
 * chunks using a two-byte availability protocol, and knows nothing about their contents.
 **************************************************************************************************/

// Default configuration
#![no_std]
#![warn(missing_docs)]

//! # SOI2C
//!
//! The `soi2c` crate moves terminator-ended request frames to a companion module over I2C and
//! assembles the module's response, reusing the request buffer as the receive window. The frame
//! contents are opaque here; the `jsonb` crate produces and consumes them.
//!
//! A request is transmitted in chunks of at most 250 bytes, each preceded by a one-byte length.
//! The response is collected by issuing two-byte read requests `[0, n]`; the module replies
//! with `[available, returned]` followed by `returned` data bytes, and the response is complete
//! once a terminator has arrived and the module advertises nothing further. The transport polls
//! within a fixed budget while the module prepares its reply.
//!
//! The caller supplies the bus operations through the [`I2cBus`] trait, and the buffer through
//! the `jsonb` [`FrameBuffer`] seam, so a growable buffer can absorb responses larger than the
//! request.
//!
//! ```
//! use jsonb::encoder::Formatter;
//! use soi2c::{I2cBus, ResponseMode, Soi2c};
//!
//! /// A module that answers every request with a bare terminator.
//! struct QuietBus;
//!
//! impl I2cBus for QuietBus {
//!     fn tx(&mut self, _addr: u16, _buf: &[u8]) -> bool {
//!         true
//!     }
//!     fn rx(&mut self, _addr: u16, buf: &mut [u8]) -> bool {
//!         buf.fill(0);
//!         if buf.len() == 2 {
//!             buf[0] = 1; // one byte pending: the closing terminator
//!         } else {
//!             buf[1] = (buf.len() - 2) as u8;
//!             buf[2] = b'\n';
//!         }
//!         true
//!     }
//!     fn delay_ms(&mut self, _ms: u32) {}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut fmt = Formatter::new(Vec::new());
//! fmt.add_object_begin();
//! fmt.add_string_to_object("req", "card.version");
//! fmt.add_object_end();
//! fmt.format_end()?;
//! let mut buf = fmt.into_inner();
//!
//! let mut port = Soi2c::new(QuietBus);
//! port.transaction(ResponseMode::Ignore, &mut buf)?;
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

extern crate jsonb;

/// The `error` module contains error definitions used throughout `soi2c`.
pub mod error;

pub use error::{Result, Soi2cError};

use jsonb::encoder::FrameBuffer;
use jsonb::types::TERMINATOR;

/// Default I2C address of the companion module
pub const DEFAULT_ADDR: u16 = 0x17;

// Largest data chunk moved across the bus in one transfer
const CHUNK_MAX: usize = 250;
// Read-request and availability header length
const HDR_LEN: usize = 2;
// Pause after transmitting a request chunk
const TX_CHUNK_DELAY_MS: u32 = 250;
// Pause between a read request and the read itself
const RX_REQUEST_DELAY_MS: u32 = 1;
// Pause after receiving a chunk
const RX_CHUNK_DELAY_MS: u32 = 5;
// Total budget for the module to produce its complete response
const RESPONSE_TIMEOUT_MS: u32 = 5000;
// Idle poll interval while the module prepares its response
const POLL_MS: u32 = 50;

/// The bus operations the transport is built on. Implementations may block and sleep; the
/// transport is synchronous and runs on the caller's thread.
pub trait I2cBus {
    /// Write `buf` to the device at `addr`. Returns `false` on a bus error.
    fn tx(&mut self, addr: u16, buf: &[u8]) -> bool;

    /// Read `buf.len()` bytes from the device at `addr` into `buf`. Returns `false` on a bus
    /// error.
    fn rx(&mut self, addr: u16, buf: &mut [u8]) -> bool;

    /// Sleep for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// What to do with the module's response to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Assemble the response at the start of the caller's buffer
    Capture,
    /// Drain the response off the module and discard it
    Ignore,
    /// The request has no response; skip the receive phase entirely
    None,
}

/// A serial-over-I2C port bound to one companion module.
#[derive(Debug)]
pub struct Soi2c<B: I2cBus> {
    bus: B,
    addr: u16,
}

impl<B: I2cBus> Soi2c<B> {
    /// Bind a port to the module at the default address.
    pub fn new(bus: B) -> Soi2c<B> {
        Soi2c {
            bus,
            addr: DEFAULT_ADDR,
        }
    }

    /// Bind a port to the module at `addr`.
    pub fn with_addr(bus: B, addr: u16) -> Soi2c<B> {
        Soi2c { bus, addr }
    }

    /// Borrow the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Recover the underlying bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Flush anything pending on the module from before this host was reset, by sending a lone
    /// terminator and draining whatever comes back. This ensures the first real transaction is
    /// received cleanly.
    pub fn reset(&mut self) -> Result<usize> {
        let mut req = [0u8; 25];
        req[0] = TERMINATOR;
        self.transaction(ResponseMode::Ignore, &mut &mut req[..])
    }

    /// Transmit the terminator-ended request at the start of `buf` and, unless `mode` says
    /// otherwise, collect the module's response into `buf`, growing it when the buffer supports
    /// that. Returns the response length (0 when the response was skipped or discarded).
    ///
    /// The buffer is used as the I/O window for both directions, so the request bytes are
    /// garbage once the transaction begins.
    pub fn transaction<T: FrameBuffer>(&mut self, mode: ResponseMode, buf: &mut T) -> Result<usize> {
        if buf.capacity() < 5 {
            return Err(Soi2cError::Config);
        }

        // The request runs from the start of the buffer through its terminator
        let mut reqlen = 0;
        for (i, &b) in buf.bytes().iter().enumerate() {
            if b == TERMINATOR {
                reqlen = i + 1;
                break;
            }
        }
        if reqlen == 0 {
            return Err(Soi2cError::Terminator);
        }

        // Stage the one-byte chunk header ahead of the request and push it out, at most
        // CHUNK_MAX bytes per transfer, shifting the remainder down after each chunk
        if buf.capacity() - reqlen < 1 {
            return Err(Soi2cError::TxBufferOverflow);
        }
        {
            let bytes = buf.bytes_mut();
            bytes.copy_within(0..reqlen, 1);
            let mut left = reqlen;
            while left > 0 {
                let chunk = left.min(CHUNK_MAX);
                bytes[0] = chunk as u8;
                if !self.bus.tx(self.addr, &bytes[..1 + chunk]) {
                    return Err(Soi2cError::IoTransmit);
                }
                self.bus.delay_ms(TX_CHUNK_DELAY_MS);
                left -= chunk;
                bytes.copy_within(1 + chunk..1 + chunk + left, 1);
            }
        }

        if mode == ResponseMode::None {
            return Ok(0);
        }

        // Receive loop. Each round issues a two-byte read request advertising how much we can
        // take; the module leads its reply with [available, returned]. The response is complete
        // when a terminator has arrived and nothing further is available.
        let mut used = 0;
        let mut chunk: usize = 0;
        let mut ms_left = RESPONSE_TIMEOUT_MS;
        loop {
            if used + HDR_LEN + chunk > buf.capacity() {
                buf.grow(HDR_LEN + chunk);
            }

            // Constrain by whatever room the buffer ended up with
            let room = buf.capacity().saturating_sub(used + HDR_LEN);
            if room == 0 {
                return Err(Soi2cError::RxBufferOverflow);
            }
            let chunklen = chunk.min(room);

            let bytes = buf.bytes_mut();
            bytes[used] = 0;
            bytes[used + 1] = chunklen as u8;
            if !self.bus.tx(self.addr, &bytes[used..used + HDR_LEN]) {
                return Err(Soi2cError::IoTransmit);
            }
            self.bus.delay_ms(RX_REQUEST_DELAY_MS);

            if !self.bus.rx(self.addr, &mut bytes[used..used + HDR_LEN + chunklen]) {
                return Err(Soi2cError::IoReceive);
            }
            self.bus.delay_ms(RX_CHUNK_DELAY_MS);

            let available = bytes[used] as usize;
            let returned = bytes[used + 1] as usize;
            if returned != chunklen {
                return Err(Soi2cError::IoBadSizeReturned);
            }

            let got_terminator =
                bytes[used + HDR_LEN..used + HDR_LEN + chunklen].contains(&TERMINATOR);

            // Keep the chunk only when the caller wants the response; otherwise just flush it
            if mode == ResponseMode::Capture && chunklen > 0 {
                bytes.copy_within(used + HDR_LEN..used + HDR_LEN + chunklen, used);
                used += chunklen;
            }

            // Take everything the module advertised in the next round
            chunk = available;
            if chunk > 0 {
                continue;
            }
            if got_terminator {
                break;
            }

            if ms_left < POLL_MS {
                return Err(Soi2cError::IoTimeout);
            }
            self.bus.delay_ms(POLL_MS);
            ms_left -= POLL_MS;
        }
        Ok(used)
    }

    /// Send a request and capture its response. The response replaces the request in `buf` and
    /// its length is returned.
    pub fn request_response<T: FrameBuffer>(&mut self, buf: &mut T) -> Result<usize> {
        self.transaction(ResponseMode::Capture, buf)
    }

    /// Send a request and discard its response.
    pub fn request<T: FrameBuffer>(&mut self, buf: &mut T) -> Result<usize> {
        self.transaction(ResponseMode::Ignore, buf)
    }

    /// Send a request that produces no response.
    pub fn command<T: FrameBuffer>(&mut self, buf: &mut T) -> Result<usize> {
        self.transaction(ResponseMode::None, buf)
    }
}
