// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Bus transport seam between the pipeline and the register bus.
//!
//! The pipeline treats the returned code opaquely: `0` is success and any
//! nonzero value is forwarded to the host verbatim. The constants below
//! follow the two-wire convention the deployed firmware used; concrete
//! transports map their error types onto them.

use crate::frame::RegisterFrame;

/// Transaction succeeded.
pub const CODE_OK: u8 = 0;
/// Frame longer than the transport can carry.
pub const CODE_FRAME_TOO_LONG: u8 = 1;
/// Address byte not acknowledged.
pub const CODE_ADDRESS_NACK: u8 = 2;
/// A data byte not acknowledged.
pub const CODE_DATA_NACK: u8 = 3;
/// Any other bus-layer failure.
pub const CODE_OTHER: u8 = 4;
/// Bus timeout.
pub const CODE_TIMEOUT: u8 = 5;

/// An addressed multi-byte register write.
pub trait BusTransport {
    /// Write `frame` to the peripheral at the 7-bit `address`.
    /// Returns [`CODE_OK`] or one of the nonzero failure codes.
    fn transmit(&mut self, address: u8, frame: &RegisterFrame) -> u8;
}

impl BusTransport for Box<dyn BusTransport + Send> {
    fn transmit(&mut self, address: u8, frame: &RegisterFrame) -> u8 {
        (**self).transmit(address, frame)
    }
}

/// In-memory transport for development and tests: records every frame and
/// answers a configurable code. No hardware required.
#[derive(Debug, Default)]
pub struct DummyBus {
    pub response_code: u8,
    pub sent: Vec<(u8, Vec<u8>)>,
}

impl DummyBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(code: u8) -> Self {
        Self {
            response_code: code,
            sent: Vec::new(),
        }
    }
}

impl BusTransport for DummyBus {
    fn transmit(&mut self, address: u8, frame: &RegisterFrame) -> u8 {
        self.sent.push((address, frame.as_bytes().to_vec()));
        self.response_code
    }
}
