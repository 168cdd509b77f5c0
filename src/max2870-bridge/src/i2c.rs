// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! I2C-backed bus transport.
//!
//! Wraps any `embedded-hal` I2C device and maps its error kinds onto the
//! raw code space the pipeline forwards to the host.

use embedded_hal::i2c::{Error as I2cError, ErrorKind, I2c, NoAcknowledgeSource};

use max2870_core::bus::{BusTransport, CODE_ADDRESS_NACK, CODE_DATA_NACK, CODE_OK, CODE_OTHER};
use max2870_core::frame::RegisterFrame;

pub struct HalBus<I2C> {
    dev: I2C,
}

impl<I2C: I2c> HalBus<I2C> {
    pub fn new(dev: I2C) -> Self {
        Self { dev }
    }
}

impl<I2C: I2c> BusTransport for HalBus<I2C> {
    fn transmit(&mut self, address: u8, frame: &RegisterFrame) -> u8 {
        match self.dev.write(address, frame.as_bytes()) {
            Ok(()) => CODE_OK,
            Err(e) => code_for(e.kind()),
        }
    }
}

fn code_for(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => CODE_ADDRESS_NACK,
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => CODE_DATA_NACK,
        // An unattributed NACK most commonly means nothing answered the
        // address at all.
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => CODE_ADDRESS_NACK,
        _ => CODE_OTHER,
    }
}
