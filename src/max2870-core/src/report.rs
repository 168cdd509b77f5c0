// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Status reports sent back to the host.
//!
//! The line shapes are a wire contract with the host-side tooling:
//!
//! ```text
//! ERROR: <message> | Error Code: <code>
//! SUCCESS: <message>
//! ```
//!
//! Do not change them silently.

use crate::command::DecodeError;

/// Result of one full decode -> encode -> transmit cycle. Produced by the
/// pipeline, consumed immediately by [`report`], never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    DecodeFailed(DecodeError),
    BusFailed { raw_code: u8 },
    Success { echo: String },
}

/// Format one outcome as the report line for the host. Pure: the same
/// outcome always yields the same text.
pub fn report(outcome: &Outcome) -> String {
    match outcome {
        Outcome::DecodeFailed(e) => {
            format!("ERROR: {} | Error Code: {}", e, e.code())
        }
        Outcome::BusFailed { raw_code } => {
            format!("ERROR: I2C transmission failed | Error Code: {}", raw_code)
        }
        Outcome::Success { echo } => {
            format!("SUCCESS: I2C transmission successful, command sent: {}", echo)
        }
    }
}
