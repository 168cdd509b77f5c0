// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Command grammar for the host-facing serial protocol.
//!
//! One line of text decodes into one [`Command`]. Which grammar applies is
//! a deployment choice ([`ProtocolMode`]), not something the line itself
//! announces, so the decoder takes the mode as an argument.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grammar selected for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolMode {
    /// The whole line is an opaque payload forwarded verbatim.
    Passthrough,
    /// `<token> <integer>`: only the integer after the first space matters.
    #[default]
    Frequency,
}

/// A decoded host command, created once by [`decode`] and consumed once
/// by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RawPassthrough(Vec<u8>),
    SetFrequency(u64),
}

/// Reasons a line can fail to decode. Codes are part of the wire contract
/// (they appear in the `Error Code:` field of error reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("No command received")]
    EmptyCommand,
    #[error("Missing separator in command")]
    MissingSeparator,
    #[error("Invalid frequency value")]
    InvalidNumber,
}

impl DecodeError {
    pub fn code(self) -> u8 {
        match self {
            DecodeError::EmptyCommand => 0,
            DecodeError::MissingSeparator => 1,
            DecodeError::InvalidNumber => 2,
        }
    }
}

/// Decode one raw line under the given grammar.
///
/// Trailing whitespace and line terminators are tolerated whether or not
/// the caller already stripped them. Pure function of its input.
pub fn decode(mode: ProtocolMode, raw_line: &str) -> Result<Command, DecodeError> {
    let line = raw_line.trim_end();
    match mode {
        ProtocolMode::Passthrough => {
            if line.is_empty() {
                return Err(DecodeError::EmptyCommand);
            }
            Ok(Command::RawPassthrough(line.as_bytes().to_vec()))
        }
        ProtocolMode::Frequency => {
            let Some(space) = line.find(' ') else {
                return Err(DecodeError::MissingSeparator);
            };
            let field = line[space + 1..].trim();
            parse_frequency(field).map(Command::SetFrequency)
        }
    }
}

/// Parse the numeric field of a frequency command.
///
/// The legacy firmware used a parser that returns 0 for garbage and told
/// that apart from a genuine zero by comparing against the literal text
/// `"0"`. Both cases are rejected here (the frequency must be positive),
/// but the literal-zero check is kept so that the distinction stays
/// explicit rather than falling out of the integer parse.
fn parse_frequency(field: &str) -> Result<u64, DecodeError> {
    if field == "0" {
        // Genuine zero, still out of range.
        return Err(DecodeError::InvalidNumber);
    }
    let value: i64 = field.parse().map_err(|_| DecodeError::InvalidNumber)?;
    if value <= 0 {
        return Err(DecodeError::InvalidNumber);
    }
    Ok(value as u64)
}
