// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Register frame layout for one bus transaction.

use crate::command::Command;
use crate::config::BridgeConfig;

/// The exact ordered byte sequence placed on the bus for one transaction.
/// Owned by the transaction in progress and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFrame(Vec<u8>);

impl RegisterFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the bus frame for a decoded command. Total: never fails.
///
/// `SetFrequency` produces `[opcode, high, low]` where high/low are bits
/// 8-15 and 0-7 of the frequency. Higher bits are silently discarded;
/// validation happened at decode time.
///
/// `RawPassthrough` copies the payload verbatim, stopping before an
/// embedded NUL. A NUL is an explicit early terminator, not an error.
pub fn encode(cfg: &BridgeConfig, cmd: &Command) -> RegisterFrame {
    match cmd {
        Command::RawPassthrough(payload) => {
            let end = payload
                .iter()
                .position(|&b| b == 0)
                .unwrap_or(payload.len());
            RegisterFrame(payload[..end].to_vec())
        }
        Command::SetFrequency(value) => RegisterFrame(vec![
            cfg.opcode,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{decode, ProtocolMode};

    fn cfg() -> BridgeConfig {
        BridgeConfig::default()
    }

    #[test]
    fn test_set_frequency_frame_layout() {
        let frame = encode(&cfg(), &Command::SetFrequency(0x1234));
        assert_eq!(frame.as_bytes(), &[cfg().opcode, 0x12, 0x34]);
    }

    #[test]
    fn test_set_frequency_big_endian_low_16_bits() {
        for f in [1u64, 255, 256, 0x00FF, 0xFF00, 0xFFFF] {
            let frame = encode(&cfg(), &Command::SetFrequency(f));
            assert_eq!(frame.len(), 3);
            assert_eq!(frame.as_bytes()[1], ((f >> 8) & 0xFF) as u8);
            assert_eq!(frame.as_bytes()[2], (f & 0xFF) as u8);
        }
    }

    #[test]
    fn test_set_frequency_truncates_above_16_bits() {
        // Documented truncation: only bits 0-15 reach the wire.
        let frame = encode(&cfg(), &Command::SetFrequency(0x0001_2345));
        assert_eq!(frame.as_bytes(), &[cfg().opcode, 0x23, 0x45]);
    }

    #[test]
    fn test_passthrough_verbatim() {
        let frame = encode(&cfg(), &Command::RawPassthrough(b"abc 123".to_vec()));
        assert_eq!(frame.as_bytes(), b"abc 123");
    }

    #[test]
    fn test_passthrough_stops_at_nul() {
        let frame = encode(&cfg(), &Command::RawPassthrough(b"ab\0cd".to_vec()));
        assert_eq!(frame.as_bytes(), b"ab");
    }

    #[test]
    fn test_passthrough_round_trip() {
        let payload = "REG05 DEADBEEF";
        let cmd = decode(ProtocolMode::Passthrough, payload).unwrap();
        let frame = encode(&cfg(), &cmd);
        assert_eq!(frame.as_bytes(), payload.as_bytes());
    }

    #[test]
    fn test_opcode_comes_from_config() {
        let mut custom = cfg();
        custom.opcode = 0x5A;
        let frame = encode(&custom, &Command::SetFrequency(1));
        assert_eq!(frame.as_bytes(), &[0x5A, 0x00, 0x01]);
    }
}
