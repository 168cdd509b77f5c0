// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::{Deserialize, Serialize};

use crate::command::ProtocolMode;

/// Immutable per-deployment configuration for the command pipeline.
///
/// The legacy firmware kept these as compile-time globals; here they are
/// passed in at construction so two pipelines with different settings can
/// coexist (and tests can pick their own values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// 7-bit bus address of the synthesizer.
    pub address: u8,
    /// Leading opcode byte of a set-frequency frame.
    pub opcode: u8,
    /// Grammar the decoder applies to incoming lines.
    pub mode: ProtocolMode,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: 0x68,
            opcode: 0x01,
            mode: ProtocolMode::Frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployed_hardware() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.address, 0x68);
        assert_eq!(cfg.opcode, 0x01);
        assert_eq!(cfg.mode, ProtocolMode::Frequency);
    }

    #[test]
    fn test_mode_parses_from_toml() {
        let cfg: BridgeConfig = toml::from_str("mode = \"passthrough\"").unwrap();
        assert_eq!(cfg.mode, ProtocolMode::Passthrough);
        assert_eq!(cfg.address, 0x68);
    }
}
