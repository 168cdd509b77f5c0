// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for max2870-bridge.
//!
//! Loaded from the `[max2870-bridge]` section of `max2870-rs.toml`
//! (CWD → XDG config → /etc). CLI arguments override file values.

use serde::{Deserialize, Serialize};

use max2870_app::ConfigFile;
use max2870_core::command::ProtocolMode;

/// `[max2870-bridge]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeFileConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
    /// Grammar applied to incoming lines
    pub mode: Option<ProtocolMode>,
    /// Host-facing serial port
    pub serial: SerialConfig,
    /// Peripheral bus
    pub bus: BusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial device path (e.g. /dev/ttyUSB0)
    pub port: Option<String>,
    /// Baud rate
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: 9600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// I2C device path (e.g. /dev/i2c-1)
    pub device: Option<String>,
    /// 7-bit peripheral address
    pub address: u8,
    /// Opcode byte of a set-frequency frame
    pub opcode: u8,
    /// Use the in-memory dummy bus instead of real hardware
    pub dummy: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            device: None,
            address: 0x68,
            opcode: 0x01,
            dummy: false,
        }
    }
}

impl ConfigFile for BridgeFileConfig {
    fn section_key() -> &'static str {
        "max2870-bridge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = BridgeFileConfig::default();
        assert_eq!(cfg.serial.baud, 9600);
        assert_eq!(cfg.bus.address, 0x68);
        assert_eq!(cfg.bus.opcode, 0x01);
        assert!(!cfg.bus.dummy);
        assert_eq!(cfg.mode, None);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
mode = "passthrough"

[serial]
port = "/dev/ttyUSB0"

[bus]
device = "/dev/i2c-1"
"#;
        let cfg: BridgeFileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.mode, Some(ProtocolMode::Passthrough));
        assert_eq!(cfg.serial.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cfg.serial.baud, 9600);
        assert_eq!(cfg.bus.device.as_deref(), Some("/dev/i2c-1"));
        assert_eq!(cfg.bus.address, 0x68);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
log_level = "debug"
mode = "frequency"

[serial]
port = "/dev/serial0"
baud = 115200

[bus]
device = "/dev/i2c-3"
address = 0x2A
opcode = 0x05
dummy = true
"#;
        let cfg: BridgeFileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.mode, Some(ProtocolMode::Frequency));
        assert_eq!(cfg.serial.baud, 115200);
        assert_eq!(cfg.bus.address, 0x2A);
        assert_eq!(cfg.bus.opcode, 0x05);
        assert!(cfg.bus.dummy);
    }
}
