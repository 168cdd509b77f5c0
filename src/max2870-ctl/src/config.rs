// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for max2870-ctl, loaded from the
//! `[max2870-ctl]` section of `max2870-rs.toml`.

use serde::{Deserialize, Serialize};

use max2870_app::ConfigFile;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CtlFileConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
    /// Serial port the bridge is attached to
    pub port: Option<String>,
    /// Baud rate
    pub baud: u32,
}

impl Default for CtlFileConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            port: None,
            baud: 9600,
        }
    }
}

impl ConfigFile for CtlFileConfig {
    fn section_key() -> &'static str {
        "max2870-ctl"
    }
}
