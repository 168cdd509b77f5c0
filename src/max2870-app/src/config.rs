// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support shared by the bridge binaries.
//!
//! Each binary reads one named section of `max2870-rs.toml`. Search order:
//! 1. Path given via `--config`
//! 2. `./max2870-rs.toml`
//! 3. `~/.config/max2870-rs/max2870-rs.toml`
//! 4. `/etc/max2870-rs/max2870-rs.toml`

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "max2870-rs.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("max2870-rs").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from("/etc/max2870-rs").join(CONFIG_FILE_NAME));
    paths
}

/// Deserialize one named section of a TOML file, applying serde defaults.
/// `Ok(None)` means the file parsed but has no such section.
fn load_section<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Option<T>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

    let table: toml::Table = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

    let Some(section) = table.get(key) else {
        return Ok(None);
    };

    section
        .clone()
        .try_into::<T>()
        .map(Some)
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
}

/// A config struct tied to a `[section]` of `max2870-rs.toml`.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Section key, e.g. `"max2870-bridge"`.
    fn section_key() -> &'static str;

    /// Load the section from an explicit path; the section must exist.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        load_section::<Self>(path, Self::section_key())?.ok_or_else(|| {
            ConfigError::ParseError(
                path.to_path_buf(),
                format!("missing [{}] section", Self::section_key()),
            )
        })
    }

    /// Search the default paths and load the first file containing the
    /// section. Falls back to defaults when nothing is found.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in config_search_paths() {
            if path.exists() {
                if let Some(cfg) = load_section::<Self>(&path, Self::section_key())? {
                    return Ok((cfg, Some(path)));
                }
            }
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct TestSection {
        port: Option<String>,
        baud: u32,
    }

    impl ConfigFile for TestSection {
        fn section_key() -> &'static str {
            "test-section"
        }
    }

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("max2870-{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_existing_section() {
        let path = write_temp(
            "existing",
            "[test-section]\nport = \"/dev/ttyUSB0\"\nbaud = 9600\n",
        );
        let cfg = TestSection::load_from_file(&path).unwrap();
        assert_eq!(cfg.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cfg.baud, 9600);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let path = write_temp("missing", "[other-section]\nbaud = 1\n");
        let err = TestSection::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_, _)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let err = TestSection::load_from_file(Path::new("/nonexistent/max2870-rs.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_, _)));
    }
}
