// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod i2c;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use linux_embedded_hal::I2cdev;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use max2870_app::{init_logging, ConfigFile};
use max2870_core::bus::BusTransport;
use max2870_core::command::ProtocolMode;
use max2870_core::{BridgeConfig, DummyBus, DynResult, Pipeline};

use config::BridgeFileConfig;
use i2c::HalBus;

const PKG_DESCRIPTION: &str = concat!(
    env!("CARGO_PKG_NAME"),
    " - serial to I2C bridge for the MAX2870 synthesizer"
);
const GREETING: &str = "SUCCESS: MAX2870 bridge ready to receive commands";

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"), about = PKG_DESCRIPTION)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Host-facing serial port (e.g. /dev/ttyUSB0)
    #[arg(short = 'p', long = "port")]
    port: Option<String>,
    /// Serial baud rate
    #[arg(short = 'b', long = "baud")]
    baud: Option<u32>,
    /// Command grammar for incoming lines
    #[arg(short = 'm', long = "mode", value_enum)]
    mode: Option<ModeKind>,
    /// I2C device path (e.g. /dev/i2c-1)
    #[arg(short = 'd', long = "i2c-dev")]
    i2c_dev: Option<String>,
    /// 7-bit peripheral address (decimal or 0x-prefixed hex)
    #[arg(short = 'a', long = "address", value_parser = parse_byte)]
    address: Option<u8>,
    /// Opcode byte of a set-frequency frame (decimal or 0x-prefixed hex)
    #[arg(long = "opcode", value_parser = parse_byte)]
    opcode: Option<u8>,
    /// Use the in-memory dummy bus instead of real hardware
    #[arg(long = "dummy-bus")]
    dummy_bus: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeKind {
    Passthrough,
    Frequency,
}

impl From<ModeKind> for ProtocolMode {
    fn from(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Passthrough => ProtocolMode::Passthrough,
            ModeKind::Frequency => ProtocolMode::Frequency,
        }
    }
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let result = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    result.map_err(|e| format!("Invalid byte value '{}': {}", s, e))
}

/// Resolved configuration after merging config file and CLI arguments.
struct ResolvedConfig {
    serial_port: String,
    baud: u32,
    i2c_dev: Option<String>,
    dummy_bus: bool,
    bridge: BridgeConfig,
}

fn resolve_config(cli: &Cli, cfg: &BridgeFileConfig) -> DynResult<ResolvedConfig> {
    let serial_port = match cli.port.clone().or_else(|| cfg.serial.port.clone()) {
        Some(port) => port,
        None => {
            return Err(
                "Serial port not specified. Use --port or set [serial].port in config.".into(),
            )
        }
    };

    let dummy_bus = cli.dummy_bus || cfg.bus.dummy;
    let i2c_dev = cli.i2c_dev.clone().or_else(|| cfg.bus.device.clone());
    if !dummy_bus && i2c_dev.is_none() {
        return Err(
            "I2C device not specified. Use --i2c-dev, set [bus].device in config, or pass --dummy-bus.".into(),
        );
    }

    Ok(ResolvedConfig {
        serial_port,
        baud: cli.baud.unwrap_or(cfg.serial.baud),
        i2c_dev,
        dummy_bus,
        bridge: BridgeConfig {
            address: cli.address.unwrap_or(cfg.bus.address),
            opcode: cli.opcode.unwrap_or(cfg.bus.opcode),
            mode: cli
                .mode
                .map(ProtocolMode::from)
                .or(cfg.mode)
                .unwrap_or_default(),
        },
    })
}

fn example_toml() -> &'static str {
    r#"[max2870-bridge]
log_level = "info"
mode = "frequency"

[max2870-bridge.serial]
port = "/dev/ttyUSB0"
baud = 9600

[max2870-bridge.bus]
device = "/dev/i2c-1"
address = 0x68
opcode = 0x01
dummy = false
"#
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", example_toml());
        return Ok(());
    }

    let (cfg, config_path) = if let Some(ref path) = cli.config {
        (BridgeFileConfig::load_from_file(path)?, Some(path.clone()))
    } else {
        BridgeFileConfig::load_from_default_paths()?
    };

    init_logging(cfg.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let resolved = resolve_config(&cli, &cfg)?;
    info!(
        "Starting max2870-bridge (serial {} @ {} baud, mode {:?}, address 0x{:02X})",
        resolved.serial_port, resolved.baud, resolved.bridge.mode, resolved.bridge.address
    );

    let bus: Box<dyn BusTransport + Send> = if resolved.dummy_bus {
        info!("Using dummy bus (no hardware writes)");
        Box::new(DummyBus::new())
    } else {
        let dev_path = resolved.i2c_dev.as_deref().unwrap_or("/dev/i2c-1");
        let dev = I2cdev::new(dev_path)
            .map_err(|e| format!("Failed to open I2C device {}: {}", dev_path, e))?;
        info!("Opened I2C device {}", dev_path);
        Box::new(HalBus::new(dev))
    };

    let pipeline = Pipeline::new(resolved.bridge, bus);
    serve(&resolved.serial_port, resolved.baud, pipeline).await
}

/// Read one line at a time from the host and answer each before reading
/// the next. One command is in flight at most; there is no queue.
async fn serve(
    port_path: &str,
    baud: u32,
    mut pipeline: Pipeline<Box<dyn BusTransport + Send>>,
) -> DynResult<()> {
    let port = tokio_serial::new(port_path, baud).open_native_async()?;
    let (reader, mut writer) = tokio::io::split(port);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    writer.write_all(GREETING.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    writer.flush().await?;

    loop {
        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf).await?;
        if bytes_read == 0 {
            info!("Serial port closed, shutting down");
            break;
        }
        // Blank lines are not skipped: an empty command is a decode error
        // the host expects to be told about.
        let line = line_from_bytes(&buf);
        debug!("received line: {:?}", line.trim_end());
        let response = pipeline.process_line(&line);
        if response.starts_with("ERROR") {
            warn!("{}", response);
        }

        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\r\n").await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Decode a received line for the pipeline. A serial line can deliver
/// garbage bytes; those must surface as a decode error report, not kill
/// the read loop, so invalid UTF-8 is replaced rather than rejected.
fn line_from_bytes(buf: &[u8]) -> std::borrow::Cow<'_, str> {
    match std::str::from_utf8(buf) {
        Ok(s) => std::borrow::Cow::Borrowed(s),
        Err(_) => {
            warn!("received non-UTF-8 bytes on serial line");
            String::from_utf8_lossy(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cli() -> Cli {
        Cli {
            config: None,
            print_config: false,
            port: None,
            baud: None,
            mode: None,
            i2c_dev: None,
            address: None,
            opcode: None,
            dummy_bus: false,
        }
    }

    #[test]
    fn test_parse_byte_decimal_and_hex() {
        assert_eq!(parse_byte("104").unwrap(), 0x68);
        assert_eq!(parse_byte("0x68").unwrap(), 0x68);
        assert_eq!(parse_byte("0X05").unwrap(), 5);
        assert!(parse_byte("0x100").is_err());
        assert!(parse_byte("garbage").is_err());
    }

    #[test]
    fn test_resolve_requires_serial_port() {
        let cfg = BridgeFileConfig::default();
        assert!(resolve_config(&empty_cli(), &cfg).is_err());
    }

    #[test]
    fn test_resolve_requires_bus_unless_dummy() {
        let mut cli = empty_cli();
        cli.port = Some("/dev/ttyUSB0".to_string());
        let cfg = BridgeFileConfig::default();
        assert!(resolve_config(&cli, &cfg).is_err());

        cli.dummy_bus = true;
        let resolved = resolve_config(&cli, &cfg).unwrap();
        assert!(resolved.dummy_bus);
        assert_eq!(resolved.baud, 9600);
        assert_eq!(resolved.bridge.mode, ProtocolMode::Frequency);
    }

    #[test]
    fn test_noisy_line_yields_report_not_failure() {
        // A burst of non-UTF-8 garbage on the serial line must come back
        // as a decode error report and leave the loop running.
        let line = line_from_bytes(b"\xFF\xFE garbage \xFF\n");
        let mut pipeline = Pipeline::new(
            BridgeConfig::default(),
            Box::new(DummyBus::new()) as Box<dyn BusTransport + Send>,
        );
        let response = pipeline.process_line(&line);
        assert!(response.starts_with("ERROR:"), "got {:?}", response);
    }

    #[test]
    fn test_valid_utf8_borrows_unchanged() {
        let line = line_from_bytes(b"setF 1000\r\n");
        assert_eq!(&*line, "setF 1000\r\n");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut cli = empty_cli();
        cli.port = Some("/dev/ttyACM0".to_string());
        cli.baud = Some(115200);
        cli.mode = Some(ModeKind::Passthrough);
        cli.address = Some(0x2A);
        cli.dummy_bus = true;

        let mut cfg = BridgeFileConfig::default();
        cfg.serial.port = Some("/dev/ttyUSB0".to_string());
        cfg.mode = Some(ProtocolMode::Frequency);

        let resolved = resolve_config(&cli, &cfg).unwrap();
        assert_eq!(resolved.serial_port, "/dev/ttyACM0");
        assert_eq!(resolved.baud, 115200);
        assert_eq!(resolved.bridge.mode, ProtocolMode::Passthrough);
        assert_eq!(resolved.bridge.address, 0x2A);
    }
}
