// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! One-command processing cycle: decode -> encode -> transmit -> report.

use tracing::debug;

use crate::bus::{BusTransport, CODE_OK};
use crate::command::{decode, Command};
use crate::config::BridgeConfig;
use crate::frame::encode;
use crate::report::{report, Outcome};

/// Drives the full cycle for one line at a time.
///
/// Stateless across lines: every line is decoded, transmitted and reported
/// independently, and a decode error never reaches the bus. The transport
/// is the only collaborator with side effects.
pub struct Pipeline<B: BusTransport> {
    cfg: BridgeConfig,
    bus: B,
}

impl<B: BusTransport> Pipeline<B> {
    pub fn new(cfg: BridgeConfig, bus: B) -> Self {
        Self { cfg, bus }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.cfg
    }

    /// Run one full cycle and return the outcome.
    pub fn run_cycle(&mut self, line: &str) -> Outcome {
        let cmd = match decode(self.cfg.mode, line) {
            Ok(cmd) => cmd,
            Err(e) => return Outcome::DecodeFailed(e),
        };
        let frame = encode(&self.cfg, &cmd);
        debug!(
            "bus write: addr=0x{:02X} frame={:02X?}",
            self.cfg.address,
            frame.as_bytes()
        );
        let code = self.bus.transmit(self.cfg.address, &frame);
        if code != CODE_OK {
            return Outcome::BusFailed { raw_code: code };
        }
        Outcome::Success {
            echo: echo_for(&cmd, line),
        }
    }

    /// Run one full cycle and format the report line for the host.
    pub fn process_line(&mut self, line: &str) -> String {
        report(&self.run_cycle(line))
    }
}

/// What the success report echoes back: the original command text in
/// passthrough mode, the accepted frequency in frequency mode.
fn echo_for(cmd: &Command, line: &str) -> String {
    match cmd {
        Command::RawPassthrough(_) => line.trim_end().to_string(),
        Command::SetFrequency(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::DummyBus;
    use crate::command::{DecodeError, ProtocolMode};

    fn freq_pipeline(bus: DummyBus) -> Pipeline<DummyBus> {
        Pipeline::new(BridgeConfig::default(), bus)
    }

    fn passthrough_pipeline(bus: DummyBus) -> Pipeline<DummyBus> {
        let cfg = BridgeConfig {
            mode: ProtocolMode::Passthrough,
            ..BridgeConfig::default()
        };
        Pipeline::new(cfg, bus)
    }

    #[test]
    fn test_frequency_success_cycle() {
        let mut p = freq_pipeline(DummyBus::new());
        assert_eq!(
            p.process_line("setF 4660"),
            "SUCCESS: I2C transmission successful, command sent: 4660"
        );
        assert_eq!(p.bus.sent, vec![(0x68, vec![0x01, 0x12, 0x34])]);
    }

    #[test]
    fn test_passthrough_success_cycle() {
        let mut p = passthrough_pipeline(DummyBus::new());
        assert_eq!(
            p.process_line("hello\r\n"),
            "SUCCESS: I2C transmission successful, command sent: hello"
        );
        assert_eq!(p.bus.sent, vec![(0x68, b"hello".to_vec())]);
    }

    #[test]
    fn test_bus_failure_reported_with_raw_code() {
        let mut p = freq_pipeline(DummyBus::failing(2));
        assert_eq!(
            p.process_line("setF 1000"),
            "ERROR: I2C transmission failed | Error Code: 2"
        );
    }

    #[test]
    fn test_decode_error_never_reaches_bus() {
        let mut p = freq_pipeline(DummyBus::new());
        assert_eq!(
            p.run_cycle("noSpaceHere"),
            Outcome::DecodeFailed(DecodeError::MissingSeparator)
        );
        assert_eq!(
            p.run_cycle("setF 0"),
            Outcome::DecodeFailed(DecodeError::InvalidNumber)
        );
        assert!(p.bus.sent.is_empty());
    }

    #[test]
    fn test_cycles_are_independent() {
        let mut p = freq_pipeline(DummyBus::new());
        let _ = p.process_line("bad");
        assert_eq!(
            p.process_line("setF 1"),
            "SUCCESS: I2C transmission successful, command sent: 1"
        );
        assert_eq!(p.bus.sent.len(), 1);
    }
}
