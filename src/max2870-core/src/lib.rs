// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod bus;
pub mod command;
pub mod config;
pub mod frame;
pub mod pipeline;
pub mod report;
pub mod synth;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use bus::{BusTransport, DummyBus};
pub use command::{decode, Command, DecodeError, ProtocolMode};
pub use config::BridgeConfig;
pub use frame::{encode, RegisterFrame};
pub use pipeline::Pipeline;
pub use report::{report, Outcome};
