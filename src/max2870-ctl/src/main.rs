// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::{timeout, Duration};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::warn;

use max2870_app::{init_logging, ConfigFile};
use max2870_core::synth::{plan_frequency, plan_init, RegisterWrite};
use max2870_core::DynResult;

use config::CtlFileConfig;

const PKG_DESCRIPTION: &str = concat!(
    env!("CARGO_PKG_NAME"),
    " - host-side control client for the MAX2870 bridge"
);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"), about = PKG_DESCRIPTION)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Serial port the bridge is attached to (e.g. /dev/ttyUSB0)
    #[arg(short = 'p', long = "port")]
    port: Option<String>,
    /// Serial baud rate
    #[arg(short = 'b', long = "baud")]
    baud: Option<u32>,
    /// Send one command line and exit instead of starting a session
    #[arg(short = 's', long = "send", value_name = "LINE")]
    send: Option<String>,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Compute and print the register plan for a clock output (dry run,
    /// nothing is sent)
    Plan {
        /// Clock output number (0-2)
        clk: u8,
        /// Target frequency in Hz
        freq_hz: u64,
    },
    /// Print the power-on initialization register sequence (dry run,
    /// nothing is sent)
    Init,
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    let (cfg, _) = if let Some(ref path) = cli.config {
        (CtlFileConfig::load_from_file(path)?, Some(path.clone()))
    } else {
        CtlFileConfig::load_from_default_paths()?
    };

    init_logging(cfg.log_level.as_deref());

    match cli.cmd {
        Some(Cmd::Plan { clk, freq_hz }) => return print_plan(clk, freq_hz),
        Some(Cmd::Init) => {
            println!("Power-on initialization sequence:");
            print_writes(&plan_init());
            return Ok(());
        }
        None => {}
    }

    let port_path = match cli.port.clone().or_else(|| cfg.port.clone()) {
        Some(port) => port,
        None => {
            return Err("Serial port not specified. Use --port or set [max2870-ctl].port.".into())
        }
    };
    let baud = cli.baud.unwrap_or(cfg.baud);

    let port = tokio_serial::new(&port_path, baud).open_native_async()?;
    println!("Connected to bridge on {} at {} baud.", port_path, baud);

    if let Some(line) = cli.send {
        return send_one(port, &line).await;
    }
    interactive_session(port).await
}

fn print_plan(clk: u8, freq_hz: u64) -> DynResult<()> {
    let plan = plan_frequency(clk, freq_hz)?;
    println!(
        "CLK{} -> {} Hz: R={}, P1={}, P2={}, P3={}, integer_mode={}",
        plan.clk, plan.freq_hz, plan.r_divider, plan.p1, plan.p2, plan.p3, plan.integer_mode
    );
    print_writes(&plan.writes);
    Ok(())
}

fn print_writes(writes: &[RegisterWrite]) {
    for w in writes {
        println!("  reg 0x{:02X} <- 0x{:02X}", w.reg, w.value);
    }
}

async fn send_one(port: SerialStream, line: &str) -> DynResult<()> {
    let (reader, mut writer) = tokio::io::split(port);
    let mut reader = BufReader::new(reader);
    match exchange(&mut reader, &mut writer, line).await? {
        Some(response) => println!("{}", response),
        None => warn!("No response from bridge within {:?}", RESPONSE_TIMEOUT),
    }
    Ok(())
}

async fn interactive_session(port: SerialStream) -> DynResult<()> {
    let (reader, mut writer) = tokio::io::split(port);
    let mut reader = BufReader::new(reader);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("Enter a command, or 'exit' to quit.");
    loop {
        let Some(input) = stdin.next_line().await? else {
            break;
        };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            println!("Exiting.");
            break;
        }

        match exchange(&mut reader, &mut writer, input).await? {
            Some(response) => println!("Bridge response: {}", response),
            None => warn!("No response from bridge within {:?}", RESPONSE_TIMEOUT),
        }
    }
    Ok(())
}

/// Send one command line and wait for the single response line the bridge
/// answers with. `None` means the bridge did not answer in time.
async fn exchange<R, W>(reader: &mut BufReader<R>, writer: &mut W, line: &str) -> DynResult<Option<String>>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWriteExt + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    let mut response = String::new();
    match timeout(RESPONSE_TIMEOUT, reader.read_line(&mut response)).await {
        Ok(Ok(0)) => Ok(None),
        Ok(Ok(_)) => Ok(Some(response.trim_end().to_string())),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Ok(None),
    }
}
