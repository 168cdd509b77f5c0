// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Multisynth register planning for the synthesizer's clock outputs.
//!
//! Computes the ordered register writes needed to put one of CLK0-CLK2 on
//! a target frequency, against the fixed 800 MHz VCO. This is host-side
//! planning only; the output-enable step is a read-modify-write against
//! live register state and is not part of a dry-run plan.

use thiserror::Error;

/// External crystal frequency, Hz.
pub const XTAL_FREQ_HZ: u64 = 25_000_000;
/// Fixed VCO frequency (PLL output), Hz.
pub const VCO_FREQ_HZ: u64 = 800_000_000;
/// Lowest plannable output frequency, Hz.
pub const FREQ_MIN_HZ: u64 = 2_500;
/// Highest plannable output frequency, Hz.
pub const FREQ_MAX_HZ: u64 = 200_000_000;

const FRAC_DENOM: u64 = 1_048_575;
const PLL_RESET_REG: u8 = 0xB1;
const PLL_RESET_VALUE: u8 = 0x20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("Invalid CLK number: must be 0, 1, or 2")]
    InvalidClk,
    #[error("Frequency out of range: 2.5 kHz to 200 MHz")]
    FrequencyOutOfRange,
    #[error("Cannot achieve frequency with valid divider")]
    NoValidDivider,
}

/// One register write of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub reg: u8,
    pub value: u8,
}

/// The ordered writes plus the divider parameters they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterPlan {
    pub clk: u8,
    pub freq_hz: u64,
    pub r_divider: u32,
    pub p1: u32,
    pub p2: u32,
    pub p3: u32,
    pub integer_mode: bool,
    pub writes: Vec<RegisterWrite>,
}

/// Ordered writes that bring the device from power-on to a locked 800 MHz
/// PLLA with every output disabled.
///
/// The field procedure also polls status register 0 and reads written
/// values back; those are diagnostics against flaky wiring, not part of
/// the register sequence, so a dry-run plan omits them. The output-enable
/// step stays out for the same reason as in [`plan_frequency`]: it is a
/// read-modify-write against live register state.
pub fn plan_init() -> Vec<RegisterWrite> {
    // PLLA multiplier: 800 MHz VCO from the 25 MHz crystal.
    let mult = VCO_FREQ_HZ / XTAL_FREQ_HZ;
    let p1 = (128 * mult - 512) as u32;

    let mut writes = vec![
        // Mask interrupts, clear sticky status.
        RegisterWrite { reg: 2, value: 0x18 },
        RegisterWrite { reg: 1, value: 0x00 },
        // Spread spectrum off.
        RegisterWrite { reg: 149, value: 0x00 },
        // All outputs disabled until a frequency is configured.
        RegisterWrite { reg: 0x03, value: 0xFF },
        // Crystal load capacitance 10 pF.
        RegisterWrite { reg: 0xB7, value: 0xD2 },
        // Power down the unused CLK3-CLK7 drivers.
        RegisterWrite { reg: 19, value: 0x80 },
        RegisterWrite { reg: 20, value: 0x80 },
        RegisterWrite { reg: 21, value: 0x80 },
        RegisterWrite { reg: 22, value: 0xC0 },
        RegisterWrite { reg: 23, value: 0x80 },
        // PLL input source: crystal.
        RegisterWrite { reg: 0x0F, value: 0x00 },
        // Clock fanout enable.
        RegisterWrite { reg: 0xBB, value: 0x50 },
    ];

    // PLLA feedback multisynth: integer multiplier, P2 = 0, P3 = 1.
    writes.extend([
        RegisterWrite { reg: 26, value: 0x00 },
        RegisterWrite { reg: 27, value: 0x01 },
        RegisterWrite { reg: 28, value: 0x00 },
        RegisterWrite {
            reg: 29,
            value: ((p1 >> 8) & 0xFF) as u8,
        },
        RegisterWrite {
            reg: 30,
            value: (p1 & 0xFF) as u8,
        },
        RegisterWrite { reg: 31, value: 0x00 },
        RegisterWrite { reg: 32, value: 0x00 },
        RegisterWrite { reg: 33, value: 0x00 },
        RegisterWrite {
            reg: PLL_RESET_REG,
            value: PLL_RESET_VALUE,
        },
    ]);

    writes
}

/// Compute the register plan for putting `clk` (0-2) on `freq_hz`.
///
/// Below 500 kHz an additional R divider (powers of two up to 128) is
/// searched so the multisynth divide ratio lands in 8..=2048. The
/// 150-200 MHz band uses the fixed divide-by-4 integer path.
pub fn plan_frequency(clk: u8, freq_hz: u64) -> Result<RegisterPlan, SynthError> {
    if clk > 2 {
        return Err(SynthError::InvalidClk);
    }
    if !(FREQ_MIN_HZ..=FREQ_MAX_HZ).contains(&freq_hz) {
        return Err(SynthError::FrequencyOutOfRange);
    }

    let mut r: u32 = 1;
    let mut r_div: u8 = 0;
    let mut ms_div = VCO_FREQ_HZ as f64 / freq_hz as f64;
    if freq_hz < 500_000 {
        let mut found = false;
        for r_val in [1u32, 2, 4, 8, 16, 32, 64, 128] {
            let candidate = VCO_FREQ_HZ as f64 / (freq_hz as f64 * r_val as f64);
            if (8.0..=2048.0).contains(&candidate) {
                r = r_val;
                ms_div = candidate;
                found = true;
                break;
            }
        }
        if !found {
            return Err(SynthError::NoValidDivider);
        }
        r_div = r.trailing_zeros() as u8;
    }

    let (p1, p2, p3, divby4, integer_mode);
    if freq_hz > 150_000_000 {
        // Divide-by-4 integer path for the top band.
        p1 = 0;
        p2 = 0;
        p3 = 1;
        divby4 = 0x03u8;
        integer_mode = true;
    } else {
        let a = ms_div.floor() as u64;
        let b = ((ms_div - a as f64) * FRAC_DENOM as f64).floor() as u64;
        let c = if b == 0 { 1 } else { FRAC_DENOM };
        p1 = (128 * a + 128 * b / c - 512) as u32;
        p2 = (128 * b - c * (128 * b / c)) as u32;
        p3 = c as u32;
        divby4 = 0x00;
        integer_mode = b == 0 && a % 2 == 0;
    }

    let base_reg = 42 + clk * 8;
    let control_reg = 16 + clk;

    let writes = vec![
        RegisterWrite {
            reg: base_reg,
            value: ((p3 >> 8) & 0xFF) as u8,
        },
        RegisterWrite {
            reg: base_reg + 1,
            value: (p3 & 0xFF) as u8,
        },
        RegisterWrite {
            reg: base_reg + 2,
            value: (r_div << 4) | (divby4 << 2) | ((p1 >> 16) & 0x03) as u8,
        },
        RegisterWrite {
            reg: base_reg + 3,
            value: ((p1 >> 8) & 0xFF) as u8,
        },
        RegisterWrite {
            reg: base_reg + 4,
            value: (p1 & 0xFF) as u8,
        },
        RegisterWrite {
            reg: base_reg + 5,
            value: ((((p3 >> 16) & 0x0F) << 4) | ((p2 >> 16) & 0x0F)) as u8,
        },
        RegisterWrite {
            reg: base_reg + 6,
            value: ((p2 >> 8) & 0xFF) as u8,
        },
        RegisterWrite {
            reg: base_reg + 7,
            value: (p2 & 0xFF) as u8,
        },
        // Control: integer mode flag, PLLA source, max drive strength.
        RegisterWrite {
            reg: control_reg,
            value: (u8::from(integer_mode) << 6) | (0x3 << 2) | 0x3,
        },
        RegisterWrite {
            reg: PLL_RESET_REG,
            value: PLL_RESET_VALUE,
        },
    ];

    Ok(RegisterPlan {
        clk,
        freq_hz,
        r_divider: r,
        p1,
        p2,
        p3,
        integer_mode,
        writes,
    })
}
