//! Low-frequency oscillator (`GP_LFOSC`) model
//!
//! An ideal oscillator: no jitter, no temperature drift, no startup delay.
//! The nominal output is 1.73 kHz, so `CLKOUT` toggles every 289017 ns
//! multiplied by the `OUT_DIV` ratio. The output starts low at power-on, so
//! the first transition is a rising edge.
//! Not cycle-accurate to silicon.

use crate::error::{CellError, Result};
use crate::kind::PrimitiveKind;
use crate::params::{param_with, parse_uint, CellParams};

/// Undivided half period of the oscillator output
pub const LFOSC_HALF_PERIOD_NS: u64 = 289_017;

/// Output divider ratios the oscillator supports
pub const LFOSC_DIVIDERS: [u8; 4] = [1, 2, 4, 16];

/// Behavioral state of one `GP_LFOSC`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowFrequencyOscillator {
    pwrdn_en: bool,
    auto_pwrdn: bool,
    out_div: u8,
    clkout: bool,
    phase_ns: u64,
}

impl Default for LowFrequencyOscillator {
    fn default() -> Self {
        Self {
            pwrdn_en: false,
            auto_pwrdn: false,
            out_div: 1,
            clkout: false,
            phase_ns: 0,
        }
    }
}

impl LowFrequencyOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `PWRDN_EN`, `AUTO_PWRDN` and `OUT_DIV` parameters
    pub fn from_params(params: &CellParams) -> Result<Self> {
        let cell = PrimitiveKind::LfOsc.name();
        let flag = |v: &str| match parse_uint(v)? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        };
        let divider = |v: &str| {
            parse_uint(v)
                .and_then(|d| u8::try_from(d).ok())
                .filter(|d| LFOSC_DIVIDERS.contains(d))
        };
        let mut osc = Self::new()
            .with_power_down(param_with(params, cell, "PWRDN_EN", flag)?.unwrap_or(false))
            .with_auto_power_down(param_with(params, cell, "AUTO_PWRDN", flag)?.unwrap_or(false));
        if let Some(div) = param_with(params, cell, "OUT_DIV", divider)? {
            osc.out_div = div;
        }
        Ok(osc)
    }

    /// Allow the `PWRDN` pin to stop the oscillator
    pub fn with_power_down(mut self, enabled: bool) -> Self {
        self.pwrdn_en = enabled;
        self
    }

    /// Record the automatic power-down setting. Auto power-down depends on
    /// chip-level activity and is not modeled.
    pub fn with_auto_power_down(mut self, enabled: bool) -> Self {
        self.auto_pwrdn = enabled;
        self
    }

    pub fn with_divider(mut self, out_div: u8) -> Result<Self> {
        if !LFOSC_DIVIDERS.contains(&out_div) {
            return Err(CellError::InvalidParameter {
                cell: PrimitiveKind::LfOsc.name().to_string(),
                param: "OUT_DIV".to_string(),
                value: out_div.to_string(),
            });
        }
        self.out_div = out_div;
        Ok(self)
    }

    pub fn divider(&self) -> u8 {
        self.out_div
    }

    pub fn auto_power_down(&self) -> bool {
        self.auto_pwrdn
    }

    /// Time between output transitions
    pub fn half_period_ns(&self) -> u64 {
        LFOSC_HALF_PERIOD_NS * self.out_div as u64
    }

    pub fn clkout(&self) -> bool {
        self.clkout
    }

    /// Advance simulated time with the `PWRDN` pin at the given level
    ///
    /// A powered-down oscillator drives 0 and restarts its phase; when power
    /// returns the output toggles after a full half period.
    pub fn advance(&mut self, dt_ns: u64, pwrdn: bool) -> bool {
        if self.pwrdn_en && pwrdn {
            self.clkout = false;
            self.phase_ns = 0;
            return self.clkout;
        }

        let half = self.half_period_ns();
        let elapsed = self.phase_ns + dt_ns;
        if (elapsed / half) % 2 == 1 {
            self.clkout = !self.clkout;
        }
        self.phase_ns = elapsed % half;
        self.clkout
    }

    /// Time until the next output transition while running
    pub fn next_toggle_in(&self) -> u64 {
        self.half_period_ns() - self.phase_ns
    }
}
