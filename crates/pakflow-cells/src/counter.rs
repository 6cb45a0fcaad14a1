//! Down-counter (`GP_COUNT8`, `GP_COUNT14`) model
//!
//! The count starts at `COUNT_TO`, decrements on every rising clock edge and
//! reloads `COUNT_TO` on the edge after it reaches zero. `OUT` is asserted
//! combinationally while the count is zero, so a counter loaded with N pulses
//! `OUT` once every N+1 clocks.
//!
//! `RESET_MODE` is kept on the model but the `RST` pin has no effect: whether
//! the hardware clears the count synchronously or asynchronously is not
//! settled, and neither behavior is assumed here.

use crate::edge::{Edge, EdgeDetector};
use crate::error::{CellError, Result};
use crate::kind::PrimitiveKind;
use crate::params::{param_with, parse_uint, CellParams, ResetMode};

/// Counter size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterWidth {
    Bits8,
    Bits14,
}

impl CounterWidth {
    pub fn bits(&self) -> u8 {
        match self {
            CounterWidth::Bits8 => 8,
            CounterWidth::Bits14 => 14,
        }
    }

    pub fn max_count(&self) -> u16 {
        ((1u32 << self.bits()) - 1) as u16
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            CounterWidth::Bits8 => PrimitiveKind::Count8,
            CounterWidth::Bits14 => PrimitiveKind::Count14,
        }
    }

    pub fn from_kind(kind: PrimitiveKind) -> Option<Self> {
        match kind {
            PrimitiveKind::Count8 => Some(CounterWidth::Bits8),
            PrimitiveKind::Count14 => Some(CounterWidth::Bits14),
            _ => None,
        }
    }
}

/// Behavioral state of one counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownCounter {
    width: CounterWidth,
    count_to: u16,
    reset_mode: ResetMode,
    count: u16,
    clk: EdgeDetector,
}

impl DownCounter {
    pub fn new(width: CounterWidth, count_to: u32) -> Result<Self> {
        if count_to > width.max_count() as u32 {
            return Err(CellError::CountRange {
                width: width.bits(),
                value: count_to,
            });
        }
        Ok(Self {
            width,
            count_to: count_to as u16,
            reset_mode: ResetMode::default(),
            count: count_to as u16,
            clk: EdgeDetector::default(),
        })
    }

    /// Build from `COUNT_TO` and `RESET_MODE` parameters
    pub fn from_params(width: CounterWidth, params: &CellParams) -> Result<Self> {
        let cell = width.kind().name();
        let count_to = param_with(params, cell, "COUNT_TO", parse_uint)?.unwrap_or(1);
        let count_to = u32::try_from(count_to).unwrap_or(u32::MAX);
        let reset_mode = param_with(params, cell, "RESET_MODE", ResetMode::parse)?;
        let mut counter = Self::new(width, count_to)?;
        counter.reset_mode = reset_mode.unwrap_or_default();
        Ok(counter)
    }

    pub fn with_reset_mode(mut self, reset_mode: ResetMode) -> Self {
        self.reset_mode = reset_mode;
        self
    }

    pub fn width(&self) -> CounterWidth {
        self.width
    }

    pub fn count_to(&self) -> u16 {
        self.count_to
    }

    pub fn reset_mode(&self) -> ResetMode {
        self.reset_mode
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    /// `OUT` pin
    pub fn out(&self) -> bool {
        self.count == 0
    }

    /// Apply one sample of `CLK` and `RST`; returns `OUT`
    pub fn step(&mut self, clk: bool, _rst: bool) -> bool {
        if self.clk.update(clk) == Edge::Rising {
            self.count = if self.count == 0 {
                self.count_to
            } else {
                self.count - 1
            };
        }
        self.out()
    }

    /// Drive one full clock cycle (low then high); returns `OUT` after the edge
    pub fn tick(&mut self) -> bool {
        self.step(false, false);
        self.step(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_and_reloads() {
        let mut counter = DownCounter::new(CounterWidth::Bits8, 3).unwrap();
        assert_eq!(counter.count(), 3);
        assert!(!counter.tick());
        assert!(!counter.tick());
        assert!(counter.tick());
        assert_eq!(counter.count(), 0);
        assert!(!counter.tick());
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn test_out_period() {
        let mut counter = DownCounter::new(CounterWidth::Bits14, 9).unwrap();
        let pulses = (0..100).filter(|_| counter.tick()).count();
        assert_eq!(pulses, 10);
    }

    #[test]
    fn test_count_range() {
        assert!(DownCounter::new(CounterWidth::Bits8, 255).is_ok());
        assert_eq!(
            DownCounter::new(CounterWidth::Bits8, 256),
            Err(CellError::CountRange {
                width: 8,
                value: 256
            })
        );
        assert!(DownCounter::new(CounterWidth::Bits14, 16383).is_ok());
        assert!(DownCounter::new(CounterWidth::Bits14, 16384).is_err());
    }

    #[test]
    fn test_reset_pin_is_not_modeled() {
        let mut counter = DownCounter::new(CounterWidth::Bits8, 5)
            .unwrap()
            .with_reset_mode(ResetMode::Level);
        counter.step(false, true);
        counter.step(true, true);
        assert_eq!(counter.count(), 4);
        assert_eq!(counter.reset_mode(), ResetMode::Level);
    }

    #[test]
    fn test_from_params() {
        let mut params = CellParams::new();
        params.insert("COUNT_TO".into(), "8'd20".into());
        params.insert("RESET_MODE".into(), "\"FALLING\"".into());
        let counter = DownCounter::from_params(CounterWidth::Bits8, &params).unwrap();
        assert_eq!(counter.count_to(), 20);
        assert_eq!(counter.reset_mode(), ResetMode::Falling);

        params.insert("RESET_MODE".into(), "SOMETIMES".into());
        assert!(DownCounter::from_params(CounterWidth::Bits8, &params).is_err());
    }
}
