//! D flip-flop models
//!
//! All four variants capture `D` on the rising edge of `CLK`. The set, reset
//! and set/reset variants add one active-low asynchronous control line. While
//! that line is held low the output is forced (to 1, to 0, or to `SRMODE`)
//! whatever the clock and data do; once released, the forced value holds until
//! the next rising clock edge captures `D` again.

use crate::edge::{Edge, EdgeDetector};
use crate::error::{CellError, Result};
use crate::kind::{PrimitiveKind, INIT_PARAM};
use crate::params::{param_with, parse_init, parse_uint, CellParams, InitValue, SrMode};

/// Behavioral state of one flip-flop instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipFlop {
    kind: PrimitiveKind,
    init: InitValue,
    sr_mode: SrMode,
    q: Option<bool>,
    clk: EdgeDetector,
}

impl FlipFlop {
    /// Create a flip-flop of the given kind at its power-on state
    pub fn new(kind: PrimitiveKind, init: InitValue) -> Result<Self> {
        if !kind.is_flip_flop() {
            return Err(CellError::NotFlipFlop(kind.name().to_string()));
        }
        Ok(Self {
            kind,
            init,
            sr_mode: SrMode::default(),
            q: init.to_bit(),
            clk: EdgeDetector::default(),
        })
    }

    /// Build from netlist parameters (`INIT`, and `SRMODE` for `GP_DFFSR`)
    pub fn from_params(kind: PrimitiveKind, params: &CellParams) -> Result<Self> {
        let cell = kind.name();
        let init = param_with(params, cell, INIT_PARAM, parse_init)?.unwrap_or_default();
        let mut ff = Self::new(kind, init)?;
        if kind == PrimitiveKind::DffSr {
            let sr_mode = param_with(params, cell, "SRMODE", |v| match parse_uint(v)? {
                0 => Some(SrMode::Reset),
                1 => Some(SrMode::Set),
                _ => None,
            })?;
            ff.sr_mode = sr_mode.unwrap_or_default();
        }
        Ok(ff)
    }

    /// Plain `GP_DFF`
    pub fn dff(init: InitValue) -> Self {
        Self::unchecked(PrimitiveKind::Dff, init, SrMode::default())
    }

    /// `GP_DFFS`, forced to 1 by `nSET`
    pub fn dffs(init: InitValue) -> Self {
        Self::unchecked(PrimitiveKind::DffS, init, SrMode::default())
    }

    /// `GP_DFFR`, forced to 0 by `nRST`
    pub fn dffr(init: InitValue) -> Self {
        Self::unchecked(PrimitiveKind::DffR, init, SrMode::default())
    }

    /// `GP_DFFSR`, forced to `sr_mode` by `nSR`
    pub fn dffsr(init: InitValue, sr_mode: SrMode) -> Self {
        Self::unchecked(PrimitiveKind::DffSr, init, sr_mode)
    }

    fn unchecked(kind: PrimitiveKind, init: InitValue, sr_mode: SrMode) -> Self {
        Self {
            kind,
            init,
            sr_mode,
            q: init.to_bit(),
            clk: EdgeDetector::default(),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn init(&self) -> InitValue {
        self.init
    }

    pub fn sr_mode(&self) -> SrMode {
        self.sr_mode
    }

    /// Current output, `None` while undefined
    pub fn q(&self) -> Option<bool> {
        self.q
    }

    /// Name of the asynchronous control pin, if any
    pub fn control_port(&self) -> Option<&'static str> {
        self.kind.input_ports().get(2).copied()
    }

    /// Level the asserted control line forces onto `Q`
    pub fn forced_value(&self) -> Option<bool> {
        match self.kind {
            PrimitiveKind::DffS => Some(true),
            PrimitiveKind::DffR => Some(false),
            PrimitiveKind::DffSr => Some(self.sr_mode.forced_value()),
            _ => None,
        }
    }

    /// Apply one sample of the input pins
    ///
    /// `n_ctrl` is the active-low control line; it is ignored by `GP_DFF`.
    pub fn step(&mut self, d: bool, clk: bool, n_ctrl: bool) -> Option<bool> {
        let edge = self.clk.update(clk);
        match self.forced_value() {
            Some(forced) if !n_ctrl => self.q = Some(forced),
            _ if edge == Edge::Rising => self.q = Some(d),
            _ => {}
        }
        self.q
    }

    /// Apply pin values in `input_ports()` order. The control pin of a plain
    /// flip-flop does not exist and an absent control pin reads as released.
    pub fn step_pins(&mut self, pins: &[bool]) -> Option<bool> {
        let d = pins.first().copied().unwrap_or(false);
        let clk = pins.get(1).copied().unwrap_or(false);
        let n_ctrl = pins.get(2).copied().unwrap_or(true);
        self.step(d, clk, n_ctrl)
    }

    /// Return to the power-on state
    pub fn power_on(&mut self) {
        self.q = self.init.to_bit();
        self.clk = EdgeDetector::default();
    }
}
