//! Behavioral models built from a cell kind and its parameters

use crate::counter::{CounterWidth, DownCounter};
use crate::error::{CellError, Result};
use crate::flop::FlipFlop;
use crate::kind::PrimitiveKind;
use crate::logic::{evaluate_combinational, TruthTable};
use crate::osc::LowFrequencyOscillator;
use crate::params::{param_with, parse_uint, CellParams};

/// Simulation model of one primitive instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellModel {
    Inv,
    Lut(TruthTable),
    Const(bool),
    FlipFlop(FlipFlop),
    Oscillator(LowFrequencyOscillator),
    Counter(DownCounter),
}

impl CellModel {
    /// Build the model for a cell instance
    ///
    /// Missing parameters take the cell defaults: an all-zero LUT table, an
    /// unconstrained INIT, `COUNT_TO = 1`. `GP_SYSRESET` has no model.
    pub fn new(kind: PrimitiveKind, params: &CellParams) -> Result<Self> {
        match kind {
            PrimitiveKind::Inv => Ok(CellModel::Inv),
            PrimitiveKind::Lut2 | PrimitiveKind::Lut3 | PrimitiveKind::Lut4 => {
                let inputs = kind.lut_inputs().unwrap_or(4);
                let bits = param_with(params, kind.name(), "INIT", parse_uint)?.unwrap_or(0);
                let table = u32::try_from(bits)
                    .map_err(|_| CellError::InvalidParameter {
                        cell: kind.name().to_string(),
                        param: "INIT".to_string(),
                        value: bits.to_string(),
                    })
                    .and_then(|bits| TruthTable::new(inputs, bits))?;
                Ok(CellModel::Lut(table))
            }
            PrimitiveKind::Vdd => Ok(CellModel::Const(true)),
            PrimitiveKind::Vss => Ok(CellModel::Const(false)),
            PrimitiveKind::Dff | PrimitiveKind::DffS | PrimitiveKind::DffR | PrimitiveKind::DffSr => {
                FlipFlop::from_params(kind, params).map(CellModel::FlipFlop)
            }
            PrimitiveKind::LfOsc => LowFrequencyOscillator::from_params(params).map(CellModel::Oscillator),
            PrimitiveKind::Count8 | PrimitiveKind::Count14 => {
                let width = CounterWidth::from_kind(kind).unwrap_or(CounterWidth::Bits8);
                DownCounter::from_params(width, params).map(CellModel::Counter)
            }
            PrimitiveKind::SysReset => Err(CellError::NotSimulatable(kind.name().to_string())),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            CellModel::Inv => PrimitiveKind::Inv,
            CellModel::Lut(table) => table.kind(),
            CellModel::Const(true) => PrimitiveKind::Vdd,
            CellModel::Const(false) => PrimitiveKind::Vss,
            CellModel::FlipFlop(ff) => ff.kind(),
            CellModel::Oscillator(_) => PrimitiveKind::LfOsc,
            CellModel::Counter(counter) => counter.width().kind(),
        }
    }

    /// Output of a combinational model for the given pins, `None` for
    /// sequential models
    pub fn evaluate(&self, inputs: &[bool]) -> Option<bool> {
        match self {
            CellModel::Lut(table) => evaluate_combinational(table.kind(), Some(table), inputs),
            CellModel::Inv | CellModel::Const(_) => evaluate_combinational(self.kind(), None, inputs),
            _ => None,
        }
    }
}
