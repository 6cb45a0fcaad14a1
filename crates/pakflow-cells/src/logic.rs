//! Combinational primitive evaluation
//!
//! Covers the inverter, the 2/3/4-input LUTs and the constant sources. All of
//! these are zero-delay: the output is a pure function of the current inputs.

use crate::error::{CellError, Result};
use crate::kind::PrimitiveKind;
use serde::{Deserialize, Serialize};

/// LUT configuration: an N-input truth table stored in the low `2^N` bits
///
/// Bit `i` of the table is the output when the inputs, read as a binary
/// number with input 0 as the least significant bit, equal `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruthTable {
    inputs: u8,
    bits: u16,
}

impl TruthTable {
    /// Build a truth table, rejecting widths the fabric lacks and tables
    /// with bits above entry `2^N - 1`
    pub fn new(inputs: u8, bits: u32) -> Result<Self> {
        PrimitiveKind::lut(inputs)?;
        let entries = 1u32 << inputs;
        if entries < 32 && bits >> entries != 0 {
            return Err(CellError::TruthTableWidth {
                inputs,
                table: bits,
            });
        }
        Ok(Self {
            inputs,
            bits: bits as u16,
        })
    }

    pub fn inputs(&self) -> u8 {
        self.inputs
    }

    /// Number of table entries (`2^N`)
    pub fn entries(&self) -> usize {
        1 << self.inputs
    }

    /// The cell kind implementing this table
    pub fn kind(&self) -> PrimitiveKind {
        match self.inputs {
            2 => PrimitiveKind::Lut2,
            3 => PrimitiveKind::Lut3,
            _ => PrimitiveKind::Lut4,
        }
    }

    /// Output for a selector index in `0..2^N`
    pub fn lookup(&self, index: usize) -> bool {
        index < self.entries() && (self.bits >> index) & 1 != 0
    }

    /// Output for a set of input pin values, `inputs[0]` being `IN0`
    ///
    /// Missing inputs read as 0; inputs beyond N are ignored.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        let index = inputs
            .iter()
            .take(self.inputs as usize)
            .enumerate()
            .fold(0usize, |acc, (i, &bit)| acc | (bit as usize) << i);
        self.lookup(index)
    }
}

/// Evaluate a combinational primitive
///
/// `table` is required for LUT kinds and ignored otherwise. Returns `None`
/// for kinds that are not combinational.
pub fn evaluate_combinational(
    kind: PrimitiveKind,
    table: Option<&TruthTable>,
    inputs: &[bool],
) -> Option<bool> {
    match kind {
        PrimitiveKind::Inv => Some(!inputs.first().copied().unwrap_or(false)),
        PrimitiveKind::Lut2 | PrimitiveKind::Lut3 | PrimitiveKind::Lut4 => {
            let table = table?;
            (Some(table.inputs()) == kind.lut_inputs()).then(|| table.evaluate(inputs))
        }
        PrimitiveKind::Vdd => Some(true),
        PrimitiveKind::Vss => Some(false),
        _ => None,
    }
}
