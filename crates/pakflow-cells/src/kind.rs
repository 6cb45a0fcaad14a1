//! The closed catalog of GreenPAK4 primitive kinds
//!
//! Every cell the synthesis flow may leave in a mapped netlist is one of these
//! kinds. Names match the `GP_*` cell names used by the techmap and liberty
//! files, so a kind can be resolved from the text of a mapping command.

use crate::error::{CellError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the parameter holding a flip-flop's power-on value
pub const INIT_PARAM: &str = "INIT";

/// GreenPAK4 primitive cell kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveKind {
    // === Combinational ===
    /// Inverter
    Inv,
    /// 2-input LUT (4-bit INIT)
    Lut2,
    /// 3-input LUT (8-bit INIT)
    Lut3,
    /// 4-input LUT (16-bit INIT)
    Lut4,

    // === Sequential ===
    /// D flip-flop, no async control
    Dff,
    /// D flip-flop with active-low async set
    DffS,
    /// D flip-flop with active-low async reset
    DffR,
    /// D flip-flop with active-low async set-or-reset, polarity from SRMODE
    DffSr,

    // === Constants ===
    /// Logic 1 source
    Vdd,
    /// Logic 0 source
    Vss,

    // === Hard IP ===
    /// Low-frequency oscillator
    LfOsc,
    /// 8-bit down-counter
    Count8,
    /// 14-bit down-counter
    Count14,
    /// Whole-chip reset request
    SysReset,
}

impl PrimitiveKind {
    /// Every catalogued kind, in catalog order
    pub const ALL: [PrimitiveKind; 14] = [
        PrimitiveKind::Inv,
        PrimitiveKind::Lut2,
        PrimitiveKind::Lut3,
        PrimitiveKind::Lut4,
        PrimitiveKind::Dff,
        PrimitiveKind::DffS,
        PrimitiveKind::DffR,
        PrimitiveKind::DffSr,
        PrimitiveKind::Vdd,
        PrimitiveKind::Vss,
        PrimitiveKind::LfOsc,
        PrimitiveKind::Count8,
        PrimitiveKind::Count14,
        PrimitiveKind::SysReset,
    ];

    /// Flip-flop kinds in the order their INIT values are propagated
    pub const FLIP_FLOPS: [PrimitiveKind; 4] = [
        PrimitiveKind::Dff,
        PrimitiveKind::DffR,
        PrimitiveKind::DffS,
        PrimitiveKind::DffSr,
    ];

    /// Cell name as it appears in netlists and mapping files
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Inv => "GP_INV",
            PrimitiveKind::Lut2 => "GP_2LUT",
            PrimitiveKind::Lut3 => "GP_3LUT",
            PrimitiveKind::Lut4 => "GP_4LUT",
            PrimitiveKind::Dff => "GP_DFF",
            PrimitiveKind::DffS => "GP_DFFS",
            PrimitiveKind::DffR => "GP_DFFR",
            PrimitiveKind::DffSr => "GP_DFFSR",
            PrimitiveKind::Vdd => "GP_VDD",
            PrimitiveKind::Vss => "GP_VSS",
            PrimitiveKind::LfOsc => "GP_LFOSC",
            PrimitiveKind::Count8 => "GP_COUNT8",
            PrimitiveKind::Count14 => "GP_COUNT14",
            PrimitiveKind::SysReset => "GP_SYSRESET",
        }
    }

    /// Resolve a cell name to its kind
    pub fn from_name(name: &str) -> Option<PrimitiveKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// LUT kind for a given input count
    pub fn lut(inputs: u8) -> Result<PrimitiveKind> {
        match inputs {
            2 => Ok(PrimitiveKind::Lut2),
            3 => Ok(PrimitiveKind::Lut3),
            4 => Ok(PrimitiveKind::Lut4),
            n => Err(CellError::LutWidth(n)),
        }
    }

    /// Number of LUT inputs, `None` for non-LUT kinds
    pub fn lut_inputs(&self) -> Option<u8> {
        match self {
            PrimitiveKind::Lut2 => Some(2),
            PrimitiveKind::Lut3 => Some(3),
            PrimitiveKind::Lut4 => Some(4),
            _ => None,
        }
    }

    /// Input pin names in evaluation order
    pub fn input_ports(&self) -> &'static [&'static str] {
        match self {
            PrimitiveKind::Inv => &["IN"],
            PrimitiveKind::Lut2 => &["IN0", "IN1"],
            PrimitiveKind::Lut3 => &["IN0", "IN1", "IN2"],
            PrimitiveKind::Lut4 => &["IN0", "IN1", "IN2", "IN3"],
            PrimitiveKind::Dff => &["D", "CLK"],
            PrimitiveKind::DffS => &["D", "CLK", "nSET"],
            PrimitiveKind::DffR => &["D", "CLK", "nRST"],
            PrimitiveKind::DffSr => &["D", "CLK", "nSR"],
            PrimitiveKind::Vdd | PrimitiveKind::Vss => &[],
            PrimitiveKind::LfOsc => &["PWRDN"],
            PrimitiveKind::Count8 | PrimitiveKind::Count14 => &["CLK", "RST"],
            PrimitiveKind::SysReset => &["RST"],
        }
    }

    /// Output pin names
    pub fn output_ports(&self) -> &'static [&'static str] {
        match self {
            PrimitiveKind::Dff
            | PrimitiveKind::DffS
            | PrimitiveKind::DffR
            | PrimitiveKind::DffSr => &["Q"],
            PrimitiveKind::LfOsc => &["CLKOUT"],
            PrimitiveKind::SysReset => &[],
            _ => &["OUT"],
        }
    }

    /// Parameters the cell accepts
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            PrimitiveKind::Lut2 | PrimitiveKind::Lut3 | PrimitiveKind::Lut4 => &["INIT"],
            PrimitiveKind::Dff | PrimitiveKind::DffS | PrimitiveKind::DffR => &["INIT"],
            PrimitiveKind::DffSr => &["INIT", "SRMODE"],
            PrimitiveKind::LfOsc => &["PWRDN_EN", "AUTO_PWRDN", "OUT_DIV"],
            PrimitiveKind::Count8 | PrimitiveKind::Count14 => {
                &["RESET_MODE", "COUNT_TO", "CLKIN_DIVIDE"]
            }
            PrimitiveKind::SysReset => &["RESET_MODE"],
            PrimitiveKind::Inv | PrimitiveKind::Vdd | PrimitiveKind::Vss => &[],
        }
    }

    /// Returns true for state-holding kinds
    pub fn is_sequential(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Dff
                | PrimitiveKind::DffS
                | PrimitiveKind::DffR
                | PrimitiveKind::DffSr
                | PrimitiveKind::LfOsc
                | PrimitiveKind::Count8
                | PrimitiveKind::Count14
        )
    }

    /// Returns true for the four D flip-flop variants
    pub fn is_flip_flop(&self) -> bool {
        Self::FLIP_FLOPS.contains(self)
    }

    /// Cells that optimization must never remove, even with no observable outputs
    pub fn must_keep(&self) -> bool {
        matches!(self, PrimitiveKind::SysReset)
    }

    /// Returns true if the kind has a standalone behavioral model
    pub fn is_simulatable(&self) -> bool {
        !matches!(self, PrimitiveKind::SysReset)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| CellError::UnknownCell(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.to_string().parse::<PrimitiveKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(PrimitiveKind::from_name("GP_DLATCH"), None);
        assert!(matches!(
            "SB_LUT4".parse::<PrimitiveKind>(),
            Err(CellError::UnknownCell(name)) if name == "SB_LUT4"
        ));
    }

    #[test]
    fn test_lut_widths() {
        assert_eq!(PrimitiveKind::lut(3), Ok(PrimitiveKind::Lut3));
        assert_eq!(PrimitiveKind::lut(5), Err(CellError::LutWidth(5)));
        for inputs in 2..=4u8 {
            let kind = PrimitiveKind::lut(inputs).unwrap();
            assert_eq!(kind.lut_inputs(), Some(inputs));
            assert_eq!(kind.input_ports().len(), inputs as usize);
        }
    }

    #[test]
    fn test_flip_flop_set() {
        let flops: Vec<_> = PrimitiveKind::ALL
            .iter()
            .filter(|k| k.is_flip_flop())
            .collect();
        assert_eq!(flops.len(), 4);
        for kind in PrimitiveKind::FLIP_FLOPS {
            assert!(kind.is_sequential());
            assert_eq!(kind.output_ports(), &["Q"]);
            assert!(kind.parameters().contains(&INIT_PARAM));
        }
    }

    #[test]
    fn test_sysreset_is_kept() {
        let kept: Vec<_> = PrimitiveKind::ALL.iter().filter(|k| k.must_keep()).collect();
        assert_eq!(kept, vec![&PrimitiveKind::SysReset]);
        assert!(PrimitiveKind::SysReset.output_ports().is_empty());
        assert!(!PrimitiveKind::SysReset.is_simulatable());
    }
}
