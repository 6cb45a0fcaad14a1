//! Transform operations issued by the pipeline
//!
//! Each operation is a tagged value with its arguments. Its `Display` form is
//! the command text handed to the synthesis engine, which treats it as opaque.

use crate::part::LutBuckets;
use pakflow_cells::{PrimitiveKind, INIT_PARAM};
use std::fmt;
use std::path::PathBuf;

/// Behavioral models of the primitives, loaded as library cells
pub const CELLS_SIM: &str = "+/greenpak4/cells_sim.v";
/// Flip-flop liberty file used by `dfflibmap`
pub const DFF_LIBERTY: &str = "+/greenpak4/gp_dff.lib";
/// Techmap rules from internal cells to primitives
pub const CELLS_MAP: &str = "+/greenpak4/cells_map.v";

/// How the hierarchy root is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopModule {
    Named(String),
    Auto,
}

/// Flags for the `opt` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptFlags {
    pub fast: bool,
    pub mux_undef: bool,
    pub undriven: bool,
    pub fine: bool,
}

impl OptFlags {
    pub fn fast() -> Self {
        Self {
            fast: true,
            ..Default::default()
        }
    }
}

/// A single transform invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Load the primitive behavioral models as library cells
    ReadCellLibrary,
    /// Resolve and check the hierarchy, optionally re-rooting it
    Hierarchy { top: Option<TopModule> },
    /// Elaborate processes into netlists
    Proc,
    /// Flatten the hierarchy
    Flatten,
    /// Convert tri-state buffers to logic
    TribufLogic,
    /// Generic coarse-grain synthesis
    SynthCoarse,
    /// Recognize counter patterns and map them to hard counters
    Counters,
    /// Remove unused cells and wires
    Clean,
    Opt(OptFlags),
    /// Map memories to basic cells
    MemoryMap,
    /// Generic technology mapping, or mapping with the given rules
    Techmap { map: Option<&'static str> },
    /// Map flip-flops against the liberty file; `prepare` only legalizes types
    DffLibMap { prepare: bool },
    /// Retime logic across sequential elements
    AbcRetime,
    /// Map logic into LUTs within a per-size budget
    NlutMap(LutBuckets),
    /// Copy the requested initial value of `Q` nets into the cell's INIT
    DffInit { cell: PrimitiveKind },
    /// Print design statistics
    Stat,
    /// Structural well-formedness checks, skipping uninitialized registers
    CheckNoInit,
    /// Split multi-bit nets into single-bit nets
    SplitNets,
    /// Export the design
    WriteJson(PathBuf),
}

impl Operation {
    /// Name of the command the operation invokes
    pub fn command(&self) -> &'static str {
        match self {
            Operation::ReadCellLibrary => "read_verilog",
            Operation::Hierarchy { .. } => "hierarchy",
            Operation::Proc => "proc",
            Operation::Flatten => "flatten",
            Operation::TribufLogic => "tribuf",
            Operation::SynthCoarse => "synth",
            Operation::Counters => "greenpak4_counters",
            Operation::Clean => "clean",
            Operation::Opt(_) => "opt",
            Operation::MemoryMap => "memory_map",
            Operation::Techmap { .. } => "techmap",
            Operation::DffLibMap { .. } => "dfflibmap",
            Operation::AbcRetime => "abc",
            Operation::NlutMap(_) => "nlutmap",
            Operation::DffInit { .. } => "dffinit",
            Operation::Stat => "stat",
            Operation::CheckNoInit => "check",
            Operation::SplitNets => "splitnets",
            Operation::WriteJson(_) => "write_json",
        }
    }

    /// Primitive kind named by the operation, if any
    pub fn cell(&self) -> Option<PrimitiveKind> {
        match self {
            Operation::DffInit { cell } => Some(*cell),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ReadCellLibrary => write!(f, "read_verilog -lib {CELLS_SIM}"),
            Operation::Hierarchy { top } => match top {
                None => f.write_str("hierarchy -check"),
                Some(TopModule::Named(name)) => write!(f, "hierarchy -check -top {name}"),
                Some(TopModule::Auto) => f.write_str("hierarchy -check -auto-top"),
            },
            Operation::TribufLogic => f.write_str("tribuf -logic"),
            Operation::SynthCoarse => f.write_str("synth -run coarse"),
            Operation::Opt(flags) => {
                f.write_str("opt")?;
                for (set, flag) in [
                    (flags.fast, "-fast"),
                    (flags.mux_undef, "-mux_undef"),
                    (flags.undriven, "-undriven"),
                    (flags.fine, "-fine"),
                ] {
                    if set {
                        write!(f, " {flag}")?;
                    }
                }
                Ok(())
            }
            Operation::Techmap { map: None } => f.write_str("techmap"),
            Operation::Techmap { map: Some(map) } => write!(f, "techmap -map {map}"),
            Operation::DffLibMap { prepare: true } => {
                write!(f, "dfflibmap -prepare -liberty {DFF_LIBERTY}")
            }
            Operation::DffLibMap { prepare: false } => write!(f, "dfflibmap -liberty {DFF_LIBERTY}"),
            Operation::AbcRetime => f.write_str("abc -dff"),
            Operation::NlutMap(buckets) => write!(f, "nlutmap -luts {buckets}"),
            Operation::DffInit { cell } => {
                let q = cell.output_ports().first().copied().unwrap_or("Q");
                write!(f, "dffinit -ff {cell} {q} {INIT_PARAM}")
            }
            Operation::CheckNoInit => f.write_str("check -noinit"),
            Operation::WriteJson(path) => write!(f, "write_json {}", path.display()),
            Operation::Proc
            | Operation::Flatten
            | Operation::Counters
            | Operation::Clean
            | Operation::MemoryMap
            | Operation::Stat
            | Operation::SplitNets => f.write_str(self.command()),
        }
    }
}
