//! GreenPAK4 primitive cell library
//!
//! The closed set of physical cells a mapped GreenPAK4 netlist may contain,
//! with the simulatable behavior of each. The synthesis flow references these
//! cells by name; this crate is the place those names resolve.
//!
//! # Example
//!
//! ```
//! use pakflow_cells::{FlipFlop, InitValue, PrimitiveKind, SrMode};
//!
//! assert_eq!(PrimitiveKind::from_name("GP_DFFSR"), Some(PrimitiveKind::DffSr));
//!
//! let mut ff = FlipFlop::dffsr(InitValue::Zero, SrMode::Set);
//! assert_eq!(ff.step(false, false, false), Some(true)); // nSR asserted
//! ```

pub mod counter;
pub mod edge;
pub mod error;
pub mod flop;
pub mod kind;
pub mod logic;
pub mod model;
pub mod osc;
pub mod params;

pub use counter::{CounterWidth, DownCounter};
pub use edge::{Edge, EdgeDetector};
pub use error::{CellError, Result};
pub use flop::FlipFlop;
pub use kind::{PrimitiveKind, INIT_PARAM};
pub use logic::{evaluate_combinational, TruthTable};
pub use model::CellModel;
pub use osc::{LowFrequencyOscillator, LFOSC_HALF_PERIOD_NS};
pub use params::{CellParams, InitValue, ResetMode, SrMode};
