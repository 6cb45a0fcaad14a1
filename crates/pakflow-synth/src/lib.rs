//! GreenPAK4 synthesis pipeline
//!
//! Sequences the fixed GreenPAK4 synthesis script (`begin`, `flatten`,
//! `coarse`, `fine`, `map_luts`, `map_cells`, `check`, `json`) over a design,
//! optionally restricted to a `from:to` label range. The transforms themselves
//! are opaque: each [`Operation`] is handed to a [`TransformInvoker`].
//!
//! # Example
//!
//! ```
//! use pakflow_synth::{PipelineConfig, RecordingInvoker, SelectionOnly, SynthPipeline};
//!
//! let config = PipelineConfig::new()
//!     .with_part("SLG46140V")
//!     .with_range("map_luts:map_cells".parse().unwrap());
//! let mut design = SelectionOnly::full();
//! let mut invoker = RecordingInvoker::new();
//! SynthPipeline::new(config).run(&mut design, &mut invoker).unwrap();
//!
//! assert_eq!(invoker.commands(), ["nlutmap -luts 0,6,8,2", "clean"]);
//! ```

pub mod config;
pub mod error;
pub mod invoker;
pub mod listing;
pub mod operation;
pub mod part;
pub mod pipeline;
pub mod stage;
pub mod yosys;

pub use config::{PipelineConfig, DEFAULT_PART};
pub use error::{InvokeError, PipelineError, Result};
pub use invoker::{DesignState, RecordingInvoker, SelectionOnly, TransformInvoker};
pub use listing::{listing, render_plan, render_script};
pub use operation::{OptFlags, Operation, TopModule};
pub use part::{LutBuckets, TargetPart};
pub use pipeline::{run, stage_operations, Plan, SynthPipeline};
pub use stage::{ActiveRange, RunRange, Stage, StageKind};
pub use yosys::{run_yosys, YosysDesign, YosysOutput, YosysScript};
