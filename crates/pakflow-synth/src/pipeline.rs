//! Staged synthesis pipeline controller
//!
//! Walks the fixed stage sequence, skips stages outside the configured run
//! range and hands each operation of an active stage to the invoker.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::invoker::{DesignState, TransformInvoker};
use crate::operation::{OptFlags, Operation, TopModule, CELLS_MAP};
use crate::part::TargetPart;
use crate::stage::{ActiveRange, Stage};
use indexmap::IndexMap;
use pakflow_cells::PrimitiveKind;
use tracing::{debug, error, info};

/// Active stages of a run and the operations each will issue, in order
pub type Plan = IndexMap<Stage, Vec<Operation>>;

/// Operations a stage issues for the given configuration and part
///
/// Ignores the run range; see [`SynthPipeline::plan`] for that.
pub fn stage_operations(stage: Stage, config: &PipelineConfig, part: TargetPart) -> Vec<Operation> {
    match stage {
        Stage::Begin => {
            let top = match &config.top {
                Some(name) if !name.is_empty() => TopModule::Named(name.clone()),
                _ => TopModule::Auto,
            };
            vec![
                Operation::ReadCellLibrary,
                Operation::Hierarchy { top: Some(top) },
            ]
        }
        Stage::Flatten if config.flatten => {
            vec![Operation::Proc, Operation::Flatten, Operation::TribufLogic]
        }
        Stage::Flatten => Vec::new(),
        Stage::Coarse => vec![Operation::SynthCoarse],
        Stage::Fine => {
            let mut ops = vec![
                Operation::Counters,
                Operation::Clean,
                Operation::Opt(OptFlags {
                    fast: true,
                    mux_undef: true,
                    undriven: true,
                    fine: true,
                }),
                Operation::MemoryMap,
                Operation::Opt(OptFlags {
                    undriven: true,
                    fine: true,
                    ..Default::default()
                }),
                Operation::Techmap { map: None },
                Operation::DffLibMap { prepare: true },
                Operation::Opt(OptFlags::fast()),
            ];
            if config.retime {
                ops.push(Operation::AbcRetime);
            }
            ops
        }
        Stage::MapLuts => vec![Operation::NlutMap(part.lut_buckets()), Operation::Clean],
        Stage::MapCells => {
            let mut ops = vec![
                Operation::DffLibMap { prepare: false },
                Operation::Techmap {
                    map: Some(CELLS_MAP),
                },
            ];
            ops.extend(
                PrimitiveKind::FLIP_FLOPS
                    .into_iter()
                    .map(|cell| Operation::DffInit { cell }),
            );
            ops.push(Operation::Clean);
            ops
        }
        Stage::Check => vec![
            Operation::Hierarchy { top: None },
            Operation::Stat,
            Operation::CheckNoInit,
        ],
        Stage::Json => {
            let mut ops = vec![Operation::SplitNets];
            if let Some(path) = config.json_path() {
                ops.push(Operation::WriteJson(path.to_path_buf()));
            }
            ops
        }
    }
}

/// The GreenPAK4 synthesis script
#[derive(Debug, Clone)]
pub struct SynthPipeline {
    config: PipelineConfig,
}

impl SynthPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stages inside the run range with their operations
    ///
    /// Fails only if the part is not supported. A stage with no operations
    /// (`flatten` when flattening is off) still appears, since its label
    /// moves the range like any other.
    pub fn plan(&self) -> Result<Plan> {
        let part = self.config.target_part()?;
        let range = self.config.range();
        let mut active = ActiveRange::new(&range);
        let mut plan = Plan::new();
        for stage in Stage::ALL {
            if active.enter(stage) {
                plan.insert(stage, stage_operations(stage, &self.config, part));
            }
        }
        Ok(plan)
    }

    /// Run the script against `design`
    ///
    /// Preconditions are checked before anything is invoked: the design must
    /// be fully selected, then the part must be supported. The first failing
    /// operation aborts the run; transforms already applied are not undone.
    pub fn run<D, I>(&self, design: &mut D, invoker: &mut I) -> Result<()>
    where
        D: DesignState + ?Sized,
        I: TransformInvoker<D> + ?Sized,
    {
        if !design.is_fully_selected() {
            error!("Synthesis requested on a partially selected design");
            return Err(PipelineError::Selection);
        }
        let plan = self.plan().map_err(|e| {
            error!("{e}");
            e
        })?;

        info!(
            "Running GreenPAK4 synthesis for {} ({} of {} stages active)",
            self.config.part,
            plan.len(),
            Stage::ALL.len()
        );

        for stage in Stage::ALL {
            let Some(ops) = plan.get(&stage) else {
                debug!("Skipping stage {stage}");
                continue;
            };
            debug!("Entering stage {stage}");
            invoker.enter_stage(design, stage);
            for op in ops {
                debug!("{stage}: {op}");
                if let Err(reason) = invoker.invoke(design, op) {
                    error!("'{op}' failed in stage {stage}: {reason}");
                    return Err(PipelineError::Transform {
                        stage,
                        operation: op.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Run the script once with `config`
pub fn run<D, I>(design: &mut D, invoker: &mut I, config: &PipelineConfig) -> Result<()>
where
    D: DesignState + ?Sized,
    I: TransformInvoker<D> + ?Sized,
{
    SynthPipeline::new(config.clone()).run(design, invoker)
}
