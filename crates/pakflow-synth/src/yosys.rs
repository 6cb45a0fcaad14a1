//! Yosys binding
//!
//! [`YosysScript`] collects the pipeline's commands into a [`YosysDesign`],
//! and [`run_yosys`] executes the resulting script with the `yosys` binary.
//!
//! Every queued command is preceded by a `log -stdout` marker carrying its
//! index, so a failing run can be traced back to the stage and operation that
//! were executing when Yosys stopped.

use crate::error::{InvokeError, PipelineError, Result};
use crate::invoker::{DesignState, TransformInvoker};
use crate::operation::Operation;
use crate::stage::Stage;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, error, warn};

/// Name of the script file written by [`run_yosys`]
pub const SCRIPT_FILE: &str = "synth_greenpak4.ys";

/// Prefix of the progress lines the script prints before each command
pub const STEP_MARKER: &str = "pakflow-step";

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptStep {
    stage: Option<Stage>,
    command: String,
}

/// A design held by Yosys, described by how to load it and what to run on it
#[derive(Debug, Clone, Default)]
pub struct YosysDesign {
    sources: Vec<PathBuf>,
    selection: Vec<String>,
    stage: Option<Stage>,
    steps: Vec<ScriptStep>,
}

impl YosysDesign {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources<I, P>(sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Restrict the design to a sub-selection
    pub fn select(&mut self, pattern: impl Into<String>) {
        self.selection.push(pattern.into());
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Commands queued so far, without the source loading prologue
    pub fn commands(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.command.as_str()).collect()
    }

    /// Attribute the commands queued from now on to `stage`
    pub fn set_stage(&mut self, stage: Stage) {
        self.stage = Some(stage);
    }

    pub fn push_command(&mut self, command: impl Into<String>) {
        self.steps.push(ScriptStep {
            stage: self.stage,
            command: command.into(),
        });
    }

    /// Complete script text: load sources, apply the selection, run commands
    pub fn script(&self) -> String {
        let mut script = String::new();
        for source in &self.sources {
            let _ = writeln!(script, "read_verilog {}", source.display());
        }
        for pattern in &self.selection {
            let _ = writeln!(script, "select {pattern}");
        }
        for (index, step) in self.steps.iter().enumerate() {
            let _ = writeln!(script, "log -stdout {STEP_MARKER} {index}");
            let _ = writeln!(script, "{}", step.command);
        }
        script
    }

    /// Step announced by the last marker in `stdout`
    fn last_step(&self, stdout: &str) -> Option<&ScriptStep> {
        let index = stdout
            .lines()
            .filter_map(|line| line.trim().strip_prefix(STEP_MARKER))
            .filter_map(|index| index.trim().parse::<usize>().ok())
            .last()?;
        self.steps.get(index)
    }
}

impl DesignState for YosysDesign {
    fn is_fully_selected(&self) -> bool {
        self.selection.is_empty()
    }
}

/// Invoker that queues each operation as a line of the design's script
#[derive(Debug, Clone, Copy, Default)]
pub struct YosysScript;

impl TransformInvoker<YosysDesign> for YosysScript {
    fn enter_stage(&mut self, design: &mut YosysDesign, stage: Stage) {
        design.set_stage(stage);
    }

    fn invoke(
        &mut self,
        design: &mut YosysDesign,
        op: &Operation,
    ) -> std::result::Result<(), InvokeError> {
        design.push_command(op.to_string());
        Ok(())
    }
}

/// Captured output of a Yosys run
#[derive(Debug, Clone)]
pub struct YosysOutput {
    pub script: PathBuf,
    pub stdout: String,
    pub stderr: String,
}

/// Write the design's script into `work_dir` and run it with `yosys`
///
/// `yosys` is the binary to execute, usually just `"yosys"` from `PATH`.
/// A failure while a queued operation was running is reported as
/// [`PipelineError::Transform`] for that operation; failures before the first
/// operation (loading sources, a missing binary) as [`PipelineError::Engine`].
pub fn run_yosys(
    design: &YosysDesign,
    yosys: impl AsRef<Path>,
    work_dir: impl AsRef<Path>,
) -> Result<YosysOutput> {
    let yosys = yosys.as_ref();
    let script = work_dir.as_ref().join(SCRIPT_FILE);
    std::fs::write(&script, design.script())?;

    debug!("Running {} -q -s {}", yosys.display(), script.display());
    let output = Command::new(yosys)
        .arg("-q")
        .arg("-s")
        .arg(&script)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            PipelineError::Engine(InvokeError::ToolNotFound(format!(
                "{}: {}",
                yosys.display(),
                e
            )))
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        let message = if stderr.trim().is_empty() {
            format!("yosys exited with {}", output.status)
        } else {
            stderr.trim().to_string()
        };
        let reason = InvokeError::Failed(message);
        return Err(match design.last_step(&stdout) {
            Some(ScriptStep {
                stage: Some(stage),
                command,
            }) => {
                error!("'{command}' failed in stage {stage}: {reason}");
                PipelineError::Transform {
                    stage: *stage,
                    operation: command.clone(),
                    reason,
                }
            }
            _ => {
                error!("Yosys failed: {reason}");
                PipelineError::Engine(reason)
            }
        });
    }
    if !stderr.trim().is_empty() {
        warn!("Yosys warnings: {}", stderr.trim());
    }

    Ok(YosysOutput {
        script,
        stdout,
        stderr,
    })
}
