//! Human-readable rendering of the synthesis script

use crate::config::PipelineConfig;
use crate::operation::Operation;
use crate::part::TargetPart;
use crate::pipeline::{stage_operations, Plan};
use crate::stage::{Stage, StageKind};
use std::fmt::Write;

const NOTE_COLUMN: usize = 29;

fn line_with_note(out: &mut String, text: &str, note: &str) {
    let _ = writeln!(out, "        {:<width$}{}", text, note, width = NOTE_COLUMN);
}

/// Every stage with all the commands it can issue
///
/// Conditional commands carry the option that enables them, and the LUT
/// mapping line is repeated for each supported part.
pub fn listing() -> String {
    let mut out = String::new();
    // Every conditional command enabled
    let all = PipelineConfig::new()
        .with_top("<top>")
        .with_json("<file-name>")
        .with_retime(true);

    for stage in Stage::ALL {
        match stage.kind() {
            StageKind::FlattenConditional => {
                let _ = writeln!(out, "    {:<17}(unless --noflatten)", format!("{stage}:"));
            }
            _ => {
                let _ = writeln!(out, "    {stage}:");
            }
        }

        let ops = stage_operations(stage, &all, TargetPart::default());
        for op in &ops {
            match op {
                Operation::NlutMap(_) => {
                    for part in TargetPart::ALL {
                        let mapped = Operation::NlutMap(part.lut_buckets()).to_string();
                        line_with_note(&mut out, &mapped, &format!("(for --part {part})"));
                    }
                }
                Operation::AbcRetime => line_with_note(&mut out, &op.to_string(), "(only if --retime)"),
                Operation::WriteJson(_) => line_with_note(&mut out, &op.to_string(), "(only if --json)"),
                _ => {
                    let _ = writeln!(out, "        {op}");
                }
            }
        }
        out.push('\n');
    }
    out
}

/// The commands of a plan, grouped under their stage labels
pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();
    for (stage, ops) in plan {
        let _ = writeln!(out, "{stage}:");
        for op in ops {
            let _ = writeln!(out, "    {op}");
        }
    }
    out
}

/// The commands of a plan as a flat script, one per line
pub fn render_script(plan: &Plan) -> String {
    let mut out = String::new();
    for (stage, ops) in plan {
        let _ = writeln!(out, "# {stage}");
        for op in ops {
            let _ = writeln!(out, "{op}");
        }
    }
    out
}
