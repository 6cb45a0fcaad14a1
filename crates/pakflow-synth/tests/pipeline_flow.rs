//! End-to-end behavior of the synthesis pipeline against a recording invoker

use pakflow_cells::PrimitiveKind;
use pakflow_synth::{
    DesignState, InvokeError, Operation, PipelineConfig, PipelineError, RecordingInvoker,
    RunRange, SelectionOnly, Stage, SynthPipeline, TargetPart, TransformInvoker, YosysDesign,
    YosysScript,
};

fn run_recorded(config: PipelineConfig) -> (Result<(), PipelineError>, Vec<String>) {
    let mut design = SelectionOnly::full();
    let mut invoker = RecordingInvoker::new();
    let result = SynthPipeline::new(config).run(&mut design, &mut invoker);
    (result, invoker.commands())
}

fn range(from: &str, to: &str) -> RunRange {
    RunRange::new(Some(from), Some(to))
}

#[test]
fn test_full_default_run() {
    let config = PipelineConfig::new()
        .with_top("top")
        .with_json("top.json");
    let (result, commands) = run_recorded(config);
    result.unwrap();
    assert_eq!(
        commands,
        vec![
            "read_verilog -lib +/greenpak4/cells_sim.v",
            "hierarchy -check -top top",
            "proc",
            "flatten",
            "tribuf -logic",
            "synth -run coarse",
            "greenpak4_counters",
            "clean",
            "opt -fast -mux_undef -undriven -fine",
            "memory_map",
            "opt -undriven -fine",
            "techmap",
            "dfflibmap -prepare -liberty +/greenpak4/gp_dff.lib",
            "opt -fast",
            "nlutmap -luts 2,8,16,2",
            "clean",
            "dfflibmap -liberty +/greenpak4/gp_dff.lib",
            "techmap -map +/greenpak4/cells_map.v",
            "dffinit -ff GP_DFF Q INIT",
            "dffinit -ff GP_DFFR Q INIT",
            "dffinit -ff GP_DFFS Q INIT",
            "dffinit -ff GP_DFFSR Q INIT",
            "clean",
            "hierarchy -check",
            "stat",
            "check -noinit",
            "splitnets",
            "write_json top.json",
        ]
    );
}

#[test]
fn test_range_runs_fine_through_map_cells() {
    let config = PipelineConfig::new().with_range(range("fine", "check"));
    let plan = SynthPipeline::new(config.clone()).plan().unwrap();
    assert_eq!(
        plan.keys().copied().collect::<Vec<_>>(),
        vec![Stage::Fine, Stage::MapLuts, Stage::MapCells]
    );

    let (result, commands) = run_recorded(config);
    result.unwrap();
    assert_eq!(commands.first().map(String::as_str), Some("greenpak4_counters"));
    assert_eq!(commands.last().map(String::as_str), Some("clean"));
    assert!(!commands.iter().any(|c| c == "stat" || c.starts_with("synth")));
}

#[test]
fn test_unmatched_from_label_runs_nothing() {
    let config = PipelineConfig::new().with_range(range("nonexistent", ""));
    let (result, commands) = run_recorded(config);
    assert!(result.is_ok());
    assert!(commands.is_empty());
}

#[test]
fn test_lut_buckets_per_part() {
    for part in TargetPart::ALL {
        let config = PipelineConfig::new()
            .with_part(part.name())
            .with_range(range("map_luts", "map_cells"));
        let (result, commands) = run_recorded(config);
        result.unwrap();
        let expected = match part {
            TargetPart::Slg46140v => "nlutmap -luts 0,6,8,2",
            TargetPart::Slg46620v | TargetPart::Slg46621v => "nlutmap -luts 2,8,16,2",
        };
        assert_eq!(commands, vec![expected, "clean"], "{part}");
    }
}

#[test]
fn test_invalid_part_invokes_nothing() {
    let config = PipelineConfig::new().with_part("SLG46999V");
    let (result, commands) = run_recorded(config);
    match result {
        Err(PipelineError::InvalidPart(part)) => assert_eq!(part, "SLG46999V"),
        other => panic!("expected InvalidPart, got {other:?}"),
    }
    assert!(commands.is_empty());
}

#[test]
fn test_partial_selection_is_rejected_first() {
    let mut design = YosysDesign::from_sources(["top.v"]);
    design.select("top/u_fifo");
    let mut invoker = YosysScript;
    let err = SynthPipeline::new(PipelineConfig::new().with_part("bogus"))
        .run(&mut design, &mut invoker)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Selection));
    assert!(design.commands().is_empty());
}

#[test]
fn test_noflatten_keeps_flatten_label() {
    let config = PipelineConfig::new().with_flatten(false);
    let (_, full) = run_recorded(config.clone());
    assert!(!full.iter().any(|c| c == "proc" || c == "flatten" || c == "tribuf -logic"));

    // Starting at the disabled stage still activates everything after it
    let (result, commands) = run_recorded(config.with_range(range("flatten", "coarse")));
    result.unwrap();
    assert!(commands.is_empty());

    let config = PipelineConfig::new()
        .with_flatten(false)
        .with_range(range("flatten", "fine"));
    let (result, commands) = run_recorded(config);
    result.unwrap();
    assert_eq!(commands, vec!["synth -run coarse"]);
}

#[test]
fn test_retime_adds_abc() {
    for retime in [false, true] {
        let config = PipelineConfig::new()
            .with_retime(retime)
            .with_range(range("fine", "map_luts"));
        let (result, commands) = run_recorded(config);
        result.unwrap();
        assert_eq!(commands.iter().any(|c| c == "abc -dff"), retime);
        if retime {
            assert_eq!(commands.last().map(String::as_str), Some("abc -dff"));
        }
    }
}

#[test]
fn test_json_export_only_with_path() {
    for (json, expect_write) in [(None, false), (Some(""), false), (Some("out.json"), true)] {
        let mut config = PipelineConfig::new().with_range(range("json", ""));
        if let Some(path) = json {
            config = config.with_json(path);
        }
        let (result, commands) = run_recorded(config);
        result.unwrap();
        assert_eq!(commands[0], "splitnets");
        assert_eq!(
            commands.iter().any(|c| c.starts_with("write_json")),
            expect_write,
            "json = {json:?}"
        );
    }
}

#[test]
fn test_transform_failure_aborts_run() {
    let mut design = SelectionOnly::full();
    let mut invoker = RecordingInvoker::failing_on("memory_map");
    let err = SynthPipeline::new(PipelineConfig::new())
        .run(&mut design, &mut invoker)
        .unwrap_err();
    match err {
        PipelineError::Transform {
            stage,
            operation,
            reason,
        } => {
            assert_eq!(stage, Stage::Fine);
            assert_eq!(operation, "memory_map");
            assert!(matches!(reason, InvokeError::Failed(_)));
        }
        other => panic!("expected Transform, got {other:?}"),
    }
    // Nothing after the failing operation was issued
    assert_eq!(invoker.calls().last(), Some(&Operation::MemoryMap));
}

#[test]
fn test_emitted_cell_names_resolve_in_library() {
    let (result, commands) = run_recorded(PipelineConfig::new());
    result.unwrap();
    let names: Vec<&str> = commands
        .iter()
        .filter_map(|c| c.strip_prefix("dffinit -ff "))
        .filter_map(|rest| rest.split_whitespace().next())
        .collect();
    assert_eq!(names.len(), 4);
    for name in names {
        let kind = PrimitiveKind::from_name(name)
            .unwrap_or_else(|| panic!("{name} is not a library cell"));
        assert!(kind.is_flip_flop());
    }
}

/// Design that loses its full selection after the first transform
struct Shrinking {
    selected: bool,
}

impl DesignState for Shrinking {
    fn is_fully_selected(&self) -> bool {
        self.selected
    }
}

struct Narrowing;

impl TransformInvoker<Shrinking> for Narrowing {
    fn invoke(&mut self, design: &mut Shrinking, _op: &Operation) -> Result<(), InvokeError> {
        design.selected = false;
        Ok(())
    }
}

#[test]
fn test_selection_checked_once_before_run() {
    let mut design = Shrinking { selected: true };
    SynthPipeline::new(PipelineConfig::new())
        .run(&mut design, &mut Narrowing)
        .unwrap();
    assert!(!design.selected);
}

#[test]
fn test_yosys_script_from_run() {
    let mut design = YosysDesign::from_sources(["counter.v"]);
    let config = PipelineConfig::new()
        .with_top("counter")
        .with_range(range("", "flatten"));
    SynthPipeline::new(config)
        .run(&mut design, &mut YosysScript)
        .unwrap();
    assert_eq!(
        design.script(),
        "read_verilog counter.v\n\
         log -stdout pakflow-step 0\n\
         read_verilog -lib +/greenpak4/cells_sim.v\n\
         log -stdout pakflow-step 1\n\
         hierarchy -check -top counter\n"
    );
}
