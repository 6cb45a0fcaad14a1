//! Loading pipeline configuration from disk

use pakflow_synth::{PipelineConfig, PipelineError, RecordingInvoker, SelectionOnly, SynthPipeline};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_and_run_from_file() {
    let file = write_config(
        r#"
[synth]
top = "uart_tx"
part = "SLG46140V"
json = "uart_tx.json"
run = "map_luts:check"
"#,
    );
    let config = PipelineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.json_path(), Some(Path::new("uart_tx.json")));

    let mut design = SelectionOnly::full();
    let mut invoker = RecordingInvoker::new();
    SynthPipeline::new(config)
        .run(&mut design, &mut invoker)
        .unwrap();
    let commands = invoker.commands();
    assert_eq!(commands[0], "nlutmap -luts 0,6,8,2");
    assert!(!commands.iter().any(|c| c.starts_with("write_json")));
}

#[test]
fn test_overrides_apply_on_top_of_file() {
    let file = write_config("[synth]\npart = \"SLG46620V\"\nretime = true\n");
    let config = PipelineConfig::from_path(file.path())
        .unwrap()
        .with_retime(false)
        .with_top("core");
    assert_eq!(config.part, "SLG46620V");
    assert!(!config.retime);
    assert_eq!(config.top.as_deref(), Some("core"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PipelineConfig::from_path(dir.path().join("pakflow.toml")).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}

#[test]
fn test_bad_toml_is_config_error() {
    let file = write_config("[synth\npart = ");
    let err = PipelineConfig::from_path(file.path()).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn test_invalid_part_from_file_fails_at_run() {
    let file = write_config("[synth]\npart = \"SLG46621\"\n");
    let config = PipelineConfig::from_path(file.path()).unwrap();
    let mut design = SelectionOnly::full();
    let mut invoker = RecordingInvoker::new();
    let err = SynthPipeline::new(config)
        .run(&mut design, &mut invoker)
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid part name: 'SLG46621'");
    assert!(invoker.calls().is_empty());
}
