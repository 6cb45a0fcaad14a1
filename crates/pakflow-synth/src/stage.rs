//! Pipeline stages and the run-range state machine

use crate::error::PipelineError;
use std::fmt;
use std::str::FromStr;

/// Named stages of the synthesis script, declared in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Begin,
    Flatten,
    Coarse,
    Fine,
    MapLuts,
    MapCells,
    Check,
    Json,
}

/// What a stage's operation list depends on besides the run range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Same operations on every run
    Unconditional,
    /// Runs only when flattening is enabled
    FlattenConditional,
    /// Operation arguments depend on the target part
    PartConditional,
    /// Contains an operation that runs only when retiming is enabled
    RetimeConditional,
}

impl Stage {
    /// Every stage, in execution order
    pub const ALL: [Stage; 8] = [
        Stage::Begin,
        Stage::Flatten,
        Stage::Coarse,
        Stage::Fine,
        Stage::MapLuts,
        Stage::MapCells,
        Stage::Check,
        Stage::Json,
    ];

    /// Label used by `-run <from>:<to>`
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Begin => "begin",
            Stage::Flatten => "flatten",
            Stage::Coarse => "coarse",
            Stage::Fine => "fine",
            Stage::MapLuts => "map_luts",
            Stage::MapCells => "map_cells",
            Stage::Check => "check",
            Stage::Json => "json",
        }
    }

    pub fn from_label(label: &str) -> Option<Stage> {
        Self::ALL.iter().copied().find(|stage| stage.label() == label)
    }

    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Flatten => StageKind::FlattenConditional,
            Stage::Fine => StageKind::RetimeConditional,
            Stage::MapLuts => StageKind::PartConditional,
            _ => StageKind::Unconditional,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label bounds given with `-run <from>:<to>`
///
/// Empty labels mean "from the start" and "to the end".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RunRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        let label = |l: Option<&str>| l.filter(|l| !l.is_empty()).map(str::to_string);
        Self {
            from: label(from),
            to: label(to),
        }
    }

    /// Range covering the whole script
    pub fn full() -> Self {
        Self::default()
    }
}

impl FromStr for RunRange {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| PipelineError::MalformedRange(s.to_string()))?;
        Ok(Self::new(Some(from), Some(to)))
    }
}

impl fmt::Display for RunRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.from.as_deref().unwrap_or(""),
            self.to.as_deref().unwrap_or("")
        )
    }
}

/// Inclusive-from, exclusive-to walk over the stage sequence
///
/// Labels are compared as given and are not checked against the known
/// stages: a `from` label that never matches keeps every stage inactive.
#[derive(Debug, Clone)]
pub struct ActiveRange<'a> {
    from: Option<&'a str>,
    to: Option<&'a str>,
    active: bool,
}

impl<'a> ActiveRange<'a> {
    pub fn new(range: &'a RunRange) -> Self {
        Self::from_labels(range.from.as_deref(), range.to.as_deref())
    }

    pub fn from_labels(from: Option<&'a str>, to: Option<&'a str>) -> Self {
        let from = from.filter(|l| !l.is_empty());
        let to = to.filter(|l| !l.is_empty());
        Self {
            from,
            to,
            active: from.is_none(),
        }
    }

    /// Reach the next stage; returns whether its operations run
    pub fn enter(&mut self, stage: Stage) -> bool {
        let label = stage.label();
        if self.from == Some(label) {
            self.active = true;
        }
        if self.to == Some(label) {
            self.active = false;
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_stages(range: &RunRange) -> Vec<Stage> {
        let mut active = ActiveRange::new(range);
        Stage::ALL.into_iter().filter(|s| active.enter(*s)).collect()
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = Stage::ALL.iter().map(Stage::label).collect();
        assert_eq!(
            labels,
            ["begin", "flatten", "coarse", "fine", "map_luts", "map_cells", "check", "json"]
        );
        for stage in Stage::ALL {
            assert_eq!(Stage::from_label(stage.label()), Some(stage));
        }
        assert_eq!(Stage::from_label("map"), None);
    }

    #[test]
    fn test_parse_run_range() {
        let range: RunRange = "fine:check".parse().unwrap();
        assert_eq!(range.from.as_deref(), Some("fine"));
        assert_eq!(range.to.as_deref(), Some("check"));

        let range: RunRange = ":map_luts".parse().unwrap();
        assert_eq!(range.from, None);
        assert_eq!(range.to.as_deref(), Some("map_luts"));

        let range: RunRange = ":".parse().unwrap();
        assert_eq!(range, RunRange::full());
        assert_eq!(range.to_string(), ":");
    }

    #[test]
    fn test_malformed_run_range() {
        let err = "fine".parse::<RunRange>().unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRange(ref s) if s == "fine"));
    }

    #[test]
    fn test_full_range() {
        assert_eq!(active_stages(&RunRange::full()), Stage::ALL.to_vec());
    }

    #[test]
    fn test_from_is_inclusive_to_is_exclusive() {
        let range = RunRange::new(Some("coarse"), Some("map_luts"));
        assert_eq!(active_stages(&range), vec![Stage::Coarse, Stage::Fine]);
    }

    #[test]
    fn test_to_only() {
        let range = RunRange::new(None, Some("fine"));
        assert_eq!(
            active_stages(&range),
            vec![Stage::Begin, Stage::Flatten, Stage::Coarse]
        );
    }

    #[test]
    fn test_unmatched_from_never_activates() {
        let range = RunRange::new(Some("nonexistent"), None);
        assert!(active_stages(&range).is_empty());
    }

    #[test]
    fn test_same_from_and_to() {
        // The to-check runs second, so the stage itself is excluded
        let range = RunRange::new(Some("fine"), Some("fine"));
        assert!(active_stages(&range).is_empty());
    }

    #[test]
    fn test_to_before_from() {
        let range = RunRange::new(Some("check"), Some("coarse"));
        assert_eq!(active_stages(&range), vec![Stage::Check, Stage::Json]);
    }

    #[test]
    fn test_stage_kinds() {
        assert_eq!(Stage::Flatten.kind(), StageKind::FlattenConditional);
        assert_eq!(Stage::MapLuts.kind(), StageKind::PartConditional);
        assert_eq!(Stage::Fine.kind(), StageKind::RetimeConditional);
        assert_eq!(Stage::Json.kind(), StageKind::Unconditional);
    }
}
