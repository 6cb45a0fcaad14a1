//! Pipeline configuration
//!
//! A configuration is built once per run, either directly or from the
//! `[synth]` table of a TOML file:
//!
//! ```toml
//! [synth]
//! top = "blinky"
//! part = "SLG46140V"
//! json = "build/blinky.json"
//! run = "begin:map_cells"
//! flatten = true
//! retime = false
//! ```

use crate::error::{PipelineError, Result};
use crate::part::TargetPart;
use crate::stage::RunRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Part used when none is given
pub const DEFAULT_PART: &str = "SLG46621V";

fn default_part() -> String {
    DEFAULT_PART.to_string()
}

fn default_true() -> bool {
    true
}

/// Options for one synthesis run
///
/// `part` is kept as given and validated when the run starts, so that an
/// unknown part is reported by the run itself after the selection check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Top module; `None` lets the hierarchy pass pick one
    #[serde(default)]
    pub top: Option<String>,

    #[serde(default = "default_part")]
    pub part: String,

    /// JSON netlist output; `None` or empty skips the export
    #[serde(default)]
    pub json: Option<PathBuf>,

    #[serde(default)]
    pub run_from: Option<String>,

    #[serde(default)]
    pub run_to: Option<String>,

    #[serde(default = "default_true")]
    pub flatten: bool,

    /// Retime across flip-flops during fine synthesis
    #[serde(default)]
    pub retime: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top: None,
            part: default_part(),
            json: None,
            run_from: None,
            run_to: None,
            flatten: true,
            retime: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top(mut self, top: impl Into<String>) -> Self {
        self.top = Some(top.into());
        self
    }

    pub fn with_part(mut self, part: impl Into<String>) -> Self {
        self.part = part.into();
        self
    }

    pub fn with_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.json = Some(path.into());
        self
    }

    pub fn with_range(mut self, range: RunRange) -> Self {
        self.run_from = range.from;
        self.run_to = range.to;
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn with_retime(mut self, retime: bool) -> Self {
        self.retime = retime;
        self
    }

    /// Output path, if export is enabled
    pub fn json_path(&self) -> Option<&Path> {
        self.json
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn range(&self) -> RunRange {
        RunRange::new(self.run_from.as_deref(), self.run_to.as_deref())
    }

    /// Resolve the part name against the supported devices
    pub fn target_part(&self) -> Result<TargetPart> {
        self.part.parse()
    }

    /// Load the `[synth]` table of a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Parse the `[synth]` table of a TOML document
    ///
    /// A document without the table yields the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(s).map_err(|e| PipelineError::Config(e.to_string()))?;
        file.synth.into_config()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    synth: SynthTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SynthTable {
    top: Option<String>,
    part: Option<String>,
    json: Option<PathBuf>,
    run: Option<String>,
    flatten: Option<bool>,
    retime: Option<bool>,
}

impl SynthTable {
    fn into_config(self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::default();
        config.top = self.top.filter(|top| !top.is_empty());
        if let Some(part) = self.part {
            config.part = part;
        }
        config.json = self.json;
        if let Some(run) = self.run {
            config = config.with_range(run.parse()?);
        }
        if let Some(flatten) = self.flatten {
            config.flatten = flatten;
        }
        if let Some(retime) = self.retime {
            config.retime = retime;
        }
        Ok(config)
    }
}
