use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pakflow_cells::PrimitiveKind;
use pakflow_synth::{
    listing, render_plan, render_script, run_yosys, PipelineConfig, RunRange, SynthPipeline,
    YosysDesign, YosysScript,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// pakflow - synthesis for GreenPAK4 devices
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize Verilog sources with Yosys
    Synth {
        /// Verilog source files
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        #[command(flatten)]
        flow: FlowArgs,

        /// Yosys executable
        #[arg(long, default_value = "yosys")]
        yosys: PathBuf,

        /// Keep the generated script in this directory instead of a temporary one
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// Print the commands a synthesis run would issue
    Script {
        #[command(flatten)]
        flow: FlowArgs,

        /// List every stage and command with its conditions instead
        #[arg(long)]
        all: bool,

        /// Print as a plain Yosys script
        #[arg(long, conflicts_with = "all")]
        raw: bool,
    },

    /// List the GreenPAK4 primitive cells
    Cells,
}

/// Options shared by every command that runs the pipeline
#[derive(Args)]
struct FlowArgs {
    /// TOML file with a [synth] table; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Top module (default: detected automatically)
    #[arg(long)]
    top: Option<String>,

    /// Target part: SLG46140V, SLG46620V or SLG46621V (default)
    #[arg(long)]
    part: Option<String>,

    /// Write the mapped design to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Only run the stages between two labels, as <from>:<to>
    #[arg(long, value_name = "FROM:TO")]
    run: Option<RunRange>,

    /// Do not flatten the design before synthesis
    #[arg(long)]
    noflatten: bool,

    /// Retime logic across flip-flops
    #[arg(long)]
    retime: bool,
}

impl FlowArgs {
    fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_path(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?,
            None => PipelineConfig::default(),
        };
        if let Some(top) = self.top {
            config = config.with_top(top);
        }
        if let Some(part) = self.part {
            config = config.with_part(part);
        }
        if let Some(json) = self.json {
            config = config.with_json(json);
        }
        if let Some(range) = self.run {
            config = config.with_range(range);
        }
        if self.noflatten {
            config = config.with_flatten(false);
        }
        if self.retime {
            config = config.with_retime(true);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Synth {
            sources,
            flow,
            yosys,
            work_dir,
        } => {
            synthesize(sources, flow.into_config()?, &yosys, work_dir.as_deref())?;
        }

        Commands::Script { flow, all, raw } => {
            if all {
                print!("{}", listing());
            } else {
                print_plan(flow.into_config()?, raw)?;
            }
        }

        Commands::Cells => {
            list_cells();
        }
    }

    Ok(())
}

/// Run the pipeline into a Yosys script and execute it
fn synthesize(
    sources: Vec<PathBuf>,
    config: PipelineConfig,
    yosys: &Path,
    work_dir: Option<&Path>,
) -> Result<()> {
    for source in &sources {
        anyhow::ensure!(source.exists(), "Source file not found: {:?}", source);
    }
    info!("Synthesizing {} source file(s) for {}", sources.len(), config.part);

    let mut design = YosysDesign::from_sources(sources);
    SynthPipeline::new(config)
        .run(&mut design, &mut YosysScript)
        .context("Synthesis script generation failed")?;

    // The temporary directory must outlive the Yosys run
    let temp_dir;
    let dir = match work_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create work directory {:?}", dir))?;
            dir.to_path_buf()
        }
        None => {
            temp_dir = tempfile::TempDir::new()?;
            temp_dir.path().to_path_buf()
        }
    };

    let output = run_yosys(&design, yosys, &dir).context("Yosys run failed")?;
    print!("{}", output.stdout);
    info!("Script written to {:?}", output.script);

    println!("✅ Synthesis complete");
    Ok(())
}

/// Print the commands of the configured run, grouped by stage
fn print_plan(config: PipelineConfig, raw: bool) -> Result<()> {
    let plan = SynthPipeline::new(config)
        .plan()
        .context("Failed to plan synthesis run")?;
    if raw {
        print!("{}", render_script(&plan));
    } else {
        print!("{}", render_plan(&plan));
    }
    Ok(())
}

/// Print the primitive catalog
fn list_cells() {
    println!("{:<12} {:<22} {:<14} flags", "cell", "inputs", "outputs");
    for kind in PrimitiveKind::ALL {
        let mut flags = Vec::new();
        if kind.is_sequential() {
            flags.push("sequential");
        }
        if kind.must_keep() {
            flags.push("keep");
        }
        if !kind.is_simulatable() {
            flags.push("no-sim");
        }
        println!(
            "{:<12} {:<22} {:<14} {}",
            kind.name(),
            kind.input_ports().join(","),
            kind.output_ports().join(","),
            flags.join(",")
        );
    }
}
