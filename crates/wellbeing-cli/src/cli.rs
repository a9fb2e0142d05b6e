//! CLI argument definitions for the well-being dashboard harness.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use wellbeing_cli::harness::{Interactions, RegionFilter};
use wellbeing_ingest::SourcePaths;
use wellbeing_model::{CountryId, Metric, Year};

#[derive(Parser)]
#[command(
    name = "wellbeing",
    version,
    about = "Headless harness for the world happiness dashboard",
    long_about = "Load the happiness data table, the region table and an optional \
                  boundary file, apply interactions and print what every view derives."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the metrics with their default bin widths.
    Metrics,

    /// Describe a dataset: size, years and region classifications.
    Summary(SourceArgs),

    /// Apply interactions given as flags and print every view.
    Inspect(InspectArgs),

    /// Apply a JSON-lines stream of interaction events.
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Happiness data table (CSV).
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Region classification table (CSV).
    #[arg(value_name = "REGIONS")]
    pub regions: PathBuf,

    /// Map boundary file (TopoJSON or GeoJSON).
    #[arg(long = "boundaries", value_name = "FILE")]
    pub boundaries: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

impl SourceArgs {
    pub fn paths(&self) -> SourcePaths {
        SourcePaths {
            data: self.data.clone(),
            regions: self.regions.clone(),
            boundaries: self.boundaries.clone(),
        }
    }
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Dashboard configuration (TOML).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Selected year.
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<Year>,

    /// Click a country on the comparison map. Repeatable.
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<CountryId>,

    /// Primary country.
    #[arg(long = "primary", value_name = "ID")]
    pub primary: Option<CountryId>,

    /// Region filter, e.g. `region=Europe`.
    #[arg(long = "region", value_name = "COLUMN=VALUE")]
    pub region: Option<RegionFilter>,

    /// Metric compared against happiness.
    #[arg(long = "metric", value_name = "NAME")]
    pub metric: Option<Metric>,

    /// Confidence percentage for the regression band, e.g. 95.
    #[arg(long = "confidence", value_name = "PCT")]
    pub confidence: Option<f64>,

    /// Number of histogram bins.
    #[arg(long = "bins", value_name = "N")]
    pub bins: Option<usize>,
}

impl InspectArgs {
    pub fn interactions(&self) -> Interactions {
        Interactions {
            year: self.year,
            select: self.select.clone(),
            primary: self.primary,
            region: self.region.clone(),
            metric: self.metric,
            confidence: self.confidence,
            bins: self.bins,
        }
    }
}

#[derive(Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Interaction events, one JSON object per line.
    #[arg(value_name = "EVENTS")]
    pub events: PathBuf,

    /// Dashboard configuration (TOML).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
