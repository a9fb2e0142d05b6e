use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info_span;

use wellbeing_cli::harness::{
    Harness, StepOutcome, StepStatus, load_config, load_store, metric_catalog,
    read_event_stream, summarize,
};

use crate::cli::{InspectArgs, OutputFormatArg, ReplayArgs, SourceArgs};
use crate::summary::{print_dataset_summary, print_inspect, print_metrics, print_steps};

pub fn run_metrics() -> Result<()> {
    print_metrics(&metric_catalog());
    Ok(())
}

pub fn run_summary(args: &SourceArgs) -> Result<()> {
    let store = load_store(&args.paths())?;
    let summary = summarize(&store);
    match args.format {
        OutputFormatArg::Table => print_dataset_summary(&summary),
        OutputFormatArg::Json => print_json(&summary)?,
    }
    Ok(())
}

/// Returns whether any interaction was rejected.
pub fn run_inspect(args: &InspectArgs) -> Result<bool> {
    let span = info_span!("inspect", data = %args.sources.data.display());
    let _guard = span.enter();
    let config = load_config(args.config.as_deref())?;
    let store = load_store(&args.sources.paths())?;
    let mut harness = Harness::new(store, config)?;
    let report = harness.inspect(&args.interactions().events());
    match args.sources.format {
        OutputFormatArg::Table => print_inspect(&report),
        OutputFormatArg::Json => print_json(&report)?,
    }
    Ok(any_rejected(&report.steps))
}

/// Returns whether any event was rejected.
pub fn run_replay(args: &ReplayArgs) -> Result<bool> {
    let span = info_span!("replay", events = %args.events.display());
    let _guard = span.enter();
    let config = load_config(args.config.as_deref())?;
    let events = read_event_stream(&args.events)?;
    let store = load_store(&args.sources.paths())?;
    let mut harness = Harness::new(store, config)?;
    let steps = harness.apply(&events);
    match args.sources.format {
        OutputFormatArg::Table => print_steps(&steps),
        OutputFormatArg::Json => {
            for step in &steps {
                let line = serde_json::to_string(step).context("serialize step")?;
                println!("{line}");
            }
        }
    }
    Ok(any_rejected(&steps))
}

fn any_rejected(steps: &[StepOutcome]) -> bool {
    steps.iter().any(|step| step.status == StepStatus::Rejected)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}
