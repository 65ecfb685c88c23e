use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, info_span, warn};

use tabstat_ingest::{
    AttemptStage, ColumnSummary, LoadOptions, LoadReport, RobustLoader, SkippedRow, Table,
};
use tabstat_stats::{
    BootstrapConfig, BootstrapResult, Sample, Statistic, SummaryOptions, estimate, summarize,
};

use crate::cli::{BootstrapArgs, Command, DescribeArgs, InputArgs, InspectArgs, ResampleArgs};
use crate::report::{render_bootstrap, render_inspect};

/// How a file was read.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub path: PathBuf,
    pub encoding: String,
    pub stage: AttemptStage,
    /// Label proposed by the detector, if any.
    pub detected: Option<String>,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub skipped_rows: Vec<SkippedRow>,
    /// One line per attempt that failed before the successful one.
    pub failed_attempts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescribeReport {
    pub column: String,
    pub n: usize,
    pub dropped_nulls: usize,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub column: String,
    pub statistic: Statistic,
    pub n: usize,
    pub dropped_nulls: usize,
    #[serde(flatten)]
    pub result: BootstrapResult,
}

/// Run a subcommand and render its output.
///
/// `styled` enables ANSI styling of tables.
pub fn execute(command: &Command, styled: bool) -> Result<String> {
    match command {
        Command::Inspect(args) => {
            let report = run_inspect(args)?;
            render_inspect(&report, args.json, styled)
        }
        Command::Describe(args) => run_describe(args).map(|report| report.summary),
        Command::Bootstrap(args) => {
            let report = run_bootstrap(args)?;
            render_bootstrap(&report, args.json, styled)
        }
    }
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectReport> {
    let report = load_table(&args.input)?;
    Ok(InspectReport {
        path: args.input.file.clone(),
        encoding: report.encoding.name().to_string(),
        stage: report.stage,
        detected: report.guess.label.clone(),
        rows: report.table.height(),
        columns: report.table.schema_summary(),
        failed_attempts: report
            .failed_attempts
            .iter()
            .map(ToString::to_string)
            .collect(),
        skipped_rows: report.skipped_rows,
    })
}

pub fn run_describe(args: &DescribeArgs) -> Result<DescribeReport> {
    let report = load_table(&args.input)?;
    let (sample, dropped_nulls) = column_sample(&report.table, &args.column)?;
    let span = info_span!("describe", column = %args.column, n = sample.len());
    let _guard = span.enter();

    let options = SummaryOptions::default()
        .with_ci(args.ci)
        .with_digits(args.digits)
        .with_style(args.style.into())
        .with_confidence_level(args.resample.confidence)
        .with_resamples(args.resample.resamples)
        .with_seed(args.resample.seed)
        .with_method(args.resample.method.into());
    let summary = summarize(&sample, &options)
        .with_context(|| format!("failed to summarize column {:?}", args.column))?;

    Ok(DescribeReport {
        column: args.column.clone(),
        n: sample.len(),
        dropped_nulls,
        summary,
    })
}

pub fn run_bootstrap(args: &BootstrapArgs) -> Result<BootstrapReport> {
    let report = load_table(&args.input)?;
    let (sample, dropped_nulls) = column_sample(&report.table, &args.column)?;
    let statistic = Statistic::from(args.statistic);
    let span = info_span!("bootstrap", column = %args.column, %statistic);
    let _guard = span.enter();

    let config = bootstrap_config(&args.resample);
    let result = estimate(&sample, &statistic, &config)
        .with_context(|| format!("failed to bootstrap the {statistic} of {:?}", args.column))?;
    info!(
        point_estimate = result.point_estimate,
        lower = result.lower,
        upper = result.upper,
        "bootstrap complete"
    );

    Ok(BootstrapReport {
        column: args.column.clone(),
        statistic,
        n: sample.len(),
        dropped_nulls,
        result,
    })
}

fn bootstrap_config(args: &ResampleArgs) -> BootstrapConfig {
    BootstrapConfig::default()
        .with_confidence_level(args.confidence)
        .with_resamples(args.resamples)
        .with_seed(args.seed)
        .with_method(args.method.into())
}

fn load_table(input: &InputArgs) -> Result<LoadReport> {
    let options = LoadOptions::default()
        .with_delimiter(input.delimiter)
        .with_prefix_bytes(input.prefix_bytes);
    RobustLoader::new(options)
        .load_with_report(&input.file)
        .with_context(|| format!("failed to load {}", input.file.display()))
}

/// Numeric sample of one column, nulls dropped. Returns the drop count too.
fn column_sample(table: &Table, name: &str) -> Result<(Sample, usize)> {
    let column = table.column(name).ok_or_else(|| {
        anyhow!(
            "column {name:?} not found; available columns: {}",
            table.column_names().join(", ")
        )
    })?;
    let dropped = column.null_count();
    if dropped > 0 {
        warn!(column = name, dropped, "dropping null cells before computing");
    }
    let sample = Sample::from_series_dropping_nulls(column.as_materialized_series())
        .with_context(|| format!("column {name:?} is not a usable numeric sample"))?;
    Ok((sample, dropped))
}
