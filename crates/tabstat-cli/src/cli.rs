//! CLI argument definitions for tabstat.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tabstat_ingest::DEFAULT_PREFIX_BYTES;
use tabstat_stats::{BootstrapMethod, Statistic, SummaryStyle};

#[derive(Parser)]
#[command(
    name = "tabstat",
    version,
    about = "Load irregular delimited files and compute reproducible bootstrap statistics",
    long_about = "Load delimited text files of unknown encoding and compute descriptive\n\
                  statistics with seeded bootstrap confidence intervals.\n\n\
                  Encodings are detected from a byte prefix; failed decodes fall back to\n\
                  UTF-8 and then ISO-8859-1. Malformed rows are skipped and reported."
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

    /// Prefix pretty and compact log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a file and show how it was read: encoding, schema, skipped rows.
    Inspect(InspectArgs),

    /// Print a one-line descriptive summary of a numeric column.
    Describe(DescribeArgs),

    /// Bootstrap a confidence interval for a statistic of a numeric column.
    Bootstrap(BootstrapArgs),
}

/// Where the table comes from and how to read it.
#[derive(Args, Clone)]
pub struct InputArgs {
    /// Delimited text file with a header row.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter: a single ASCII character, or `tab`.
    #[arg(long, short = 'd', default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Bytes inspected for encoding detection.
    #[arg(long = "prefix-bytes", value_name = "N", default_value_t = DEFAULT_PREFIX_BYTES)]
    pub prefix_bytes: usize,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Resampling flags shared by `describe` and `bootstrap`.
#[derive(Args, Clone)]
pub struct ResampleArgs {
    /// Confidence level, strictly between 0 and 1.
    #[arg(long, value_name = "LEVEL", default_value_t = 0.95)]
    pub confidence: f64,

    /// Number of bootstrap resamples.
    #[arg(long, value_name = "N", default_value_t = 10_000)]
    pub resamples: usize,

    /// Seed of the resampling generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// How bounds are read from the bootstrap distribution.
    #[arg(long, value_enum, default_value = "percentile")]
    pub method: MethodArg,
}

#[derive(Args)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Column to summarize.
    #[arg(long, short = 'c')]
    pub column: String,

    /// Append a bootstrap confidence interval for the mean.
    #[arg(long)]
    pub ci: bool,

    /// Decimals in the rendered summary.
    #[arg(long, default_value_t = 2)]
    pub digits: usize,

    /// Output template.
    #[arg(long, value_enum, default_value = "plain")]
    pub style: StyleArg,

    #[command(flatten)]
    pub resample: ResampleArgs,
}

#[derive(Args)]
pub struct BootstrapArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Column to resample.
    #[arg(long, short = 'c')]
    pub column: String,

    /// Statistic to estimate.
    #[arg(long, value_enum, default_value = "mean")]
    pub statistic: StatisticArg,

    #[command(flatten)]
    pub resample: ResampleArgs,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Percentile,
    Bca,
}

impl From<MethodArg> for BootstrapMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Percentile => BootstrapMethod::Percentile,
            MethodArg::Bca => BootstrapMethod::Bca,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatisticArg {
    Mean,
    Median,
    StdDev,
}

impl From<StatisticArg> for Statistic {
    fn from(arg: StatisticArg) -> Self {
        match arg {
            StatisticArg::Mean => Statistic::Mean,
            StatisticArg::Median => Statistic::Median,
            StatisticArg::StdDev => Statistic::StdDev,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StyleArg {
    Plain,
    Latex,
}

impl From<StyleArg> for SummaryStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Plain => SummaryStyle::Plain,
            StyleArg::Latex => SummaryStyle::Latex,
        }
    }
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

/// Parses `--delimiter`: one ASCII character, or `tab` / `\t`.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        (Some(_), None) => Err(format!("delimiter must be ASCII, got {value:?}")),
        _ => Err(format!(
            "delimiter must be a single character, got {value:?}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("§").is_err());
    }

    #[test]
    fn test_describe_defaults() {
        let cli = Cli::try_parse_from(["tabstat", "describe", "data.csv", "--column", "score"])
            .unwrap();
        let Command::Describe(args) = cli.command else {
            panic!("expected describe");
        };
        assert_eq!(args.input.delimiter, b',');
        assert_eq!(args.input.prefix_bytes, 10_000);
        assert_eq!(args.resample.confidence, 0.95);
        assert_eq!(args.resample.resamples, 10_000);
        assert_eq!(args.resample.seed, 42);
        assert_eq!(args.digits, 2);
        assert!(!args.ci);
    }

    #[test]
    fn test_bootstrap_flags() {
        let cli = Cli::try_parse_from([
            "tabstat",
            "bootstrap",
            "data.tsv",
            "-d",
            "tab",
            "-c",
            "rt",
            "--statistic",
            "std-dev",
            "--method",
            "bca",
            "--json",
        ])
        .unwrap();
        let Command::Bootstrap(args) = cli.command else {
            panic!("expected bootstrap");
        };
        assert_eq!(args.input.delimiter, b'\t');
        assert_eq!(Statistic::from(args.statistic), Statistic::StdDev);
        assert_eq!(
            BootstrapMethod::from(args.resample.method),
            BootstrapMethod::Bca
        );
        assert!(args.json);
    }
}
