//! # gdp-var
//!
//! Command-line front end: estimate the GDP/inflation equations on a
//! quarterly CSV table and report the dynamic out-of-sample forecast.

use clap::{Args, Parser, Subcommand};
use gdp_var::core::{PeriodWindow, Quarter};
use gdp_var::io::{read_table, write_forecast_file};
use gdp_var::models::var::{run, VarConfig};
use gdp_var::report::RunReport;
use gdp_var::{ForecastError, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gdp-var")]
#[command(about = "VAR-style GDP growth and inflation forecasting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate both equations and produce the dynamic forecast
    Run {
        /// Quarterly CSV with a date column followed by `gdp` and `cpi`
        #[arg(short, long)]
        input: PathBuf,

        /// JSON configuration file (missing fields use the defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the forecast path to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the default configuration as JSON
    DefaultConfig,
}

/// Per-field configuration overrides, applied after the config file.
#[derive(Args)]
struct Overrides {
    /// First quarter of the estimation window (e.g. 1963Q1)
    #[arg(long)]
    estimation_start: Option<Quarter>,

    /// Last quarter of the estimation window
    #[arg(long)]
    estimation_end: Option<Quarter>,

    /// First quarter of the prediction window
    #[arg(long)]
    prediction_start: Option<Quarter>,

    /// Last quarter of the prediction window
    #[arg(long)]
    prediction_end: Option<Quarter>,

    /// First quarter forecast recursively
    #[arg(long)]
    cutover: Option<Quarter>,

    /// Lags of each variable in both equations
    #[arg(long)]
    lag_order: Option<usize>,

    /// Truncation lag of the HAC covariance
    #[arg(long)]
    hac_lags: Option<usize>,

    /// Discard observations from this quarter on
    #[arg(long, conflicts_with = "full_sample")]
    sample_end: Option<Quarter>,

    /// Keep every observation in the input
    #[arg(long)]
    full_sample: bool,
}

impl Overrides {
    fn apply(&self, mut config: VarConfig) -> Result<VarConfig> {
        config.estimation = PeriodWindow::new(
            self.estimation_start.unwrap_or(config.estimation.start()),
            self.estimation_end.unwrap_or(config.estimation.end()),
        )?;
        config.prediction = PeriodWindow::new(
            self.prediction_start.unwrap_or(config.prediction.start()),
            self.prediction_end.unwrap_or(config.prediction.end()),
        )?;
        if let Some(cutover) = self.cutover {
            config.cutover = cutover;
        }
        if let Some(lag_order) = self.lag_order {
            config.lag_order = lag_order;
        }
        if let Some(hac_lags) = self.hac_lags {
            config.hac_lags = hac_lags;
        }
        if self.full_sample {
            config.sample_end = None;
        } else if let Some(end) = self.sample_end {
            config.sample_end = Some(end);
        }
        config.validate()?;
        Ok(config)
    }
}

fn run_command(
    input: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    overrides: &Overrides,
) -> Result<()> {
    let config = match config {
        Some(path) => VarConfig::from_json_file(path)?,
        None => VarConfig::default(),
    };
    let config = overrides.apply(config)?;
    info!(
        estimation = %config.estimation,
        prediction = %config.prediction,
        cutover = %config.cutover,
        "configuration"
    );

    let table = read_table(input)?;
    let result = run(&table, &config)?;
    println!("{}", RunReport(&result));

    if let Some(path) = output {
        write_forecast_file(path, &result.path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gdp_var=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Commands::Run {
            input,
            config,
            output,
            overrides,
        } => run_command(input, config.as_deref(), output.as_deref(), overrides),
        Commands::DefaultConfig => serde_json::to_string_pretty(&VarConfig::default())
            .map(|json| println!("{}", json))
            .map_err(ForecastError::from),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
