//! CryptoScalp CLI — scan bar files for mean-reversion signals.
//!
//! Commands:
//! - `scan` — replay one or more CSV files through the Bollinger + RSI pipeline
//! - `synth` — write a deterministic synthetic bar series to CSV
//! - `config` — print the default signal configuration as TOML

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cryptoscalp_core::data::{read_bars_csv, write_bars_csv, SyntheticBars};
use cryptoscalp_core::export::{signals_to_csv, SignalReport};
use cryptoscalp_core::indicators::StdDevMode;
use cryptoscalp_core::{
    MarketScanner, PipelineError, ScanSummary, SignalConfig, SignalRow,
};

#[derive(Parser)]
#[command(
    name = "cryptoscalp",
    about = "CryptoScalp CLI — Bollinger Band + RSI mean-reversion scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay bar files through the signal pipeline and report signals.
    Scan {
        /// CSV files with bars (native or Yahoo Finance layout).
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Symbol label. Only valid with a single input; defaults to the file stem.
        #[arg(long)]
        symbol: Option<String>,

        /// TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bollinger window length.
        #[arg(long)]
        window: Option<usize>,

        /// Bollinger band multiplier.
        #[arg(long)]
        k: Option<f64>,

        /// RSI period.
        #[arg(long)]
        rsi_period: Option<usize>,

        /// RSI oversold threshold.
        #[arg(long)]
        oversold: Option<f64>,

        /// RSI overbought threshold.
        #[arg(long)]
        overbought: Option<f64>,

        /// Use population standard deviation instead of sample.
        #[arg(long, default_value_t = false)]
        population: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Number of most recent rows shown in table output.
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Write a synthetic bar series to CSV.
    Synth {
        /// Number of bars.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Opening price of the first bar.
        #[arg(long, default_value_t = 100.0)]
        start_price: f64,

        /// Maximum absolute per-bar return (0.01 = ±1%).
        #[arg(long, default_value_t = 0.01)]
        volatility: f64,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,
    },
    /// Print the default configuration as TOML.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// Flag overrides applied on top of the file (or default) configuration.
struct Overrides {
    window: Option<usize>,
    k: Option<f64>,
    rsi_period: Option<usize>,
    oversold: Option<f64>,
    overbought: Option<f64>,
    population: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            inputs,
            symbol,
            config,
            window,
            k,
            rsi_period,
            oversold,
            overbought,
            population,
            format,
            tail,
        } => {
            let overrides = Overrides {
                window,
                k,
                rsi_period,
                oversold,
                overbought,
                population,
            };
            let config = build_config(config.as_deref(), &overrides)?;
            run_scan(&inputs, symbol, config, format, tail)
        }
        Commands::Synth {
            bars,
            seed,
            start_price,
            volatility,
            output,
        } => run_synth(bars, seed, start_price, volatility, &output),
        Commands::Config => {
            print!("{}", SignalConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn build_config(path: Option<&Path>, overrides: &Overrides) -> Result<SignalConfig> {
    let mut config = match path {
        Some(path) => SignalConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SignalConfig::default(),
    };

    if let Some(window) = overrides.window {
        config.bollinger_window = window;
    }
    if let Some(k) = overrides.k {
        config.bollinger_k = k;
    }
    if let Some(period) = overrides.rsi_period {
        config.rsi_period = period;
    }
    if let Some(oversold) = overrides.oversold {
        config.rsi_oversold = oversold;
    }
    if let Some(overbought) = overrides.overbought {
        config.rsi_overbought = overbought;
    }
    if overrides.population {
        config.stddev_mode = StdDevMode::Population;
    }

    config.validate()?;
    Ok(config)
}

fn symbol_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_scan(
    inputs: &[PathBuf],
    symbol: Option<String>,
    config: SignalConfig,
    format: OutputFormat,
    tail: usize,
) -> Result<()> {
    if symbol.is_some() && inputs.len() > 1 {
        bail!("--symbol can only be used with a single --input");
    }
    if format == OutputFormat::Csv && inputs.len() > 1 {
        bail!("--format csv supports a single --input");
    }

    let mut batches = HashMap::new();
    for path in inputs {
        let name = symbol.clone().unwrap_or_else(|| symbol_for(path));
        let bars = read_bars_csv(path)?;
        info!(symbol = %name, bars = bars.len(), path = %path.display(), "loaded bars");
        if batches.insert(name.clone(), bars).is_some() {
            bail!("duplicate symbol '{name}' across inputs");
        }
    }

    let mut scanner = MarketScanner::new(config.clone())?;
    let results = scanner.scan_batches(batches)?;

    let (scanned, failed) = split_results(results);
    let scanned_count = scanned.len();
    for (symbol, err) in &failed {
        eprintln!("Error for {symbol}: {err}");
    }

    match format {
        OutputFormat::Table => {
            println!("Config fingerprint: {}", config.fingerprint());
            for (symbol, rows) in &scanned {
                if let Some(feed) = scanner.feed(symbol) {
                    print_summary(&feed.summary(), &config);
                }
                print_rows(rows, tail);
            }
        }
        OutputFormat::Csv => {
            for (_, rows) in &scanned {
                print!("{}", signals_to_csv(rows)?);
            }
        }
        OutputFormat::Json => {
            let reports: Vec<SignalReport> = scanned
                .into_iter()
                .map(|(symbol, rows)| SignalReport::new(symbol, &config, rows))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    if !failed.is_empty() {
        bail!(
            "{} of {} symbols failed to scan",
            failed.len(),
            failed.len() + scanned_count
        );
    }
    Ok(())
}

type ScanResults = BTreeMap<String, Result<Vec<SignalRow>, PipelineError>>;

/// Separate per-symbol results into successful row sets and failures, both
/// ordered by symbol.
fn split_results(
    results: ScanResults,
) -> (Vec<(String, Vec<SignalRow>)>, Vec<(String, PipelineError)>) {
    let mut scanned = Vec::new();
    let mut failed = Vec::new();
    for (symbol, result) in results {
        match result {
            Ok(rows) => scanned.push((symbol, rows)),
            Err(err) => failed.push((symbol, err)),
        }
    }
    (scanned, failed)
}

fn run_synth(
    bars: usize,
    seed: u64,
    start_price: f64,
    volatility: f64,
    output: &Path,
) -> Result<()> {
    if !(start_price.is_finite() && start_price > 0.0) {
        bail!("--start-price must be a positive number");
    }
    let generator = SyntheticBars {
        seed,
        start_price,
        volatility,
        ..SyntheticBars::default()
    };
    let series = generator.generate(bars);

    let file = std::fs::File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    write_bars_csv(file, &series)?;
    info!(bars = series.len(), seed, path = %output.display(), "wrote synthetic bars");
    println!("Wrote {} bars to {}", series.len(), output.display());
    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

fn print_summary(summary: &ScanSummary, config: &SignalConfig) {
    println!();
    println!("=== {} ===", summary.symbol);
    println!("Bars:                  {}", summary.bars);
    println!("Current Price:         {}", fmt_opt(summary.last_close, 2));
    let rsi_label = format!("RSI ({}):", config.rsi_period);
    println!("{rsi_label:<23}{}", fmt_opt(summary.last_rsi, 2));
    println!("Market Condition:      {}", summary.condition);
    println!("Volatility (BB Width): {}", fmt_opt(summary.band_width, 4));
    println!("Last Signal:           {}", summary.last_signal);
    println!(
        "Signals:               {} long / {} short",
        summary.long_signals, summary.short_signals
    );
    if summary.bars <= config.warmup_bars() {
        println!(
            "WARNING: only {} bars, indicators need {} to warm up",
            summary.bars,
            config.warmup_bars() + 1
        );
    }
}

fn print_rows(rows: &[SignalRow], tail: usize) {
    if tail == 0 || rows.is_empty() {
        return;
    }
    println!();
    println!(
        "{:<26} {:>12} {:>12} {:>12} {:>12} {:>7}  SIGNAL",
        "TIMESTAMP", "CLOSE", "UPPER", "MEAN", "LOWER", "RSI"
    );
    let start = rows.len().saturating_sub(tail);
    for row in &rows[start..] {
        println!(
            "{:<26} {:>12.4} {:>12} {:>12} {:>12} {:>7}  {}",
            row.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            row.close,
            fmt_opt(row.upper, 4),
            fmt_opt(row.mean, 4),
            fmt_opt(row.lower, 4),
            fmt_opt(row.rsi, 2),
            row.signal
        );
    }
}
