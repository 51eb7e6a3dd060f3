use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use outlier_handler::csv_io::{write_csv, write_csv_file, CsvParser};
use outlier_handler::dbscan::DbscanConfig;
use outlier_handler::iqr::IqrConfig;
use outlier_handler::lof::LofConfig;
use outlier_handler::mad::MadConfig;
use outlier_handler::zscore::ZScoreConfig;
use outlier_handler::{detect_outliers, handle_outliers, Detector, RemediationPolicy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Iqr,
    Zscore,
    Mad,
    Dbscan,
    Lof,
}

/// Detect and remediate outliers in one column of a CSV file
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file with a header row
    #[arg(short, long)]
    input: PathBuf,
    /// Column to inspect
    #[arg(short, long)]
    column: String,
    /// Detection method
    #[arg(short, long, value_enum, default_value_t = Method::Iqr)]
    method: Method,
    /// Remediation policy: drop, fill-mean or fill-median
    #[arg(short, long, default_value = "drop")]
    policy: String,
    /// Output CSV file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only print the indices of flagged rows
    #[arg(long)]
    detect_only: bool,
    /// IQR fence multiplier
    #[arg(long, default_value_t = 1.5)]
    multiplier: f64,
    /// Z-score threshold (zscore) or MAD multiple (mad); defaults 3.0 / 3.5
    #[arg(long)]
    threshold: Option<f64>,
    /// DBSCAN neighborhood radius
    #[arg(long, default_value_t = 0.5)]
    eps: f64,
    /// DBSCAN minimum neighborhood size
    #[arg(long, default_value_t = 5)]
    min_samples: usize,
    /// LOF neighbor count
    #[arg(long, default_value_t = 20)]
    n_neighbors: usize,
    /// LOF fraction of rows to flag
    #[arg(long, default_value_t = 0.1)]
    contamination: f64,
}

impl Args {
    fn detector(&self) -> Detector {
        match self.method {
            Method::Iqr => Detector::Iqr(IqrConfig::default().multiplier(self.multiplier)),
            Method::Zscore => {
                let t = self.threshold.unwrap_or(ZScoreConfig::default().threshold);
                Detector::ZScore(ZScoreConfig::default().threshold(t))
            }
            Method::Mad => {
                let t = self.threshold.unwrap_or(MadConfig::default().threshold);
                Detector::Mad(MadConfig::default().threshold(t))
            }
            Method::Dbscan => Detector::Dbscan(DbscanConfig::new(self.eps, self.min_samples)),
            Method::Lof => Detector::Lof(
                LofConfig::default()
                    .n_neighbors(self.n_neighbors)
                    .contamination(self.contamination),
            ),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    // Reject a bad policy before reading any data.
    let policy: RemediationPolicy = args.policy.parse()?;
    let detector = args.detector();

    let df = CsvParser::new()
        .parse_file(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    log::info!(
        "loaded {} rows x {} columns from {}",
        df.row_count(),
        df.column_count(),
        args.input.display()
    );

    if args.detect_only {
        let detection = detect_outliers(&df, &args.column, &detector)?;
        let mut stdout = io::stdout().lock();
        for idx in detection.mask.indices() {
            writeln!(stdout, "{idx}")?;
        }
        return Ok(());
    }

    let cleaned = handle_outliers(&df, &args.column, &detector, policy)
        .with_context(|| format!("handling outliers in '{}' with {detector}", args.column))?;
    log::info!(
        "{policy}: {} rows in, {} rows out",
        df.row_count(),
        cleaned.row_count()
    );

    match &args.output {
        Some(path) => write_csv_file(&cleaned, path)
            .with_context(|| format!("writing {}", path.display()))?,
        None => write_csv(&cleaned, io::stdout().lock())?,
    }
    Ok(())
}
