use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use threadsplit::{init_tracing_once, DatasetSplitter, SplitError, SplitSummary};

/// Split a post corpus into time-partitioned train/validation/test sets of reply trees.
#[derive(Debug, Parser)]
#[command(name = "threadsplit", version)]
struct Args {
    /// Input NDJSON files (`.zst` allowed) or directories containing them.
    #[arg(long, num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,

    /// User profile file: a JSON object keyed by user id, or NDJSON with `user_id`.
    #[arg(long)]
    profile: PathBuf,

    /// Optional JSON object mapping real user ids to anonymized ids.
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Random seed for shuffling and sampling.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Validation output path.
    #[arg(long)]
    val_out: PathBuf,

    /// Test output path.
    #[arg(long)]
    test_out: PathBuf,

    /// Train output path.
    #[arg(long)]
    train_out: PathBuf,

    /// Shared validation/test window in days before the newest post: START END.
    #[arg(long, num_args = 2, value_names = ["START", "END"], default_values_t = [0.0, 7.0])]
    val_days: Vec<f64>,

    /// Accepted for compatibility; the test set always uses --val-days.
    #[arg(long, num_args = 2, value_names = ["START", "END"], default_values_t = [0.0, 7.0])]
    test_days: Vec<f64>,

    /// Train window in days before the newest post: START END.
    #[arg(long, num_args = 2, value_names = ["START", "END"], default_values_t = [7.0, 30.0])]
    train_days: Vec<f64>,

    /// Validation sampling rate (0..=1).
    #[arg(long, default_value_t = 0.05, value_parser = parse_rate)]
    val_sample: f64,

    /// Test sampling rate (0..=1).
    #[arg(long, default_value_t = 0.05, value_parser = parse_rate)]
    test_sample: f64,

    /// Train sampling rate (0..=1).
    #[arg(long, default_value_t = 1.0, value_parser = parse_rate)]
    train_sample: f64,

    /// Disable progress bars.
    #[arg(long)]
    no_progress: bool,
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("not a number: {s}"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("rate must be within [0, 1], got {v}"))
    }
}

fn run(args: Args) -> Result<SplitSummary> {
    if args.test_days != args.val_days {
        tracing::warn!(
            "--test-days {:?} ignored; test candidates come from the --val-days window {:?}",
            args.test_days,
            args.val_days
        );
    }

    let mut splitter = DatasetSplitter::new()
        .inputs(&args.inputs)
        .profile(&args.profile)
        .outputs(&args.train_out, &args.val_out, &args.test_out)
        .seed(args.seed)
        .eval_days(args.val_days[0], args.val_days[1])
        .train_days(args.train_days[0], args.train_days[1])
        .rates(args.train_sample, args.val_sample, args.test_sample)
        .progress(!args.no_progress);
    if let Some(m) = &args.mapping {
        splitter = splitter.mapping(m);
    }
    splitter.run()
}

fn main() -> ExitCode {
    init_tracing_once();
    let args = Args::parse();

    match run(args) {
        Ok(summary) => {
            tracing::info!(
                "newest post {} | scanned {} lines | eval buffer {} (val {} / test {}) | train candidates {}",
                summary.latest,
                summary.scanned_lines,
                summary.eval_buffered,
                summary.val_candidates,
                summary.test_candidates,
                summary.train_candidates
            );
            for report in [&summary.val, &summary.test, &summary.train] {
                tracing::info!("  {:<5} {} records -> {}", report.kind.label(), report.records, report.path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            let code = e.downcast_ref::<SplitError>().map(SplitError::exit_code).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
