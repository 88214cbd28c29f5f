//! Vector-slicer entrypoint: load a shape/field/config directory, run the
//! coordinate-descent optimiser, order the winning fill's paths, and write
//! the results back out.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use vs_optimize::Optimiser;
use vs_order::PathOrderer;

/// Offline path planner for direction-field-driven extrusion printing.
#[derive(Parser, Debug)]
#[command(name = "vector-slicer", version, about = "Direction-field fill path planner")]
struct Args {
    /// Directory containing shape.csv, xField.csv, yField.csv, config.txt.
    directory: PathBuf,

    /// Lowest seed tried by the optimiser's seed sweep.
    #[arg(long, default_value_t = 0)]
    min_seed: u32,

    /// Highest seed tried by the optimiser's seed sweep.
    #[arg(long, default_value_t = 1)]
    max_seed: u32,

    /// Worker threads for the optimiser's rayon pool (defaults to all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Raise the tracing filter to debug level.
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Evenly-spaced perimeter points per bounding-rectangle edge tried by
    /// the path orderer, in addition to the four corners.
    #[arg(long, default_value_t = 5)]
    orderer_trial_steps: u32,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Returns the [`WorkerGuard`] for a file-backed subscriber; the caller must
/// keep it alive for the process lifetime or buffered log lines are lost.
fn configure_logging(verbose: bool, log_file: Option<&PathBuf>) -> Option<WorkerGuard> {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = || tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    if let Some(path) = log_file {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "vector-slicer.log".into());
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        match tracing_subscriber::fmt().with_env_filter(filter()).with_writer(writer).try_init() {
            Ok(()) => return Some(guard),
            Err(_) => return None,
        }
    }

    let _ = tracing_subscriber::fmt().with_env_filter(filter()).try_init();
    None
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.verbose, args.log_file.as_ref());

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to size the rayon thread pool")?;
    }

    let desired = vs_io::load_desired_pattern(&args.directory)
        .with_context(|| format!("loading shape/field data from {}", args.directory.display()))?;
    let initial_config = vs_io::load_config(&args.directory.join("config.txt"))
        .with_context(|| format!("loading config.txt from {}", args.directory.display()))?;

    let desired = Arc::new(desired);
    tracing::info!(
        width = desired.width(),
        height = desired.height(),
        min_seed = args.min_seed,
        max_seed = args.max_seed,
        "starting optimiser"
    );

    let optimiser = Optimiser::new(desired.clone(), args.min_seed, args.max_seed);
    let (best_config, best_cost) = optimiser.run(initial_config);
    tracing::info!(cost = best_cost, ?best_config, "optimiser finished");

    let best_fill = optimiser.materialise(best_config);
    let ordering = PathOrderer::order(
        best_fill.paths(),
        desired.width() as i32,
        desired.height() as i32,
        args.orderer_trial_steps,
    );
    tracing::info!(paths = ordering.paths.len(), idle_travel = ordering.idle_travel, "ordered paths");

    vs_io::write_coverage(&args.directory.join("number_of_times_filled.csv"), &best_fill)
        .context("writing number_of_times_filled.csv")?;
    vs_io::write_paths(&args.directory, &ordering.paths).context("writing best_paths.csv outputs")?;
    vs_io::write_config(&args.directory.join("best_config.txt"), &best_config).context("writing best_config.txt")?;

    Ok(())
}
