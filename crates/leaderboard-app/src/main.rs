// Leaderboard entry point.
//
// Startup sequence:
// 1. Resolve base directory (first argument, or cwd)
// 2. Load config (copies defaults on first run)
// 3. Initialize tracing (stderr or configured log file)
// 4. Load the three sources concurrently; any failure aborts the run
// 5. Compute standings
// 6. Write the report to stdout

mod report;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use leaderboard_core::config::{self, LoggingConfig};
use leaderboard_core::loader;
use leaderboard_core::standings::Standings;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Base directory
    let base_dir = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    // 2. Config
    let config = config::load_config(&base_dir).context("failed to load configuration")?;

    // 3. Tracing
    init_tracing(&config.logging, &base_dir)?;
    info!("Leaderboard starting in {}", base_dir.display());

    // 4. Load all sources before any processing
    let dataset = loader::load_dataset(&config.sources)
        .await
        .context("failed to load leaderboard data")?;

    // 5. Compute
    let standings = Standings::compute(&dataset, &config.display);

    // 6. Report
    let mut out = std::io::stdout().lock();
    report::write_report(&mut out, &standings, config.display.format)
        .context("failed to write report")?;
    out.flush()?;

    info!("Leaderboard done");
    Ok(())
}

/// Initialize tracing. `RUST_LOG` takes precedence over the configured filter.
/// stdout carries the report, so logs go to stderr or a file.
fn init_tracing(logging: &LoggingConfig, base_dir: &std::path::Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match &logging.file {
        Some(file) => {
            let path = base_dir.join(file);
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            let log_file = std::fs::File::create(&path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let subscriber = builder
                .with_writer(std::sync::Mutex::new(log_file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
        }
    }

    Ok(())
}
