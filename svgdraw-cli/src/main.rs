//! # svgdraw
//!
//! Converts SVG documents into drawing-instruction JSON files.

use clap::Parser;
use svgdraw_cli::{run_batch, BatchConfig, CliArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,svgdraw_core=debug,svgdraw_renderer=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,svgdraw_core=debug,svgdraw_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = BatchConfig::from(args);
    tracing::debug!("Batch config: {:?}", config);

    let report = run_batch(config).await?;
    if !report.is_success() {
        anyhow::bail!(
            "{} of {} documents could not be loaded",
            report.failed,
            report.failed + report.converted
        );
    }
    Ok(())
}
