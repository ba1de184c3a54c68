use std::path::PathBuf;

use clap::Parser;
use refcom::diagnostics;
use refcom_settings::ConfigManager;

mod log;
mod probe;

#[derive(Debug, Parser)]
#[command(name = "refcom_probe", about = "Create, share and release resources through refcom handles")]
struct Args {
    /// Settings file to use instead of the per-user one.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.settings {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let settings = config.get();

    log::init_logger(&settings.log_level, args.quiet);
    diagnostics::set_tracking(settings.diagnostics.track_references);
    tracing::info!(path = %config.path().display(), "settings loaded");

    let created = probe::run(&settings)?;
    tracing::info!(created, "probe finished");

    if diagnostics::is_tracking() {
        for stats in diagnostics::snapshot() {
            println!(
                "{:<72} acquired {:>5}  released {:>5}  live {:>3}",
                stats.kind, stats.acquired, stats.released, stats.live
            );
        }
        if settings.diagnostics.report_leaks_on_exit && diagnostics::report_leaks().is_empty() {
            tracing::info!("no outstanding references");
        }
    }
    Ok(())
}
