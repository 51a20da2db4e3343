use std::fs::File;
use std::path::PathBuf;

use color_eyre::eyre::eyre;
use directories::ProjectDirs;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, filter::LevelFilter};

const LOG_ENV: &str = "SUBSNAP_LOG";
const LOG_FILE: &str = "subsnap.log";

/// Logs go to a file; the terminal belongs to ratatui.
pub fn initialize_logging() -> color_eyre::Result<()> {
    let directory = log_directory()?;
    std::fs::create_dir_all(&directory)?;
    let log_file = File::create(directory.join(LOG_FILE))?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

fn log_directory() -> color_eyre::Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "subsnap", "subsnap")
        .ok_or_else(|| eyre!("could not resolve a data directory for logs"))?;
    Ok(dirs.data_local_dir().join("logs"))
}
