//! TaskDesk - Main Entry Point

use taskdesk::app::application::run_app;
use taskdesk::helpers::get_or_create_data_dir;
use tracing_subscriber::{EnvFilter, fmt, fmt::time::LocalTime, prelude::*};

const LOG_FILE_PREFIX: &str = "taskdesk.log";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Daily rolling file next to the other app data; the guard flushes on exit
    let (file_layer, _guard) = match get_or_create_data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339())
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(LocalTime::rfc_3339()))
        .with(file_layer)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting TaskDesk");

    run_app();
}
