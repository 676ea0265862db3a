//! SensorScope - Main Entry Point
//!
//! Desktop explorer for time-series sensor logs stored as CSV.
//!
//! ```text
//! sensorscope [FILE.csv]
//! ```

use std::path::PathBuf;

use sensorscope::{
    config::{log_dir, AppState},
    frontend::SensorScopeApp,
    i18n::set_language,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // File logging is best effort; keep the guard alive until exit
    let appender = log_dir().and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("sensorscope")
            .filename_suffix("log")
            .build(dir)
            .map_err(|e| eprintln!("File logging disabled: {e}"))
            .ok()
    });
    let (file_writer, _guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sensorscope=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_writer.map(|writer| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
        }))
        .init();

    tracing::info!("Starting SensorScope {}", env!("CARGO_PKG_VERSION"));

    // Load application state (recent files, preferences)
    let mut app_state = AppState::load_or_default();
    app_state.cleanup_missing();
    set_language(app_state.ui_preferences.language);

    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);
    if let Some(ref path) = initial_file {
        tracing::info!("Opening {:?} from the command line", path);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("SensorScope"),
        ..Default::default()
    };

    eframe::run_native(
        "SensorScope",
        native_options,
        Box::new(|cc| Ok(Box::new(SensorScopeApp::new(cc, app_state, initial_file)?))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::info!("Shutting down");
    Ok(())
}
