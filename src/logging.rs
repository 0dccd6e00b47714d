use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(config: &LoggingConfig, debug: bool) -> String {
    if debug {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Install the global subscriber: console output plus an optional daily
/// rotated file under `config.dir`.
///
/// The returned guard flushes the file writer and must live as long as the
/// process logs.
pub fn init_logging(config: &LoggingConfig, debug: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config, debug)));

    let mut guard = None;
    let file_layer = config.dir.as_ref().and_then(|log_dir| {
        // `rolling::daily` panics if it cannot create its first file, so
        // check the directory is writable before handing it over.
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!(
                "Warning: Could not create log directory {} ({}), file logging disabled",
                log_dir.display(),
                e
            );
            return None;
        }
        let probe = log_dir.join(".healcheck_write_test");
        if let Err(e) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&probe)
        {
            eprintln!(
                "Warning: Could not write to log directory {} ({}), file logging disabled",
                log_dir.display(),
                e
            );
            return None;
        }
        let _ = std::fs::remove_file(&probe);

        let file_appender = tracing_appender::rolling::daily(log_dir, "healcheck.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
    });

    let (json_layer, text_layer) = if config.json {
        (
            Some(tracing_subscriber::fmt::layer().json().with_target(true)),
            None,
        )
    } else {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
        )
    };

    let file_logging_enabled = file_layer.is_some();
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        eprintln!("Warning: a global tracing subscriber is already installed");
    } else if let (true, Some(dir)) = (file_logging_enabled, config.dir.as_ref()) {
        eprintln!("Logging to: {}/healcheck.log", dir.display());
    }

    guard
}
