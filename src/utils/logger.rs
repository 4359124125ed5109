use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `--verbose` nor `[logging].level` says otherwise.
pub fn log_level(verbose: bool, configured: Option<&str>, json: bool) -> String {
    match (verbose, configured) {
        (true, _) => "debug".to_string(),
        (false, Some(level)) => level.to_string(),
        (false, None) if json => "info".to_string(),
        (false, None) => "warn".to_string(),
    }
}

/// `RUST_LOG` wins; otherwise the library and the `actinia` binary log at `level`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: &str) -> String {
    format!("warn,actinia_client={level},actinia={level}")
}

pub fn init_cli_logger(level: &str) {
    // stdout carries the JSON results, so logs go to stderr
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Structured logging for scripted or containerised runs.
pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
