//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level from `RUST_LOG` when set, otherwise from config
//! - Logs go to stderr; stdout carries the rendered view

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a configured level, scoped to this crate.
pub fn default_directive(level: &str) -> String {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        l @ ("trace" | "debug" | "info" | "warn" | "error" | "off") => l.to_string(),
        _ => "warn".to_string(),
    };
    format!("readwrite_client={level},readwrite={level}")
}

/// Install the global subscriber. Call once, before any other work.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
