//! Logging and tracing setup for vxhunter.
//!
//! Everything logs through `tracing`. The subscriber writes to stderr so
//! that a JSON report on stdout stays machine-readable, and `RUST_LOG`
//! overrides the built-in filter.

use std::sync::Once;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset: this crate at `info`, its
/// dependencies at `warn`.
pub const DEFAULT_FILTER: &str = "warn,vxhunter=info";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Filter directive for a `-v` count.
///
/// Per-record and per-candidate detail is logged at `debug` and `trace`,
/// so each step exposes one more layer of the search.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => DEFAULT_FILTER,
        1 => "warn,vxhunter=debug",
        _ => "info,vxhunter=trace",
    }
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber.
///
/// Only the first call in a process has an effect. A subscriber that a
/// host or test harness already installed is left in place.
pub fn init_tracing(format: LogFormat, default_filter: &str) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(env_filter(default_filter));
        let installed = match format {
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .try_init(),
        };
        if installed.is_ok() {
            debug!(?format, filter = default_filter, "tracing initialized");
        }
    });
}

/// Macro for creating analysis spans
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
