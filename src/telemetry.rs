//! Tracing subscriber setup for processes embedding the pruner.
//!
//! The library only emits `tracing` events; installing a subscriber is up
//! to the host. These helpers install the usual one:
//!
//! - `RUST_LOG` filter, default `skeleton_significance=info`
//! - `LOG_FORMAT=json` for JSON lines, anything else for human-readable output

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "skeleton_significance=info";

/// Install the global subscriber, failing if one is already set.
pub fn try_init_tracing() -> Result<(), TryInitError> {
    let json = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
            .try_init()
    }
}

/// Install the global subscriber; a subscriber that is already set wins.
pub fn init_tracing() {
    if let Err(err) = try_init_tracing() {
        tracing::debug!(error = %err, "Tracing subscriber already installed");
    }
}
