//! Telemetry helpers for applications embedding `sigview-cursors`.
//!
//! The engine only emits `tracing` events (`debug` for mode and drag
//! transitions, `trace` for per-key updates). Installing a subscriber stays
//! with the host; these helpers are for demos and tests.

/// Initializes a compact `tracing` subscriber filtered at `info` unless
/// `RUST_LOG` says otherwise.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_default_filter("info")
}

/// Same as [`init_default_tracing`] with a caller-chosen fallback directive,
/// e.g. `"sigview_cursors=trace"` to follow every cursor update.
#[must_use]
pub fn init_tracing_with_default_filter(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}
