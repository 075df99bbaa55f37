//! Tracing setup for hosts embedding `doc-chart-rs`.
//!
//! Workflow transitions and requests log at `debug`, pointer and zoom events at
//! `trace`, and every failure path at `warn`. Hosts install their own
//! subscriber or call one of the helpers below.

/// Filter used when `RUST_LOG` is unset: workflow diagnostics at `debug`,
/// everything else at `info`.
pub const DEFAULT_FILTER: &str = "info,doc_chart_rs=debug";

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return install(filter);
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Like [`init_default_tracing`] with an explicit filter directive such as
/// `"doc_chart_rs::interaction=trace"`. An unparsable directive installs nothing.
#[must_use]
pub fn init_tracing_with_filter(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        return match tracing_subscriber::EnvFilter::try_new(directive) {
            Ok(filter) => install(filter),
            Err(_) => false,
        };
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}

#[cfg(feature = "telemetry")]
fn install(filter: tracing_subscriber::EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::init_tracing_with_filter;

    #[test]
    fn invalid_directive_installs_nothing() {
        assert!(!init_tracing_with_filter("doc_chart_rs=loudest"));
    }
}
