//! Tracing subscriber setup for hosts that do not install their own

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a verbosity level
pub fn filter_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install a formatted subscriber filtered by verbosity
///
/// Returns false when a global subscriber was already installed; the existing
/// one is left in place.
pub fn init_tracing(verbose: u8, quiet: bool) -> bool {
    let filter = EnvFilter::new(filter_directive(verbose, quiet));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(0, false), "info");
        assert_eq!(filter_directive(1, false), "debug");
        assert_eq!(filter_directive(4, false), "trace");
        assert_eq!(filter_directive(2, true), "error");
    }

    #[test]
    fn test_second_init_is_noop() {
        init_tracing(0, true);
        assert!(!init_tracing(1, false));
    }
}
