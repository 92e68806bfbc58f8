//! Structured logging initialization for scanctl.
//!
//! Logs always go to stderr so that stdout stays clean for command output.

use std::io::{self, IsTerminal};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default filter directive for the given verbosity flags.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "scanctl=error";
    }
    match verbose {
        0 => "scanctl=info",
        1 => "scanctl=debug",
        _ => "scanctl=trace",
    }
}

/// Initialize the tracing subscriber based on CLI flags and environment.
///
/// * `json` - emit JSON lines (robot mode)
/// * `verbose` - 0 = info, 1 = debug, 2+ = trace
/// * `quiet` - only errors
///
/// `RUST_LOG` overrides the default filter (e.g. `scanctl::sync=trace`).
pub fn init_logging(json: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    } else if io::stderr().is_terminal() {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    } else {
        // Piped or redirected
        let fmt_layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so only
    // the directive selection is checked here.

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0, false), "scanctl=info");
        assert_eq!(default_directive(1, false), "scanctl=debug");
        assert_eq!(default_directive(2, false), "scanctl=trace");
        assert_eq!(default_directive(9, false), "scanctl=trace");
        assert_eq!(default_directive(3, true), "scanctl=error");
    }

    #[test]
    fn test_filter_directives_parse() {
        for verbose in 0..4 {
            assert!(EnvFilter::try_new(default_directive(verbose, false)).is_ok());
        }
        assert!(EnvFilter::try_new("scanctl::sync=trace,v4l=warn").is_ok());
    }
}
