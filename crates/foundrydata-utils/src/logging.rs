//! Structured logging bootstrap.
//!
//! `foundrydata` never prints ad hoc; every phase and diagnostic goes
//! through `tracing`. The CLI prefixes stderr with `[foundrydata]` by
//! configuring the `fmt` layer's target display; `NODE_ENV`-equivalent
//! flags never reach generation logic, only this presenter.

use std::io::IsTerminal;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Whether colored/verbose terminal output should be used.
#[must_use]
pub fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Initialize the global tracing subscriber.
///
/// * `verbose` — include target/span-close events and debug-level spans.
/// * Honors `RUST_LOG` / `FOUNDRYDATA_LOG` if set, falling back to a
///   sensible default for each verbosity level.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("FOUNDRYDATA_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| {
            if verbose {
                EnvFilter::new("foundrydata=debug,warn")
            } else {
                EnvFilter::new("foundrydata=info,warn")
            }
        });

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(if verbose {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .with_ansi(use_color())
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_color_disabled_when_no_color_set() {
        // SAFETY: test-local env mutation; no other test in this crate reads NO_COLOR.
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }
        assert!(!use_color());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }
}
