//! Banana driver.
//!
//! Library half of the `banana` binary: option parsing, the commands
//! themselves, and diagnostic rendering. Commands write to caller-supplied
//! sinks and report success as a `bool`, so they can be driven from tests.
//!
//! # Tracing
//!
//! - `RUST_LOG=banana_eval=debug`: thread spawn/retire and definitions
//! - `RUST_LOG=banana_eval=trace`: every executed step (very verbose)
//! - `RUST_LOG=banana_parse=trace`: parser progress

pub mod commands;
pub mod options;
pub mod report;

use std::sync::Once;

pub use options::{ColorMode, Options, OptionsError};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once per process, if `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
