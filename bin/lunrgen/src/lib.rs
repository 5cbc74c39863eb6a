//! lunrgen CLI Library
//!
//! Core functionality for the lunrgen command-line tool, exposed as a library
//! so the commands can be driven from tests and other tools.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use lunrgen::cmd::{self, build::BuildOptions};
//!
//! cmd::build::run(Path::new("config.toml"), &BuildOptions::default()).unwrap();
//! ```

pub mod cmd;

pub use lunrgen_core::{Config, PageDescriptor};
pub use lunrgen_generator::{BuildStats, Builder, Store, StoreBuilder, StoreFormat};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
