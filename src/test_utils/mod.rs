//! Test utilities for extdep
//!
//! Builders for in-memory repositories and resolution scenarios, plus test
//! logging setup. Available to unit tests and, through the `test-utils`
//! feature, to the integration test crates.
//!
//! # Example
//!
//! ```rust,no_run
//! use extdep_cli::test_utils::GraphFixture;
//!
//! let repo = GraphFixture::new("app")
//!     .depends_on("org.acme:x:1.0")
//!     .extension("org.acme:x:1.0", &["org.acme:y"])
//!     .module("org.acme:y:1.0", &[])
//!     .build()
//!     .unwrap();
//! let application = repo.resolve_default().unwrap();
//! assert_eq!(application.deployment.direct.len(), 1);
//! ```

mod fixtures;

pub use fixtures::{FailingResolver, FakeRepository, GraphFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honored, and without it nothing is logged.
///
/// ```bash
/// RUST_LOG=extdep_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
