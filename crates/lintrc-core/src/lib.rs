//! lintrc core
//!
//! Deterministic resolution of layered lint configuration. Given an
//! ordered sequence of configuration fragments, this crate computes the
//! effective configuration for any file path: which rules apply, at what
//! severity, with which options. Rule enforcement itself belongs to an
//! external lint engine behind the [`LintEngine`] trait.

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod registry;
pub mod result;

// Re-export commonly used types
pub use cache::ResolutionCache;
pub use config::{
    ConfigLoader, EffectiveConfig, FilePatterns, Fragment, LoadedConfig, OptionMergePolicy,
    Override, Resolution, ResolveWarning, ResolvedRule, Resolver, ResolverOptions, RuleEntry,
    Severity,
};
pub use diagnostics::{Diagnostic, LintEngine, Location};
pub use error::{ErrorKind, LintrcError};
pub use registry::{RuleDescriptor, RuleRegistry};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lintrc=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
