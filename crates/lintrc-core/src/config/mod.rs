//! Configuration system for lintrc
//!
//! This module owns the full path from config files on disk to the
//! effective configuration handed to a lint engine:
//!
//! - JSON/JSONC/TOML/YAML configuration file support
//! - Auto-discovery by traversing up directories
//! - Fragment composition via `extends` (named and file-path references)
//! - Per-file overrides keyed by glob pattern
//! - Ignore-pattern exclusion
//!
//! ## Configuration files
//!
//! A config document is a single fragment or a flat array of fragments:
//!
//! ```jsonc
//! [
//!   {
//!     "plugins": ["unicorn"],
//!     "rules": {
//!       "no-console": "warn",
//!       "unicorn/filename-case": ["error", { "case": "kebabCase" }]
//!     },
//!     "ignorePatterns": ["dist", "node_modules"]
//!   },
//!   {
//!     "files": "*.test.js",
//!     "rules": { "no-console": "off" }
//!   }
//! ]
//! ```
//!
//! ## Resolution
//!
//! [`Resolver::resolve`] folds the fragment sequence for one path: ignored
//! paths short-circuit to [`Resolution::Excluded`]; otherwise unscoped
//! fragments apply in order (each expanded through its `extends` chain,
//! parent before child) and matching overrides layer on top, later wins.

mod fragment;
mod loader;
mod merge;
mod resolver;

// Re-export main types
pub use fragment::{
    EffectiveConfig, FilePatterns, Fragment, Override, ResolvedRule, RuleEntry, Severity,
};
pub use loader::{ConfigLoader, LoadedConfig};
pub use resolver::{
    OptionMergePolicy, Resolution, ResolveWarning, Resolver, ResolverOptions,
};
