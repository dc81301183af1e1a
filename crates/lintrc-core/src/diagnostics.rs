//! Diagnostic types and the lint-engine collaborator contract
//!
//! The resolver hands an [`EffectiveConfig`] to an external lint engine
//! together with file contents; the engine reports back [`Diagnostic`]
//! values. The engine itself lives outside this crate.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{EffectiveConfig, Severity};
use crate::result::Result;

/// A single finding reported by the lint engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that produced this finding
    pub rule_id: String,
    /// Severity the effective configuration assigned to the rule
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Location in the source file
    pub location: Location,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            line: 1,
            column: 1,
        }
    }
}

/// Contract with the external lint engine.
///
/// The engine receives the already-resolved configuration; it never sees
/// fragments, extends chains, or overrides.
pub trait LintEngine {
    fn lint(
        &self,
        config: &EffectiveConfig,
        contents: &str,
        path: &Path,
    ) -> Result<Vec<Diagnostic>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal engine used to exercise the seam: reports one finding per
    /// enabled rule.
    struct EchoEngine;

    impl LintEngine for EchoEngine {
        fn lint(
            &self,
            config: &EffectiveConfig,
            _contents: &str,
            path: &Path,
        ) -> Result<Vec<Diagnostic>> {
            Ok(config
                .rules
                .iter()
                .filter(|(_, rule)| rule.severity != Severity::Off)
                .map(|(rule_id, rule)| {
                    Diagnostic::new(
                        rule_id.clone(),
                        rule.severity,
                        "reported",
                        Location {
                            file: path.to_path_buf(),
                            ..Default::default()
                        },
                    )
                })
                .collect())
        }
    }

    #[test]
    fn test_engine_receives_flattened_config() {
        use crate::config::{Fragment, Resolver};
        use serde_json::json;

        let fragment: Fragment = serde_json::from_value(json!({
            "rules": {"no-console": "warn", "no-debugger": "off"}
        }))
        .unwrap();
        let resolver = Resolver::new(vec![fragment]).unwrap();
        let resolution = resolver.resolve("app.js").unwrap();

        let diagnostics = EchoEngine
            .lint(
                resolution.config().unwrap(),
                "console.log(1)",
                Path::new("app.js"),
            )
            .unwrap();

        // Off rules are handed over but produce no findings
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "no-console");
        assert_eq!(diagnostics[0].severity, Severity::Warn);
    }
}
