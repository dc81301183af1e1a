//! Configuration fragment types
//!
//! A [`Fragment`] is a named, composable unit of lint configuration. The
//! main resolution entry point is [`crate::config::Resolver`], which folds an
//! ordered fragment sequence into one [`EffectiveConfig`] per file path.

use indexmap::{IndexMap, IndexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Disable the rule
    Off,
    /// Report violations without failing the run
    Warn,
    /// Report violations and fail the run
    Error,
}

impl Severity {
    /// Parse a raw severity token.
    ///
    /// Accepts the canonical string forms plus the numeric aliases 0/1/2
    /// used by legacy configurations.
    pub fn parse(token: &Value) -> Option<Self> {
        match token {
            Value::String(s) => match s.as_str() {
                "off" => Some(Severity::Off),
                "warn" => Some(Severity::Warn),
                "error" => Some(Severity::Error),
                _ => None,
            },
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(Severity::Off),
                Some(1) => Some(Severity::Warn),
                Some(2) => Some(Severity::Error),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One entry in a fragment's `rules` map
///
/// Either a bare severity token (`"no-console": "warn"`) or an array whose
/// head is the severity and whose tail is rule-specific options
/// (`"max-params": ["warn", 4]`). The token is kept raw so a malformed
/// severity surfaces as a recoverable warning at resolve time instead of a
/// deserialization failure for the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleEntry {
    /// `[severity, options...]`
    ///
    /// Listed first so arrays bind here; the bare variant would otherwise
    /// swallow them, since [`Value`] deserializes anything.
    WithOptions(Vec<Value>),
    /// Bare severity token
    Severity(Value),
}

impl RuleEntry {
    /// The raw severity token of this entry, if present
    pub fn severity_token(&self) -> Option<&Value> {
        match self {
            RuleEntry::Severity(token) => Some(token),
            RuleEntry::WithOptions(parts) => parts.first(),
        }
    }

    /// The options tail of this entry (empty for bare entries)
    pub fn options(&self) -> &[Value] {
        match self {
            RuleEntry::Severity(_) => &[],
            RuleEntry::WithOptions(parts) => parts.get(1..).unwrap_or(&[]),
        }
    }
}

impl From<Severity> for RuleEntry {
    fn from(severity: Severity) -> Self {
        // Canonical serialization of Severity is its lowercase string form
        RuleEntry::Severity(Value::String(
            match severity {
                Severity::Off => "off",
                Severity::Warn => "warn",
                Severity::Error => "error",
            }
            .to_string(),
        ))
    }
}

/// One or more glob patterns restricting fragment applicability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FilePatterns {
    /// A single glob pattern
    Single(String),
    /// A list of glob patterns, any of which may match
    Many(Vec<String>),
}

impl FilePatterns {
    /// View the patterns as a slice regardless of representation
    pub fn as_slice(&self) -> &[String] {
        match self {
            FilePatterns::Single(pattern) => std::slice::from_ref(pattern),
            FilePatterns::Many(patterns) => patterns,
        }
    }
}

impl From<&str> for FilePatterns {
    fn from(pattern: &str) -> Self {
        FilePatterns::Single(pattern.to_string())
    }
}

/// A named, composable unit of lint configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Fragment {
    /// Fragment name, used as the target of `extends` references
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered references to base fragments, expanded depth-first with the
    /// fragment's own settings applied last
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    /// Plugin identifiers enabling additional rule namespaces
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    /// Rule identifier to severity/options mapping
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<String, RuleEntry>,

    /// Environment toggles defining ambient identifier sets
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, bool>,

    /// Ambient identifier definitions
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, Value>,

    /// Language-parsing toggles handed through to the lint engine
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parser_options: IndexMap<String, Value>,

    /// Glob pattern(s) restricting applicability; a fragment with `files`
    /// set behaves as an override layered after the base fold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilePatterns>,

    /// Path globs excluded from resolution entirely
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_patterns: Vec<String>,

    /// Nested override blocks applied after the base fold
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<Override>,
}

impl Fragment {
    /// Display name for error chains and logs
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// A fragment scoped to matching file paths, layered after base resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    /// Glob pattern(s) selecting the files this override applies to
    pub files: FilePatterns,

    /// Configuration layered on top of the base resolution
    #[serde(flatten)]
    pub config: Fragment,
}

/// A resolved rule: validated severity plus wholly-replaced options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedRule {
    /// Final severity for the rule
    pub severity: Severity,

    /// Rule-specific options, replaced (not deep-merged) on override unless
    /// the resolver is configured otherwise
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<Value>,
}

impl ResolvedRule {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }
}

/// The final flattened configuration applicable to one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectiveConfig {
    /// Enabled plugins in first-seen order
    #[serde(skip_serializing_if = "IndexSet::is_empty")]
    pub plugins: IndexSet<String>,

    /// Flattened rule mapping
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<String, ResolvedRule>,

    /// Flattened environment toggles
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, bool>,

    /// Flattened ambient identifier definitions
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub globals: IndexMap<String, Value>,

    /// Flattened language-parsing toggles
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parser_options: IndexMap<String, Value>,
}

impl EffectiveConfig {
    /// Convert back into a single fragment.
    ///
    /// Resolving the returned fragment on its own yields this configuration
    /// again, which is what makes flattening idempotent.
    pub fn into_fragment(self) -> Fragment {
        let mut rules = IndexMap::new();
        for (rule_id, resolved) in self.rules {
            let entry = if resolved.options.is_empty() {
                RuleEntry::from(resolved.severity)
            } else {
                let mut parts =
                    vec![serde_json::to_value(resolved.severity).unwrap_or(Value::Null)];
                parts.extend(resolved.options);
                RuleEntry::WithOptions(parts)
            };
            rules.insert(rule_id, entry);
        }

        Fragment {
            plugins: self.plugins.into_iter().collect(),
            rules,
            env: self.env,
            globals: self.globals,
            parser_options: self.parser_options,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Error).unwrap();
        assert_eq!(json, r#""error""#);

        let json = serde_json::to_string(&Severity::Off).unwrap();
        assert_eq!(json, r#""off""#);
    }

    #[test]
    fn test_severity_parse_aliases() {
        assert_eq!(Severity::parse(&json!("warn")), Some(Severity::Warn));
        assert_eq!(Severity::parse(&json!(2)), Some(Severity::Error));
        assert_eq!(Severity::parse(&json!(0)), Some(Severity::Off));
        assert_eq!(Severity::parse(&json!("loud")), None);
        assert_eq!(Severity::parse(&json!(true)), None);
    }

    #[test]
    fn test_rule_entry_forms() {
        let fragment: Fragment = serde_json::from_value(json!({
            "rules": {
                "no-console": "warn",
                "max-params": ["warn", 4],
                "unicorn/filename-case": ["error", {"case": "kebabCase"}]
            }
        }))
        .unwrap();

        let bare = &fragment.rules["no-console"];
        assert_eq!(bare.severity_token(), Some(&json!("warn")));
        assert!(bare.options().is_empty());

        let with_options = &fragment.rules["max-params"];
        assert_eq!(with_options.severity_token(), Some(&json!("warn")));
        assert_eq!(with_options.options(), &[json!(4)]);
    }

    #[test]
    fn test_files_single_or_many() {
        let single: Fragment = serde_json::from_value(json!({"files": "*.test.js"})).unwrap();
        assert_eq!(
            single.files.unwrap().as_slice(),
            &["*.test.js".to_string()]
        );

        let many: Fragment =
            serde_json::from_value(json!({"files": ["*.yaml", "*.yml"]})).unwrap();
        assert_eq!(many.files.unwrap().as_slice().len(), 2);
    }

    #[test]
    fn test_override_flattened_shape() {
        let fragment: Fragment = serde_json::from_value(json!({
            "overrides": [
                {"files": "**/*.md", "rules": {"prettier/prettier": "error"}}
            ]
        }))
        .unwrap();

        assert_eq!(fragment.overrides.len(), 1);
        let ov = &fragment.overrides[0];
        assert_eq!(ov.files.as_slice(), &["**/*.md".to_string()]);
        assert!(ov.config.rules.contains_key("prettier/prettier"));
    }

    #[test]
    fn test_fragment_camel_case_fields() {
        let fragment: Fragment = serde_json::from_value(json!({
            "parserOptions": {"ecmaVersion": "latest"},
            "ignorePatterns": ["dist", "node_modules"]
        }))
        .unwrap();

        assert_eq!(fragment.parser_options["ecmaVersion"], json!("latest"));
        assert_eq!(fragment.ignore_patterns.len(), 2);
    }
}
