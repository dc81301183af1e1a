//! Rule registry
//!
//! Maps rule identifiers to capability descriptors so fragments can be
//! validated when they are loaded instead of failing inside the lint
//! engine. Plugin-scoped rules use the `plugin/rule` identifier form; the
//! registry never loads plugin code, it only records what each plugin
//! declares.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{Fragment, ResolveWarning, Severity};

/// What a rule accepts, declared up front
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleDescriptor {
    /// Short human-readable description
    pub description: String,

    /// Severities the rule accepts; empty means all of off/warn/error
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_severities: Vec<Severity>,

    /// JSON Schema for the rule's options, when the rule takes any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_schema: Option<Value>,
}

impl RuleDescriptor {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    fn accepts(&self, severity: Severity) -> bool {
        self.allowed_severities.is_empty() || self.allowed_severities.contains(&severity)
    }
}

/// Registry of known rule identifiers and the plugins that declared them
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<String, RuleDescriptor>,
    plugins: IndexSet<String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a core (unscoped) rule
    pub fn register(&mut self, rule_id: impl Into<String>, descriptor: RuleDescriptor) {
        self.rules.insert(rule_id.into(), descriptor);
    }

    /// Register a plugin and its declared rules under the `plugin/rule`
    /// namespace
    pub fn register_plugin(
        &mut self,
        plugin: impl Into<String>,
        rules: impl IntoIterator<Item = (String, RuleDescriptor)>,
    ) {
        let plugin = plugin.into();
        for (rule, descriptor) in rules {
            self.rules.insert(format!("{plugin}/{rule}"), descriptor);
        }
        self.plugins.insert(plugin);
    }

    pub fn contains(&self, rule_id: &str) -> bool {
        self.rules.contains_key(rule_id)
    }

    pub fn get(&self, rule_id: &str) -> Option<&RuleDescriptor> {
        self.rules.get(rule_id)
    }

    /// Plugins that have declared rules with this registry
    pub fn known_plugins(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(String::as_str)
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate a fragment's rule entries against the registry.
    ///
    /// Returns one warning per unknown rule, per severity a rule does not
    /// accept, and per options payload handed to a rule that declares no
    /// options schema. Load-time callers decide whether warnings are fatal.
    pub fn validate_fragment(&self, fragment: &Fragment) -> Vec<ResolveWarning> {
        let mut warnings = Vec::new();

        for (rule_id, entry) in &fragment.rules {
            let Some(descriptor) = self.rules.get(rule_id) else {
                warnings.push(ResolveWarning::unknown_rule(
                    rule_id,
                    format!("rule '{rule_id}' is not registered"),
                ));
                continue;
            };

            if let Some(severity) = entry.severity_token().and_then(Severity::parse)
                && !descriptor.accepts(severity)
            {
                warnings.push(ResolveWarning::unknown_rule(
                    rule_id,
                    format!("rule '{rule_id}' does not accept severity {severity:?}"),
                ));
            }

            if !entry.options().is_empty() && descriptor.options_schema.is_none() {
                warnings.push(ResolveWarning::unknown_rule(
                    rule_id,
                    format!("rule '{rule_id}' takes no options"),
                ));
            }
        }

        warnings
    }
}
