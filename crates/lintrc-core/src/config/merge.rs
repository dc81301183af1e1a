//! Configuration layering logic
//!
//! Folds fragments into an [`EffectiveConfig`] accumulator: rule entries
//! overwrite wholesale, plugins union, and the env/globals/parserOptions
//! mappings shallow-overwrite by key. Rule options are replaced rather than
//! deep-merged unless the resolver opts into [`OptionMergePolicy::Deep`].

use serde_json::Value;

use super::fragment::{EffectiveConfig, Fragment, ResolvedRule, Severity};
use super::resolver::{OptionMergePolicy, ResolveWarning};

impl EffectiveConfig {
    /// Apply one fragment layer on top of this accumulator.
    ///
    /// Entries with a malformed severity are dropped and reported through
    /// `warnings`; they never clobber an earlier valid entry.
    pub(crate) fn apply_layer(
        &mut self,
        layer: &Fragment,
        policy: OptionMergePolicy,
        warnings: &mut Vec<ResolveWarning>,
    ) {
        for plugin in &layer.plugins {
            self.plugins.insert(plugin.clone());
        }

        for (rule_id, entry) in &layer.rules {
            let severity = entry.severity_token().and_then(Severity::parse);
            let Some(severity) = severity else {
                warnings.push(ResolveWarning::invalid_severity(
                    rule_id,
                    entry.severity_token(),
                ));
                continue;
            };

            let options = match (policy, self.rules.get(rule_id)) {
                (OptionMergePolicy::Deep, Some(existing)) => {
                    deep_merge_options(&existing.options, entry.options())
                }
                _ => entry.options().to_vec(),
            };

            self.rules
                .insert(rule_id.clone(), ResolvedRule { severity, options });
        }

        for (key, value) in &layer.env {
            self.env.insert(key.clone(), *value);
        }
        for (key, value) in &layer.globals {
            self.globals.insert(key.clone(), value.clone());
        }
        for (key, value) in &layer.parser_options {
            self.parser_options.insert(key.clone(), value.clone());
        }
    }
}

/// Merge option lists positionally: object elements merge key-recursive,
/// everything else is taken from the overlay. Overlay length wins.
fn deep_merge_options(base: &[Value], overlay: &[Value]) -> Vec<Value> {
    overlay
        .iter()
        .enumerate()
        .map(|(i, value)| match base.get(i) {
            Some(base_value) => {
                let mut merged = base_value.clone();
                deep_merge_value(&mut merged, value);
                merged
            }
            None => value.clone(),
        })
        .collect()
}

/// Recursive object merge; non-object values replace.
fn deep_merge_value(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        deep_merge_value(base_value, overlay_value);
                    }
                    _ => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
