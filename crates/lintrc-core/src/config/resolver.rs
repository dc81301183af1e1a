//! Per-file configuration resolution
//!
//! Resolution folds an ordered fragment sequence into one
//! [`EffectiveConfig`] for a given file path:
//!
//! 1. Paths matching any fragment's `ignorePatterns` short-circuit to
//!    [`Resolution::Excluded`].
//! 2. `extends` chains expand depth-first, parent before child, so a
//!    fragment's own rules always win over anything it extends. Cycles are
//!    fatal.
//! 3. Base fragments (those without `files`) fold left-to-right.
//! 4. Matching overrides apply in listed order on top of the base fold.
//!
//! Resolution is a pure function over the immutable fragment set; a
//! [`Resolver`] can be shared freely across threads.

use glob::Pattern;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::fragment::{EffectiveConfig, FilePatterns, Fragment};
use crate::error::LintrcError;
use crate::registry::RuleRegistry;
use crate::result::Result;

/// How rule options combine when a later layer overrides a rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionMergePolicy {
    /// The overriding entry's options wholly replace the earlier ones
    #[default]
    Replace,
    /// Option objects merge key-recursively; scalars replace
    Deep,
}

/// Resolution behavior toggles
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverOptions {
    /// Treat unknown-rule findings as fatal instead of dropping the entry
    pub strict: bool,
    /// Rule option layering policy
    pub option_merge: OptionMergePolicy,
}

/// A recoverable finding collected during resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveWarning {
    /// The rule entry the warning concerns
    pub rule_id: String,
    /// Human-readable description
    pub message: String,
}

impl ResolveWarning {
    pub(crate) fn invalid_severity(rule_id: &str, token: Option<&Value>) -> Self {
        let rendered = token.map_or_else(|| "<missing>".to_string(), Value::to_string);
        Self {
            rule_id: rule_id.to_string(),
            message: format!("invalid severity {rendered}, entry dropped"),
        }
    }

    pub(crate) fn unknown_rule(rule_id: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of resolving one file path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum Resolution {
    /// The path is linted with the given flattened configuration
    Effective {
        config: EffectiveConfig,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<ResolveWarning>,
    },
    /// The path matched an ignore pattern and is not linted
    Excluded,
}

impl Resolution {
    /// The effective configuration, if the path was not excluded
    pub fn config(&self) -> Option<&EffectiveConfig> {
        match self {
            Resolution::Effective { config, .. } => Some(config),
            Resolution::Excluded => None,
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, Resolution::Excluded)
    }
}

/// A compiled `files` glob list
#[derive(Debug)]
struct FileMatcher {
    patterns: Vec<(Pattern, bool)>, // (compiled, slashless)
}

impl FileMatcher {
    fn compile(patterns: &FilePatterns) -> Result<Self> {
        let mut compiled = Vec::new();
        for raw in patterns.as_slice() {
            let pattern = Pattern::new(raw)
                .map_err(|e| LintrcError::glob_syntax(raw, e.to_string()))?;
            compiled.push((pattern, !raw.contains('/')));
        }
        Ok(Self { patterns: compiled })
    }

    /// Slashless patterns are additionally tried against the file name
    /// alone, so `*.test.js` matches `src/foo.test.js`.
    fn matches(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        self.patterns.iter().any(|(pattern, slashless)| {
            pattern.matches(path) || (*slashless && pattern.matches(file_name))
        })
    }
}

/// The compiled union of all fragments' ignore patterns
///
/// A path is excluded iff it matches any positive pattern and no
/// `!`-negated pattern; evaluation is order-independent.
#[derive(Debug, Default)]
struct IgnoreSet {
    positive: Vec<Pattern>,
    negated: Vec<Pattern>,
}

impl IgnoreSet {
    fn add(&mut self, raw: &str) -> Result<()> {
        let (negated, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let target = if negated {
            &mut self.negated
        } else {
            &mut self.positive
        };
        for expanded in expand_ignore_pattern(body) {
            let pattern = Pattern::new(&expanded)
                .map_err(|e| LintrcError::glob_syntax(raw, e.to_string()))?;
            target.push(pattern);
        }
        Ok(())
    }

    fn is_ignored(&self, path: &str) -> bool {
        self.positive.iter().any(|p| p.matches(path))
            && !self.negated.iter().any(|p| p.matches(path))
    }
}

/// Ignore patterns carry gitignore-like semantics: a bare name matches a
/// file or directory of that name at any depth, contents included.
fn expand_ignore_pattern(body: &str) -> Vec<String> {
    let mut variants = vec![body.to_string()];
    if !body.ends_with("/**") {
        variants.push(format!("{body}/**"));
    }
    if !body.starts_with("**/") && !body.starts_with('/') {
        variants.push(format!("**/{body}"));
        if !body.ends_with("/**") {
            variants.push(format!("**/{body}/**"));
        }
    }
    variants
}

/// Where an override layer comes from, in listed order
#[derive(Debug)]
enum OverrideSource {
    /// A top-level fragment carrying a `files` restriction
    ScopedFragment(usize),
    /// A nested `overrides` block: (fragment index, override index)
    Nested(usize, usize),
}

/// Resolves file paths against an immutable fragment sequence
#[derive(Debug)]
pub struct Resolver {
    /// Base-only fragments first, then the listed sequence
    fragments: Vec<Fragment>,
    /// Fragments below this index are reachable only through `extends`
    base_count: usize,
    by_name: IndexMap<String, usize>,
    ignore: IgnoreSet,
    overrides: Vec<(OverrideSource, FileMatcher)>,
    options: ResolverOptions,
    registry: Option<RuleRegistry>,
}

impl Resolver {
    /// Build a resolver with default options.
    ///
    /// All glob patterns are compiled up front; a malformed pattern
    /// anywhere in the set fails construction.
    pub fn new(fragments: Vec<Fragment>) -> Result<Self> {
        Self::with_options(fragments, ResolverOptions::default())
    }

    pub fn with_options(fragments: Vec<Fragment>, options: ResolverOptions) -> Result<Self> {
        Self::with_bases(Vec::new(), fragments, options)
    }

    /// Build a resolver with additional base-only fragments.
    ///
    /// Bases are registered as `extends` targets but do not participate in
    /// the base fold, carry no ignore patterns of their own into the union,
    /// and never act as overrides. The loader uses this for fragments
    /// pulled in from extended config files.
    pub fn with_bases(
        bases: Vec<Fragment>,
        listed: Vec<Fragment>,
        options: ResolverOptions,
    ) -> Result<Self> {
        let base_count = bases.len();
        let mut fragments = bases;
        fragments.extend(listed);

        let mut by_name = IndexMap::new();
        let mut ignore = IgnoreSet::default();
        let mut overrides = Vec::new();

        for (idx, fragment) in fragments.iter().enumerate() {
            if let Some(name) = &fragment.name {
                if by_name.insert(name.clone(), idx).is_some() {
                    return Err(LintrcError::config_error(format!(
                        "duplicate fragment name '{name}'"
                    )));
                }
            }
            if idx < base_count {
                continue;
            }
            for raw in &fragment.ignore_patterns {
                ignore.add(raw)?;
            }
            if let Some(files) = &fragment.files {
                overrides.push((
                    OverrideSource::ScopedFragment(idx),
                    FileMatcher::compile(files)?,
                ));
            }
            for (ov_idx, ov) in fragment.overrides.iter().enumerate() {
                overrides.push((
                    OverrideSource::Nested(idx, ov_idx),
                    FileMatcher::compile(&ov.files)?,
                ));
            }
        }

        Ok(Self {
            fragments,
            base_count,
            by_name,
            ignore,
            overrides,
            options,
            registry: None,
        })
    }

    /// Attach a rule registry for unknown-rule validation
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The fragments this resolver was built from
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Stable identity of the fragment set, for cache keying.
    ///
    /// Two resolvers built from equal fragment sequences share a
    /// fingerprint; any change to the set produces a new one.
    pub fn fingerprint(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        // Fragments hold serde_json::Value and cannot derive Hash; their
        // canonical serialization is stable because every map preserves
        // insertion order.
        let serialized = serde_json::to_string(&self.fragments).unwrap_or_default();
        serialized.hash(&mut hasher);
        hasher.finish()
    }

    /// Resolve one file path into its effective configuration.
    ///
    /// `path` is taken relative to the fragment set's root; backslashes are
    /// normalized and a leading `./` is stripped before matching.
    pub fn resolve(&self, path: &str) -> Result<Resolution> {
        let path = normalize_path(path);

        if self.ignore.is_ignored(&path) {
            debug!("path '{}' matches an ignore pattern, excluded", path);
            return Ok(Resolution::Excluded);
        }

        let mut effective = EffectiveConfig::default();
        let mut warnings = Vec::new();

        // Base fold: unscoped listed fragments in order
        for fragment in self.fragments[self.base_count..]
            .iter()
            .filter(|f| f.files.is_none())
        {
            self.apply_expanded(fragment, &mut effective, &mut warnings)?;
        }

        // Overrides in listed order, later wins
        for (source, matcher) in &self.overrides {
            if !matcher.matches(&path) {
                continue;
            }
            match source {
                OverrideSource::ScopedFragment(idx) => {
                    self.apply_expanded(&self.fragments[*idx], &mut effective, &mut warnings)?;
                }
                OverrideSource::Nested(idx, ov_idx) => {
                    let layer = &self.fragments[*idx].overrides[*ov_idx].config;
                    effective.apply_layer(layer, self.options.option_merge, &mut warnings);
                }
            }
        }

        self.check_unknown_rules(&mut effective, &mut warnings)?;

        Ok(Resolution::Effective {
            config: effective,
            warnings,
        })
    }

    /// Expand a fragment's `extends` chain depth-first and apply every
    /// layer, parent before child.
    fn apply_expanded(
        &self,
        fragment: &Fragment,
        effective: &mut EffectiveConfig,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Result<()> {
        let mut stack = Vec::new();
        self.apply_recursive(fragment, effective, warnings, &mut stack)
    }

    fn apply_recursive(
        &self,
        fragment: &Fragment,
        effective: &mut EffectiveConfig,
        warnings: &mut Vec<ResolveWarning>,
        stack: &mut Vec<String>,
    ) -> Result<()> {
        let name = fragment.display_name().to_string();
        if stack.contains(&name) {
            let mut chain = stack.clone();
            chain.push(name);
            return Err(LintrcError::config_cycle(chain));
        }
        stack.push(name);

        for base_name in &fragment.extends {
            let base_idx = self.by_name.get(base_name).copied().ok_or_else(|| {
                LintrcError::config_error(format!(
                    "fragment '{}' extends unknown fragment '{}'",
                    fragment.display_name(),
                    base_name
                ))
            })?;
            self.apply_recursive(&self.fragments[base_idx], effective, warnings, stack)?;
        }

        effective.apply_layer(fragment, self.options.option_merge, warnings);
        stack.pop();
        Ok(())
    }

    /// Drop (or, in strict mode, reject) rule entries whose plugin is not
    /// in the merged plugin set or that the registry does not know.
    fn check_unknown_rules(
        &self,
        effective: &mut EffectiveConfig,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Result<()> {
        let mut dropped = Vec::new();

        for rule_id in effective.rules.keys() {
            let finding = if let Some((plugin, _)) = rule_id.split_once('/') {
                if !effective.plugins.contains(plugin) {
                    Some(format!("plugin '{plugin}' is not enabled"))
                } else {
                    self.registry_miss(rule_id)
                }
            } else {
                self.registry_miss(rule_id)
            };

            if let Some(message) = finding {
                if self.options.strict {
                    return Err(LintrcError::unknown_rule(rule_id, message));
                }
                warnings.push(ResolveWarning::unknown_rule(rule_id, message));
                dropped.push(rule_id.clone());
            }
        }

        for rule_id in dropped {
            effective.rules.shift_remove(&rule_id);
        }
        Ok(())
    }

    fn registry_miss(&self, rule_id: &str) -> Option<String> {
        let registry = self.registry.as_ref()?;
        if registry.contains(rule_id) {
            None
        } else {
            Some(format!("rule '{rule_id}' is not registered"))
        }
    }
}

fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_string()
}
