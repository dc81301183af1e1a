//! Configuration file discovery and loading
//!
//! Loading happens entirely up front: file-path entries in `extends` are
//! fetched eagerly and registered as named base fragments, so resolution
//! itself performs no I/O.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use super::fragment::Fragment;
use super::resolver::{Resolver, ResolverOptions};
use crate::error::LintrcError;
use crate::result::Result;

/// Config file names probed during auto-discovery, in priority order
const CONFIG_FILE_NAMES: &[&str] = &[
    ".lintrc.json",
    ".lintrc.jsonc",
    ".lintrc.toml",
    "lintrc.yaml",
    "lintrc.yml",
];

/// A loaded fragment set, ready to build a [`Resolver`]
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Fragments pulled in through file-path `extends`, reachable only by
    /// name
    pub bases: Vec<Fragment>,
    /// The listed fragment sequence from the entry config file
    pub fragments: Vec<Fragment>,
}

impl LoadedConfig {
    pub fn resolver(self, options: ResolverOptions) -> Result<Resolver> {
        Resolver::with_bases(self.bases, self.fragments, options)
    }
}

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`.
    ///
    /// Probes `.lintrc.json`, `.lintrc.jsonc`, `.lintrc.toml`,
    /// `lintrc.yaml` and `lintrc.yml` in each directory until one is found
    /// or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| LintrcError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load config from a path or auto-discover starting at `start_dir`
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<LoadedConfig> {
        let config_path = if let Some(path) = custom_path {
            if !path.exists() {
                return Err(LintrcError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        } else {
            let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
            Self::auto_discover(search_dir)?.ok_or_else(|| {
                LintrcError::config_error(
                    "No config file found (.lintrc.json, .lintrc.jsonc, .lintrc.toml, lintrc.yaml, or lintrc.yml)"
                        .to_string(),
                )
            })?
        };

        Self::load_from_file(&config_path)
    }

    /// Load a config file and every file it extends
    pub fn load_from_file(path: &Path) -> Result<LoadedConfig> {
        let mut loader = FileGraphLoader::default();
        let fragments = loader.load_listed(path)?;
        Ok(LoadedConfig {
            bases: loader.bases,
            fragments,
        })
    }
}

/// Tracks the file-extends graph while loading
#[derive(Default)]
struct FileGraphLoader {
    bases: Vec<Fragment>,
    /// Canonical path -> names the file's fragments were registered under
    visited: IndexMap<PathBuf, Vec<String>>,
    /// Files currently being expanded, for cycle detection
    visiting: Vec<PathBuf>,
}

impl FileGraphLoader {
    /// Load the entry file's fragments, splicing extended files in as bases
    fn load_listed(&mut self, path: &Path) -> Result<Vec<Fragment>> {
        let canonical = canonicalize(path)?;
        self.visiting.push(canonical);
        let mut fragments = parse_document(path)?;
        for fragment in &mut fragments {
            self.rewrite_extends(fragment, path)?;
        }
        self.visiting.pop();
        Ok(fragments)
    }

    /// Replace file-path `extends` entries with the names of the loaded
    /// fragments
    fn rewrite_extends(&mut self, fragment: &mut Fragment, config_path: &Path) -> Result<()> {
        let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let mut rewritten = Vec::with_capacity(fragment.extends.len());

        for reference in &fragment.extends {
            if is_path_reference(reference) {
                let target = if Path::new(reference).is_absolute() {
                    PathBuf::from(reference)
                } else {
                    base_dir.join(reference)
                };
                rewritten.extend(self.register_extended(&target)?);
            } else {
                rewritten.push(reference.clone());
            }
        }

        fragment.extends = rewritten;
        Ok(())
    }

    /// Load an extended file into the base set, returning the names its
    /// fragments answer to
    fn register_extended(&mut self, path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Err(LintrcError::config_error(format!(
                "Extended config file not found: {}",
                path.display()
            )));
        }
        let canonical = canonicalize(path)?;

        if let Some(names) = self.visited.get(&canonical) {
            return Ok(names.clone());
        }
        if self.visiting.contains(&canonical) {
            let mut chain: Vec<String> = self
                .visiting
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            chain.push(canonical.display().to_string());
            return Err(LintrcError::config_cycle(chain));
        }

        self.visiting.push(canonical.clone());
        let mut fragments = parse_document(path)?;
        let mut names = Vec::with_capacity(fragments.len());

        for (idx, fragment) in fragments.iter_mut().enumerate() {
            self.rewrite_extends(fragment, path)?;
            let name = match &fragment.name {
                Some(name) => name.clone(),
                None => {
                    let synthesized = format!("{}#{idx}", canonical.display());
                    fragment.name = Some(synthesized.clone());
                    synthesized
                }
            };
            names.push(name);
        }

        self.bases.append(&mut fragments);
        self.visiting.pop();
        self.visited.insert(canonical, names.clone());
        Ok(names)
    }
}

/// An `extends` entry naming a file rather than a fragment
fn is_path_reference(reference: &str) -> bool {
    if reference.starts_with("./")
        || reference.starts_with("../")
        || reference.starts_with('/')
        || reference.starts_with('\\')
    {
        return true;
    }
    Path::new(reference)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(ext, "json" | "jsonc" | "json5" | "toml" | "yaml" | "yml")
        })
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| LintrcError::io_error(path, e))
}

/// A config document is either one fragment or a flat list of fragments
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DocumentShape {
    Many(Vec<Fragment>),
    One(Box<Fragment>),
}

impl DocumentShape {
    fn into_fragments(self) -> Vec<Fragment> {
        match self {
            DocumentShape::Many(fragments) => fragments,
            DocumentShape::One(fragment) => vec![*fragment],
        }
    }
}

/// Parse a config file based on its extension.
///
/// Supports JSON, JSONC/JSON5 (comments and trailing commas), TOML, and
/// YAML. Files without a recognized extension are sniffed by content.
fn parse_document(path: &Path) -> Result<Vec<Fragment>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| LintrcError::io_error(path, e))?;
    let extension = path.extension().and_then(|ext| ext.to_str());

    let parse_error = |format: &str, message: String| {
        LintrcError::config_error(format!(
            "Failed to parse {format} config '{}': {message}",
            path.display()
        ))
    };

    let shape: DocumentShape = match extension {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| parse_error("JSON", e.to_string()))?,
        Some("jsonc") | Some("json5") => {
            json5::from_str(&content).map_err(|e| parse_error("JSONC", e.to_string()))?
        }
        Some("toml") => DocumentShape::One(Box::new(
            toml::from_str(&content).map_err(|e| parse_error("TOML", e.to_string()))?,
        )),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| parse_error("YAML", e.to_string()))?,
        _ => {
            let trimmed = content.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                json5::from_str(&content).map_err(|e| parse_error("JSONC", e.to_string()))?
            } else {
                DocumentShape::One(Box::new(
                    toml::from_str(&content).map_err(|e| parse_error("TOML", e.to_string()))?,
                ))
            }
        }
    };

    Ok(shape.into_fragments())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fragment::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_single_fragment() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".lintrc.json",
            r#"{"rules": {"no-console": "warn"}}"#,
        );

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.fragments.len(), 1);
        assert!(loaded.fragments[0].rules.contains_key("no-console"));
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".lintrc.jsonc",
            r#"{
                // disable console output in production code
                "rules": {"no-console": "error",},
            }"#,
        );

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.fragments.len(), 1);
    }

    #[test]
    fn test_load_flat_array_document() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".lintrc.json",
            r#"[
                {"rules": {"no-console": "warn"}},
                {"files": "*.test.js", "rules": {"no-console": "off"}}
            ]"#,
        );

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.fragments.len(), 2);
        assert!(loaded.fragments[1].files.is_some());
    }

    #[test]
    fn test_load_toml_fragment() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".lintrc.toml",
            r#"
plugins = ["unicorn"]

[rules]
no-console = "warn"
"#,
        );

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.fragments[0].plugins, vec!["unicorn".to_string()]);
    }

    #[test]
    fn test_load_yaml_fragment() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "lintrc.yaml",
            "rules:\n  no-console: warn\nignorePatterns:\n  - dist\n",
        );

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.fragments[0].ignore_patterns, vec!["dist".to_string()]);
    }

    #[test]
    fn test_auto_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), ".lintrc.json", r#"{"rules": {}}"#);

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().file_name().unwrap(), ".lintrc.json");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "lintrc.yaml", "rules: {}\n");
        create_temp_config(temp_dir.path(), ".lintrc.json", r#"{"rules": {}}"#);

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".lintrc.json");
    }

    #[test]
    fn test_extends_by_file_path() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(
            temp_dir.path(),
            "base.json",
            r#"{"rules": {"no-console": "error", "no-debugger": "error"}}"#,
        );
        let config_path = create_temp_config(
            temp_dir.path(),
            ".lintrc.json",
            r#"{"extends": ["./base.json"], "rules": {"no-console": "off"}}"#,
        );

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.bases.len(), 1);

        let resolver = loaded.resolver(ResolverOptions::default()).unwrap();
        let resolution = resolver.resolve("app.js").unwrap();
        let config = resolution.config().unwrap();
        assert_eq!(config.rules["no-console"].severity, Severity::Off);
        assert_eq!(config.rules["no-debugger"].severity, Severity::Error);
    }

    #[test]
    fn test_extends_file_loaded_once() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "shared.json", r#"{"rules": {}}"#);
        let config_path = create_temp_config(
            temp_dir.path(),
            ".lintrc.json",
            r#"[
                {"extends": ["./shared.json"]},
                {"extends": ["./shared.json"], "files": "*.md"}
            ]"#,
        );

        let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.bases.len(), 1);
    }

    #[test]
    fn test_extends_file_cycle_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(
            temp_dir.path(),
            "a.json",
            r#"{"extends": ["./b.json"]}"#,
        );
        create_temp_config(
            temp_dir.path(),
            "b.json",
            r#"{"extends": ["./a.json"]}"#,
        );
        let config_path = temp_dir.path().join("a.json");

        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Cycle);
    }

    #[test]
    fn test_extends_missing_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".lintrc.json",
            r#"{"extends": ["./missing.json"]}"#,
        );

        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Extended config file not found"));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path =
            create_temp_config(temp_dir.path(), ".lintrc.json", r#"{ invalid json }"#);

        let result = ConfigLoader::load_from_file(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.json")), None);
        assert!(result.is_err());
    }
}
