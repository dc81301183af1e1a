//! Command implementations: resolve, check, config

use anyhow::Context;
use colored::Colorize;
use lintrc_core::{
    ConfigLoader, LoadedConfig, OptionMergePolicy, Resolution, Resolver, ResolverOptions,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::{ConfigFormat, OutputFormat};

/// Load the fragment set from an explicit path or by auto-discovery
fn load_config(config_path: Option<&Path>) -> anyhow::Result<LoadedConfig> {
    ConfigLoader::load(config_path, None).context("failed to load configuration")
}

fn build_resolver(
    config_path: Option<&Path>,
    strict: bool,
    deep_merge: bool,
) -> anyhow::Result<Resolver> {
    let options = ResolverOptions {
        strict,
        option_merge: if deep_merge {
            OptionMergePolicy::Deep
        } else {
            OptionMergePolicy::Replace
        },
    };
    load_config(config_path)?
        .resolver(options)
        .context("failed to build resolver")
}

/// Resolve command implementation
pub fn resolve_command(
    paths: Vec<String>,
    format: OutputFormat,
    strict: bool,
    deep_merge: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let resolver = build_resolver(config_path.as_deref(), strict, deep_merge)?;

    for path in &paths {
        let resolution = resolver
            .resolve(path)
            .with_context(|| format!("failed to resolve '{path}'"))?;

        if paths.len() > 1 {
            println!("{}", format!("# {path}").bold());
        }
        let rendered = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&resolution)?,
            OutputFormat::Yaml => serde_yaml::to_string(&resolution)?,
        };
        println!("{rendered}");
    }

    Ok(())
}

/// Check command implementation: resolve every file under a directory
pub fn check_command(
    root: PathBuf,
    strict: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let resolver = build_resolver(config_path.as_deref(), strict, false)?;

    let files: Vec<String> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(&root)
                .ok()
                .map(|relative| relative.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    debug!("checking {} files under {}", files.len(), root.display());

    let results: Vec<(String, lintrc_core::Result<Resolution>)> = files
        .par_iter()
        .map(|path| (path.clone(), resolver.resolve(path)))
        .collect();

    let mut linted = 0usize;
    let mut excluded = 0usize;
    let mut warning_count = 0usize;
    let mut failed = false;

    for (path, result) in results {
        match result {
            Ok(Resolution::Excluded) => excluded += 1,
            Ok(Resolution::Effective { warnings, .. }) => {
                linted += 1;
                for warning in &warnings {
                    println!(
                        "{} {}: {} ({})",
                        "warning".yellow().bold(),
                        path,
                        warning.message,
                        warning.rule_id
                    );
                }
                warning_count += warnings.len();
            }
            Err(e) => {
                eprintln!("{} {}: {}", "error".red().bold(), path, e);
                failed = true;
            }
        }
    }

    println!(
        "{linted} file(s) resolved, {excluded} excluded, {warning_count} warning(s)"
    );

    if failed {
        anyhow::bail!("resolution failed for one or more files");
    }
    Ok(())
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> anyhow::Result<()> {
    let filename = match format {
        ConfigFormat::Json => ".lintrc.json",
        ConfigFormat::Toml => ".lintrc.toml",
    };
    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file '{filename}' already exists. Use --force to overwrite."
        );
    }

    let default_config = serde_json::json!({
        "plugins": [],
        "rules": {
            "no-console": "warn"
        },
        "ignorePatterns": ["dist", "node_modules"]
    });

    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&default_config)?,
        ConfigFormat::Toml => {
            let value: toml::Value = serde_json::from_value(default_config)?;
            toml::to_string_pretty(&value)?
        }
    };

    std::fs::write(&config_path, content)
        .with_context(|| format!("failed to write '{filename}'"))?;
    println!("Created {filename}");
    Ok(())
}

/// Config validate command implementation
pub fn config_validate_command(path: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = load_config(path.as_deref())?;
    let fragment_count = loaded.fragments.len();
    let base_count = loaded.bases.len();

    // Building the resolver compiles every glob and checks name references
    loaded
        .resolver(ResolverOptions::default())
        .context("configuration is invalid")?;

    println!("{} Configuration is valid", "ok".green().bold());
    println!("   {fragment_count} fragment(s), {base_count} extended base(s)");
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = load_config(config_path.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&loaded.fragments)?);
    Ok(())
}
