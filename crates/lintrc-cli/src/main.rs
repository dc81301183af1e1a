//! lintrc CLI
//!
//! Command-line interface for resolving layered lint configuration

mod commands;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use lintrc_core::init_tracing;
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "lintrc")]
#[command(about = "Resolve layered lint configuration into per-file effective configurations")]
#[command(version = lintrc_core::VERSION)]
#[command(
    long_about = "lintrc composes ordered configuration fragments (rule sets, plugin \n\
defaults, file-glob overrides, ignore patterns) into one effective configuration per file.\n\
\n\
Examples:\n  \
lintrc resolve src/app.js            # Show the effective config for one file\n  \
lintrc check .                       # Resolve every file under a directory\n  \
lintrc config validate               # Validate the discovered config\n  \
lintrc config init                   # Create a starter configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.lintrc.json/.lintrc.toml/lintrc.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel resolution
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the effective configuration for one or more file paths
    Resolve {
        /// File paths to resolve (relative to the config root)
        #[arg(required = true, help = "File paths to resolve")]
        paths: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "json", help = "Output format")]
        format: OutputFormat,

        /// Treat unknown-rule findings as fatal
        #[arg(long, help = "Fail on unknown rules instead of dropping them")]
        strict: bool,

        /// Deep-merge rule option objects across layers
        #[arg(long, help = "Deep-merge rule options instead of replacing them")]
        deep_merge: bool,
    },

    /// Resolve every file under a directory and report warnings
    Check {
        /// Directory to walk (default: current directory)
        #[arg(help = "Directory to check (default: current directory)")]
        path: Option<PathBuf>,

        /// Treat unknown-rule findings as fatal
        #[arg(long, help = "Fail on unknown rules instead of dropping them")]
        strict: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(long, default_value = "json", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(help = "Path to configuration file (default: search for .lintrc)")]
        path: Option<PathBuf>,
    },

    /// Show the loaded configuration
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// YAML format
    Yaml,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
}

fn main() {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    // Initialize colored output
    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "lintrc=error",
        1 => "lintrc=warn",
        2 => "lintrc=info",
        3 => "lintrc=debug",
        _ => "lintrc=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        error!("lintrc failed: {:#}", e);
        std::process::exit(1);
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Resolve {
            paths,
            format,
            strict,
            deep_merge,
        }) => commands::resolve_command(paths, format, strict, deep_merge, cli.config),

        Some(Commands::Check { path, strict }) => {
            let path = path.unwrap_or_else(|| PathBuf::from("."));
            commands::check_command(path, strict, cli.config)
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config_init_command(format, force),
            ConfigAction::Validate { path } => commands::config_validate_command(path),
            ConfigAction::Show => commands::config_show_command(cli.config),
        },

        Some(Commands::Version) => {
            println!("{}", lintrc_core::VERSION);
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
