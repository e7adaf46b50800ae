use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "pathwarden",
    version,
    about = "Decide which project files an LLM assistant may read"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the default tool config, or an example rule file with --rules
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        /// Directory to write an example llm_approvements.json into
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    Config {
        #[arg(long)]
        print: bool,
    },
    /// Validate a rule file and list its warnings
    Lint {
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Resolve the given paths against the rule file
    Check {
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Resolve every file under a project root
    Scan {
        #[arg(long)]
        rules: Option<PathBuf>,
        #[arg(long)]
        json: bool,
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Re-resolve paths whenever the rule file changes
    Watch {
        #[arg(long)]
        rules: Option<PathBuf>,
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, rules, force } => match rules {
            Some(dir) => commands::init::write_example_rules(&dir, cli.config, force),
            None => commands::init::write_config(path.or(cli.config), force),
        },
        Commands::Config { print } => {
            if print {
                commands::config::print_effective(cli.config)
            } else {
                Ok(())
            }
        }
        Commands::Lint { rules } => commands::lint::execute(cli.config, rules),
        Commands::Check { rules, json, paths } => {
            commands::check::execute(commands::check::CheckInputs {
                config_path: cli.config,
                rules,
                json,
                paths,
            })
        }
        Commands::Scan { rules, json, root } => {
            commands::scan::execute(commands::scan::ScanInputs {
                config_path: cli.config,
                rules,
                json,
                root,
            })
        }
        Commands::Watch { rules, paths } => commands::watch::execute(cli.config, rules, paths),
    }
}
