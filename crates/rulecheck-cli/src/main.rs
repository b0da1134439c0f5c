//! Rulecheck CLI - runs user-defined rule files over parsed source units.

use anyhow::{Context, Result};
use clap::Parser;
use rulecheck_cli::commands::{checker_registry_for_listing, render_checkers, run_check, CheckOptions};
use rulecheck_cli::formatters::{Formatter, HumanFormatter, JsonFormatter};
use rulecheck_cli::logging;
use rulecheck_config::CheckerOverrides;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "rulecheck")]
#[command(about = "Runs user-defined rule files over source units dumped by a front end", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (-v info, -vv debug); RULECHECK_LOG overrides
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Check unit dumps against the configured rule files
    Check {
        /// Unit dumps (JSON) to check
        ///
        /// Examples:
        ///   rulecheck check main.json
        ///   rulecheck check --rules 'rules/*.toml' units/*.json
        #[arg(value_name = "UNIT")]
        units: Vec<PathBuf>,

        /// Comma-separated rule file globs
        #[arg(long)]
        rules: Option<String>,

        /// Rule group to trace on stderr
        #[arg(long)]
        debug: Option<String>,

        /// Comma-separated failure conditions: import, dsl, all
        #[arg(long)]
        fail_on_error: Option<String>,

        /// Order of findings within a unit
        #[arg(long, value_enum)]
        order: Option<FindingOrderArg>,

        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long = "output", value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List registered checkers and their parameters
    Checkers {
        /// Output format
        #[arg(short, long = "output", value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FindingOrderArg {
    Message,
    Position,
}

impl FindingOrderArg {
    fn token(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Position => "position",
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let root = std::env::current_dir().context("Failed to get current working directory")?;

    match cli.command {
        Command::Check {
            units,
            rules,
            debug,
            fail_on_error,
            order,
            config,
            format,
        } => {
            let options = CheckOptions {
                units,
                config,
                overrides: CheckerOverrides {
                    rules,
                    debug,
                    fail_on_error,
                    order: order.map(|o| o.token().to_string()),
                },
            };
            let outcome = run_check(&options, &root)?;

            let formatter: &dyn Formatter = match format {
                OutputFormat::Human => &HumanFormatter,
                OutputFormat::Json => &JsonFormatter,
            };
            print!("{}", formatter.render(&outcome));

            Ok(if outcome.has_findings() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Checkers { format } => {
            let registry = checker_registry_for_listing(&root)?;
            match format {
                OutputFormat::Human => print!("{}", render_checkers(registry.infos())),
                OutputFormat::Json => {
                    let infos: Vec<_> = registry.infos().collect();
                    println!("{}", serde_json::to_string_pretty(&infos)?);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
