//! `oblibeny` — static deploy-phase safety analysis from the command line.

use clap::{Parser as ClapParser, Subcommand};
use oblibeny_cli::{config, exit_code, run_analysis, AnalyzeOptions, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;

fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}

#[derive(ClapParser)]
#[command(name = "oblibeny", version, about = "Deploy-phase safety analyzer for Oblibeny programs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON-serialized program and report the four verdicts
    Analyze {
        /// Path to the program JSON produced by the parser
        #[arg()]
        program: PathBuf,

        /// Analyzer config TOML (cost table / compile-only set overrides)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Entry point overriding the program's declared one
        #[arg(long)]
        entry: Option<String>,

        /// Override the declared time budget, in abstract units
        #[arg(long)]
        budget_time: Option<u64>,

        /// Override the declared memory budget, in bytes
        #[arg(long)]
        budget_memory: Option<u64>,

        /// Override the declared network budget, in bytes
        #[arg(long)]
        budget_network: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Disable ANSI colors in text output
        #[arg(long)]
        plain: bool,
    },
    /// Print the default analyzer configuration as TOML
    Costs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            program,
            config,
            entry,
            budget_time,
            budget_memory,
            budget_network,
            format,
            plain,
        } => {
            let opts = AnalyzeOptions {
                program,
                config,
                entry,
                budget_time,
                budget_memory,
                budget_network,
                format,
                plain,
            };
            match run_analysis(&opts) {
                Ok((report, rendered)) => {
                    print!("{}", rendered);
                    ExitCode::from(exit_code(&report) as u8)
                }
                Err(err) => {
                    eprintln!("{}: {}", red("error"), err);
                    ExitCode::from(2)
                }
            }
        }
        Commands::Costs => {
            print!("{}", config::default_toml());
            ExitCode::SUCCESS
        }
    }
}
