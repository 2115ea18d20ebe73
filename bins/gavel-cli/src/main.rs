mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gavel-cli")]
#[command(about = "Gavel CLI - Judge submissions and run code locally", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a solution file against a problem definition
    Judge {
        /// Path to a problem definition (JSON)
        #[arg(short, long)]
        problem: String,

        /// Path to the solution source file (function body)
        #[arg(short, long)]
        solution: String,

        /// Language of the solution (cpp, java, python)
        #[arg(short, long)]
        language: String,

        /// Print the full result as JSON instead of a summary
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Compile and run a complete source file once
    Exec {
        /// Language of the source (cpp, java, python)
        #[arg(short, long)]
        language: String,

        /// Path to the source file
        #[arg(short, long)]
        file: String,

        /// Optional path to a file piped to the program's stdin
        #[arg(short, long)]
        stdin: Option<String>,
    },

    /// List enabled languages and their toolchains
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Judge {
            problem,
            solution,
            language,
            json,
        } => {
            commands::judge(&problem, &solution, &language, json).await?;
        }
        Commands::Exec {
            language,
            file,
            stdin,
        } => {
            commands::exec(&language, &file, stdin.as_deref()).await?;
        }
        Commands::Languages => {
            commands::languages()?;
        }
    }

    Ok(())
}
