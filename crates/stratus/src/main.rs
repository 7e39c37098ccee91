mod commands;
mod programs;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "Declarative cloud provisioning on a deferred-value graph", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a program and run it against the simulated engine
    Preview {
        /// Program name (see `stratus programs`)
        program: String,
        /// Configuration values, repeatable as -c key=value
        #[arg(short = 'c', long = "config", value_name = "KEY=VALUE")]
        config: Vec<String>,
    },
    /// Print a program's dependency graph
    Graph {
        /// Program name (see `stratus programs`)
        program: String,
        /// Configuration values, repeatable as -c key=value
        #[arg(short = 'c', long = "config", value_name = "KEY=VALUE")]
        config: Vec<String>,
    },
    /// List the built-in programs and their configuration keys
    Programs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { program, config } => commands::preview::handle(&program, &config).await,
        Commands::Graph { program, config } => commands::graph::handle(&program, &config),
        Commands::Programs => {
            commands::programs::handle();
            Ok(())
        }
    }
}
