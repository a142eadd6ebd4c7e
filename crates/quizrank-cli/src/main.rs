//! quizrank CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "quizrank", version, about = "Quiz ending analysis engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single response
    Analyze {
        /// Path to the engine definition (.toml)
        #[arg(long)]
        engine: PathBuf,

        /// Path to the response (.json)
        #[arg(long)]
        response: PathBuf,

        /// Quiz definition to check the response against
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Show rule-by-rule contributions
        #[arg(long)]
        explain: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the result JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Re-analyze many responses against one engine
    Batch {
        /// Path to the engine definition (.toml)
        #[arg(long)]
        engine: PathBuf,

        /// JSON file (one response or an array) or directory of response files
        #[arg(long)]
        responses: PathBuf,

        /// Max concurrent analyses (defaults to the config file value)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory (defaults to the config file value)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate an engine definition
    Validate {
        /// Path to the engine definition (.toml)
        #[arg(long)]
        engine: PathBuf,

        /// Quiz definition to cross-check rules against
        #[arg(long)]
        quiz: Option<PathBuf>,
    },

    /// Compare two analysis results
    Compare {
        /// Baseline result JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current result JSON
        #[arg(long)]
        current: PathBuf,

        /// Percentage-point change that counts as a shift
        #[arg(long)]
        threshold: Option<f64>,

        /// Exit code 1 if the ranking shifted
        #[arg(long)]
        fail_on_shift: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example engine, quiz, and response
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizrank=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            engine,
            response,
            quiz,
            explain,
            format,
            output,
        } => commands::analyze::execute(engine, response, quiz, explain, format, output),
        Commands::Batch {
            engine,
            responses,
            parallelism,
            output,
            config,
        } => commands::batch::execute(engine, responses, parallelism, output, config).await,
        Commands::Validate { engine, quiz } => commands::validate::execute(engine, quiz),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_shift,
            format,
            config,
        } => commands::compare::execute(baseline, current, threshold, fail_on_shift, format, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
