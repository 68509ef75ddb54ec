//! Command-line entry point for quizscan.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

use commands::review::ReviewArgs;

#[derive(Parser)]
#[command(name = "quizscan", version, about = "Scan, grade and record quiz papers")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data file (overrides `data_path` from the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter quizscan.toml
    Init,

    /// Read the marks off an already-graded paper
    Scan {
        /// Photo or scan of the paper
        #[arg(long)]
        image: PathBuf,

        /// Provider to use instead of the configured default
        #[arg(long)]
        provider: Option<String>,

        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Grade a student's paper, optionally against an answer key
    Grade {
        /// Photo or scan of the student's paper
        #[arg(long)]
        student: PathBuf,

        /// Photo or scan of the answer key
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Provider to use instead of the configured default
        #[arg(long)]
        provider: Option<String>,

        #[command(flatten)]
        review: ReviewArgs,
    },

    /// Record a quiz result entered by hand
    Add {
        /// Student name
        #[arg(long)]
        name: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        score: f64,

        /// Maximum marks available
        #[arg(long)]
        total: f64,

        /// Quiz date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List students with their quiz counts and averages
    Students,

    /// Show a student's quiz history, most recent first
    History {
        /// Student id or name
        #[arg(long)]
        student: String,
    },

    /// Show dashboard statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a student and all of their quiz records
    DeleteStudent {
        /// Student id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizscan=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let opts = commands::GlobalOpts {
        config: cli.config,
        data: cli.data,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Scan {
            image,
            provider,
            review,
        } => commands::scan::execute(&opts, image, provider, review).await,
        Commands::Grade {
            student,
            reference,
            provider,
            review,
        } => commands::grade::execute(&opts, student, reference, provider, review).await,
        Commands::Add {
            name,
            subject,
            score,
            total,
            date,
        } => commands::add::execute(&opts, name, subject, score, total, date).await,
        Commands::Students => commands::students::execute(&opts).await,
        Commands::History { student } => commands::history::execute(&opts, student).await,
        Commands::Stats { json } => commands::stats::execute(&opts, json).await,
        Commands::DeleteStudent { id } => commands::delete_student::execute(&opts, id).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
