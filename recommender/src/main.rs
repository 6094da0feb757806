use anyhow::Result;
use clap::{Parser, Subcommand};
use recommender::FsStore;
use related::pipeline::{self, RunOptions};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recommender")]
#[command(about = "Generate related-article links for a markdown content directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every article against the rest and write recommendations back
    Generate {
        /// Directory containing `.md` articles
        #[arg(long, default_value = "content/articles")]
        content: String,
        /// Number of recommendations per article
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { content, top_k } => {
            let store = FsStore::new(&content);
            let summary = pipeline::run(&store, &RunOptions { top_k })?;
            tracing::info!(documents = summary.documents, "recommendations updated");
            Ok(())
        }
    }
}
