use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "revu")]
#[command(about = "YouTube Product Review Analyzer")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Force CLI mode (skip TUI)
    #[arg(long)]
    pub cli: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a video's transcript for opinions on a product
    Analyze {
        /// YouTube video URL or video ID
        video_url: String,

        /// Product the reviewer is talking about
        #[arg(short, long)]
        product: String,

        /// Preferred transcript languages (comma-separated)
        #[arg(short, long)]
        languages: Option<String>,
    },

    /// Print the aggregate summary for stored reviews
    Summary {
        /// Restrict to one product (case-insensitive); all products if omitted
        #[arg(short, long)]
        product: Option<String>,
    },

    /// List analyzed products and their segment counts
    Products,

    /// Generate a narrative review report for a product
    Report {
        /// Product to report on
        #[arg(short, long)]
        product: String,
    },

    /// Open TUI dashboard
    Tui,
}
