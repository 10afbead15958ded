//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// product-recs: personalized product recommendations over a JSON catalog
#[derive(Parser, Debug)]
#[command(name = "product-recs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the recommendation HTTP API
    Serve(ServeArgs),

    /// One-shot recommendation for a request file or inline preferences
    Recommend(RecommendArgs),

    /// Inspect the product catalog
    Catalog(CatalogArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override bind address
    #[arg(long)]
    pub bind: Option<String>,

    /// Override port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// JSON request file (use - for stdin)
    #[arg(long, conflicts_with_all = ["liked", "price_range", "categories", "brands"])]
    pub request: Option<PathBuf>,

    /// Liked product id (repeatable)
    #[arg(long = "liked")]
    pub liked: Vec<String>,

    /// Price range, e.g. "20-40", "100+", "50" or "all"
    #[arg(long)]
    pub price_range: Option<String>,

    /// Preferred category (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Preferred brand (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Override catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List catalog products
    List {
        /// Override catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only list products in this category
        #[arg(long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the catalog against the complementarity table
    Validate {
        /// Override catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration (file plus environment) as JSON
    Show,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
