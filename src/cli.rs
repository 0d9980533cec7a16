use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Sales and inventory reporting over spreadsheet CSV exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the full sales and inventory report as terminal tables
    Report(ReportArgs),
    /// Fetch both sheets and verify the required columns are present
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "sales-insight.yaml")]
    pub config: PathBuf,
    /// Dashboard password (falls back to SALES_INSIGHT_PASSWORD, then the config file)
    #[arg(long)]
    pub password: Option<String>,
    /// Start of the report date range, YYYY-MM-DD (defaults to the earliest sale)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// End of the report date range, YYYY-MM-DD (defaults to the latest sale)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Restrict the report to this category (repeatable)
    #[arg(long = "category", action = clap::ArgAction::Append)]
    pub categories: Vec<String>,
    /// Restrict the report to this product name (repeatable)
    #[arg(long = "product", action = clap::ArgAction::Append)]
    pub products: Vec<String>,
    /// Number of entries in the product rankings
    #[arg(long, default_value_t = 5)]
    pub top: usize,
    /// Number of entries in the customer ranking
    #[arg(long = "top-customers", default_value_t = 10)]
    pub top_customers: usize,
    /// Discard any cached dataset and fetch fresh data
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "sales-insight.yaml")]
    pub config: PathBuf,
}
