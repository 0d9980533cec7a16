pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod schema;
pub mod session;
pub mod source;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, ValidateArgs},
    config::Config,
    schema::{INVENTORY_SHEET, REQUIRED_INVENTORY_COLUMNS, REQUIRED_SALES_COLUMNS, SALES_SHEET},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sales_insight", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => report::execute(&args),
        Commands::Validate(args) => handle_validate(&args),
    }
}

fn handle_validate(args: &ValidateArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let checks = [
        (
            INVENTORY_SHEET,
            config.inventory_source()?,
            REQUIRED_INVENTORY_COLUMNS,
        ),
        (SALES_SHEET, config.sales_source()?, REQUIRED_SALES_COLUMNS),
    ];
    for (sheet, source, required) in checks {
        let table = source.fetch(sheet)?;
        schema::validate_columns(&table, required, sheet)?;
        info!(
            "{} sheet: {} required column(s) present, {} row(s)",
            sheet,
            required.len(),
            table.row_count()
        );
    }
    Ok(())
}
