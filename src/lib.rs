pub mod cli;
pub mod columns;
pub mod columns_cmd;
pub mod config;
pub mod ddl;
pub mod dml;
pub mod docs;
pub mod error;
pub mod pipeline;
pub mod rowset;
pub mod sanitize;
pub mod scanner;
pub mod table;
pub mod value;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheets2sql", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => pipeline::execute(&args),
        Commands::Columns(args) => columns_cmd::execute(&args),
    }
}
