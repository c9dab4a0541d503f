use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{columns::CollisionPolicy, dml::DeleteKey, value::QuoteEscape};

#[derive(Debug, Parser)]
#[command(author, version, about = "Turn folders of spreadsheets into SQL scripts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate CREATE TABLE, INSERT, and column documentation files for every table folder
    Convert(ConvertArgs),
    /// Show how one table folder's column labels map to SQL identifiers and types
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Root directory holding one subfolder per table
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: PathBuf,
    /// Target database schema (must already exist)
    #[arg(short, long)]
    pub schema: Option<String>,
    /// Sheet to read from every workbook (defaults to "Raw Data")
    #[arg(long = "sheet-name")]
    pub sheet_name: Option<String>,
    /// Keep duplicate rows and omit the duplicate-removal DELETE
    #[arg(long = "skip-duplicates", overrides_with = "no_skip_duplicates")]
    pub skip_duplicates: bool,
    /// Remove duplicates even if the config file sets skip_duplicates
    #[arg(long = "no-skip-duplicates", overrides_with = "skip_duplicates")]
    pub no_skip_duplicates: bool,
    /// Use sanitized column labels instead of column_<n> aliases
    #[arg(long = "sanitize-column-names", overrides_with = "no_sanitize_column_names")]
    pub sanitize_column_names: bool,
    /// Use column_<n> aliases even if the config file enables sanitized names
    #[arg(long = "no-sanitize-column-names", overrides_with = "sanitize_column_names")]
    pub no_sanitize_column_names: bool,
    /// Column whose repeated values mark duplicate rows (defaults to "Response ID")
    #[arg(long = "dedup-column")]
    pub dedup_column: Option<String>,
    /// How single quotes inside text values are escaped
    #[arg(long = "quote-escape", value_enum)]
    pub quote_escape: Option<QuoteEscape>,
    /// How identifiers shared by several sanitized labels are handled
    #[arg(long = "collision-policy", value_enum)]
    pub collision_policy: Option<CollisionPolicy>,
    /// Column name the duplicate-removal DELETE groups by
    #[arg(long = "delete-key", value_enum)]
    pub delete_key: Option<DeleteKey>,
    /// Write generated files here instead of into each table folder
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// YAML file providing defaults for any of the options above
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Table folder containing the spreadsheets to inspect
    #[arg(short = 't', long = "table-dir")]
    pub table_dir: PathBuf,
    /// Sheet to read from every workbook (defaults to "Raw Data")
    #[arg(long = "sheet-name")]
    pub sheet_name: Option<String>,
    /// Use sanitized column labels instead of column_<n> aliases
    #[arg(long = "sanitize-column-names", overrides_with = "no_sanitize_column_names")]
    pub sanitize_column_names: bool,
    /// Use column_<n> aliases even if the config file enables sanitized names
    #[arg(long = "no-sanitize-column-names", overrides_with = "sanitize_column_names")]
    pub no_sanitize_column_names: bool,
    /// How identifiers shared by several sanitized labels are handled
    #[arg(long = "collision-policy", value_enum)]
    pub collision_policy: Option<CollisionPolicy>,
    /// YAML file providing defaults for the options above
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
