//! Preview of one table folder's column mapping.
//!
//! Merges the folder exactly as `convert` would and prints position, original
//! label, SQL identifier, and inferred type, without writing any files.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{cli::ColumnsArgs, config::ConvertOptions, pipeline::Converter, table};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let options = ConvertOptions::from_columns_args(args)?;
    let table_name = args
        .table_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    let converter = Converter::new(options);
    let prepared = converter
        .prepare_table(&args.table_dir, &table_name)
        .with_context(|| format!("Inspecting table folder {:?}", args.table_dir))?;

    let headers = ["#", "label", "identifier", "sql type", "kind"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = prepared
        .spec
        .columns
        .descriptors()
        .iter()
        .map(|column| {
            vec![
                column.position.to_string(),
                column.label.clone(),
                column.identifier.clone(),
                column.kind.sql_type().to_string(),
                column.kind.label().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);

    for identifier in prepared.spec.columns.collisions() {
        warn!("Identifier '{identifier}' is produced by more than one column label");
    }
    info!(
        "{} column(s) across {} row(s) in {:?}",
        prepared.spec.columns.len(),
        prepared.rows.row_count(),
        args.table_dir
    );
    Ok(())
}
