//! Per-table conversion: merge a folder's spreadsheets, optionally drop
//! duplicates, then write the DDL, DML, and documentation files.
//!
//! Tables run one after another in discovery order. The first failure stops
//! the run; files already written for earlier stages stay on disk.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::ConvertArgs,
    columns::{ColumnMapping, TableSpec},
    config::ConvertOptions,
    ddl, dml, docs,
    rowset::{self, RowSet},
    scanner,
};

/// Stages a table folder moves through. Used for progress logging and to
/// label errors with where they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Merge,
    Dedup,
    Generate,
    Write,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discover => "discover",
            Stage::Merge => "merge",
            Stage::Dedup => "dedup",
            Stage::Generate => "generate",
            Stage::Write => "write",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub create_table: PathBuf,
    pub insert_data: PathBuf,
    pub columns_doc: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: &Path, table: &str) -> Self {
        Self {
            create_table: dir.join(format!("create_table_{table}.sql")),
            insert_data: dir.join(format!("insert_data_{table}.sql")),
            columns_doc: dir.join(format!("{table}_columns.txt")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableReport {
    pub table: String,
    pub rows: usize,
    pub paths: ArtifactPaths,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub tables: Vec<TableReport>,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

#[derive(Debug, Clone)]
pub struct PreparedTable {
    pub spec: TableSpec,
    pub rows: RowSet,
}

pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, data_dir: &Path) -> Result<RunSummary> {
        let tables = scanner::list_subfolders(data_dir)
            .with_context(|| format!("Discovering table folders in {data_dir:?}"))?;
        debug!(
            "[{}] {} table folder(s) in {:?}",
            Stage::Discover,
            tables.len(),
            data_dir
        );
        let output_dir = self
            .options
            .output_dir
            .as_deref()
            .and_then(|dir| fs::canonicalize(dir).ok());
        let mut summary = RunSummary::default();
        for table in &tables {
            if let Some(out) = &output_dir {
                if fs::canonicalize(data_dir.join(table)).ok().as_ref() == Some(out) {
                    info!("Skipping output directory {}", out.display());
                    continue;
                }
            }
            let report = self
                .process_table(data_dir, table)
                .with_context(|| format!("Processing table '{table}'"))?;
            summary.tables.push(report);
        }
        Ok(summary)
    }

    pub fn process_table(&self, data_dir: &Path, table: &str) -> Result<TableReport> {
        let folder = data_dir.join(table);
        info!("Processing folder: {}", folder.display());

        let prepared = self.prepare_table(&folder, table)?;

        debug!("[{}] {table}", Stage::Generate);
        let create_sql = ddl::create_table_sql(&prepared.spec);
        let insert_sql = dml::insert_data_sql(
            &prepared.spec,
            &prepared.rows,
            self.options.skip_duplicates,
            self.options.quote_escape,
            self.options.delete_key,
        );
        let doc = docs::column_documentation(&prepared.spec.columns);

        debug!("[{}] {table}", Stage::Write);
        let out_dir = match &self.options.output_dir {
            Some(dir) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Creating output directory {dir:?}"))?;
                dir.clone()
            }
            None => folder.clone(),
        };
        let paths = ArtifactPaths::new(&out_dir, table);
        write_artifact(&paths.create_table, &create_sql)?;
        write_artifact(&paths.insert_data, &insert_sql)?;
        write_artifact(&paths.columns_doc, &doc)?;

        debug!("[{}] {table}", Stage::Done);
        info!("SQL files and documentation created for {table}");
        Ok(TableReport {
            table: table.to_string(),
            rows: prepared.rows.row_count(),
            paths,
        })
    }

    /// Merges `folder` and builds its column mapping without writing anything.
    pub fn prepare_table(&self, folder: &Path, table: &str) -> Result<PreparedTable> {
        debug!("[{}] {table}", Stage::Merge);
        let mut rows = rowset::merge_folder(
            folder,
            &self.options.sheet_name,
            &self.options.extensions,
        )
        .with_context(|| format!("{} stage failed for {folder:?}", Stage::Merge))?;

        if !self.options.skip_duplicates {
            debug!("[{}] {table}", Stage::Dedup);
            rows = rowset::remove_duplicate_rows(rows, &self.options.dedup_column);
        }

        let mapping = ColumnMapping::build(
            &rows,
            self.options.naming(),
            self.options.collision_policy,
        );
        Ok(PreparedTable {
            spec: TableSpec::new(self.options.schema.clone(), table, mapping),
            rows,
        })
    }
}

fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, format!("{contents}\n")).with_context(|| format!("Writing {path:?}"))?;
    debug!("Wrote {path:?}");
    Ok(())
}

pub fn execute(args: &ConvertArgs) -> Result<()> {
    let options = ConvertOptions::from_convert_args(args)?;
    info!(
        "Converting '{}' into schema '{}' (sheet '{}')",
        args.data_dir.display(),
        options.schema,
        options.sheet_name
    );
    let summary = Converter::new(options).run(&args.data_dir)?;
    info!(
        "Generated scripts for {} table(s) covering {} row(s)",
        summary.tables.len(),
        summary.total_rows()
    );
    Ok(())
}
