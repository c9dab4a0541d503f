//! Conversion options, loaded from an optional YAML file and overridden by
//! command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    cli::{ColumnsArgs, ConvertArgs},
    columns::{CollisionPolicy, ColumnNaming},
    dml::DeleteKey,
    value::QuoteEscape,
};

pub const DEFAULT_SHEET_NAME: &str = "Raw Data";
pub const DEFAULT_DEDUP_COLUMN: &str = "Response ID";
pub const DEFAULT_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Target schema, assumed to exist already.
    pub schema: String,
    pub sheet_name: String,
    pub skip_duplicates: bool,
    pub sanitize_column_names: bool,
    pub dedup_column: String,
    pub quote_escape: QuoteEscape,
    pub collision_policy: CollisionPolicy,
    pub delete_key: DeleteKey,
    pub output_dir: Option<PathBuf>,
    pub extensions: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            schema: String::new(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            skip_duplicates: false,
            sanitize_column_names: false,
            dedup_column: DEFAULT_DEDUP_COLUMN.to_string(),
            quote_escape: QuoteEscape::default(),
            collision_policy: CollisionPolicy::default(),
            delete_key: DeleteKey::default(),
            output_dir: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ConvertOptions {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn from_convert_args(args: &ConvertArgs) -> Result<Self> {
        let mut options = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(schema) = &args.schema {
            options.schema = schema.clone();
        }
        if let Some(sheet) = &args.sheet_name {
            options.sheet_name = sheet.clone();
        }
        if let Some(column) = &args.dedup_column {
            options.dedup_column = column.clone();
        }
        if let Some(escape) = args.quote_escape {
            options.quote_escape = escape;
        }
        if let Some(policy) = args.collision_policy {
            options.collision_policy = policy;
        }
        if let Some(key) = args.delete_key {
            options.delete_key = key;
        }
        if let Some(dir) = &args.output_dir {
            options.output_dir = Some(dir.clone());
        }
        if let Some(skip) = switch(args.skip_duplicates, args.no_skip_duplicates) {
            options.skip_duplicates = skip;
        }
        if let Some(sanitize) = switch(args.sanitize_column_names, args.no_sanitize_column_names) {
            options.sanitize_column_names = sanitize;
        }
        options.validate()?;
        Ok(options)
    }

    /// Options for the `columns` preview; no schema is needed there.
    pub fn from_columns_args(args: &ColumnsArgs) -> Result<Self> {
        let mut options = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(sheet) = &args.sheet_name {
            options.sheet_name = sheet.clone();
        }
        if let Some(policy) = args.collision_policy {
            options.collision_policy = policy;
        }
        if let Some(sanitize) = switch(args.sanitize_column_names, args.no_sanitize_column_names) {
            options.sanitize_column_names = sanitize;
        }
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema.trim().is_empty() {
            bail!("A target schema is required (--schema or `schema:` in the config file)");
        }
        if self.sheet_name.trim().is_empty() {
            bail!("Sheet name cannot be empty");
        }
        if self.extensions.is_empty() {
            bail!("At least one spreadsheet extension must be configured");
        }
        Ok(())
    }

    pub fn naming(&self) -> ColumnNaming {
        ColumnNaming::from_sanitize_flag(self.sanitize_column_names)
    }
}

/// Resolves an `--x` / `--no-x` flag pair; `None` leaves the file value alone.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
