//! Typed failures surfaced by the conversion pipeline.
//!
//! Most call sites work with `anyhow::Result` and attach context; these
//! variants exist for the conditions callers may want to match on after a
//! `downcast_ref`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input directory (or table folder) is missing or is not a directory.
    #[error("Directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A table folder exists but holds nothing to merge.
    #[error("No spreadsheet files found in {}", folder.display())]
    NoSpreadsheets { folder: PathBuf },

    #[error("Failed to open workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Sheet '{sheet}' not found in {}", path.display())]
    SheetNotFound { path: PathBuf, sheet: String },
}
