//! Directory discovery for table folders and the spreadsheets inside them.
//!
//! Listings are sorted by name so repeated runs emit tables in the same
//! order, but nothing downstream relies on that order for correctness.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::error::ConvertError;

/// Prefix Office uses for the lock file it drops next to an open workbook.
const LOCK_FILE_PREFIX: &str = "~$";

pub fn list_subfolders(path: &Path) -> Result<Vec<String>> {
    list_entries(path, EntryKind::Directory)
}

pub fn list_files(path: &Path) -> Result<Vec<String>> {
    list_entries(path, EntryKind::File)
}

pub fn spreadsheet_files(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for name in list_files(folder)? {
        if name.starts_with(LOCK_FILE_PREFIX) {
            debug!("Skipping lock file {name:?} in {folder:?}");
            continue;
        }
        if has_extension(&name, extensions) {
            files.push(folder.join(name));
        } else {
            debug!("Skipping non-spreadsheet file {name:?} in {folder:?}");
        }
    }
    Ok(files)
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

#[derive(Clone, Copy)]
enum EntryKind {
    Directory,
    File,
}

fn list_entries(path: &Path, kind: EntryKind) -> Result<Vec<String>> {
    if !path.is_dir() {
        return Err(ConvertError::NotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("Listing directory {path:?}"))? {
        let entry = entry.with_context(|| format!("Reading entry in {path:?}"))?;
        let entry_path = entry.path();
        let matches = match kind {
            EntryKind::Directory => entry_path.is_dir(),
            EntryKind::File => entry_path.is_file(),
        };
        if !matches {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Ignoring entry with non UTF-8 name {raw:?} in {path:?}"),
        }
    }
    names.sort();
    Ok(names)
}
