//! Column descriptors and the label → identifier mapping table.
//!
//! Generated DDL and DML refer to columns by identifier; documentation keeps
//! the original label. [`ColumnMapping`] holds both names side by side so the
//! two outputs can never drift apart.

use std::{collections::HashSet, fmt};

use clap::ValueEnum;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    rowset::RowSet,
    sanitize::{MAX_IDENTIFIER_LEN, sanitize_column_name},
    value::CellValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    DateTime,
    Duration,
    Text,
}

impl ColumnKind {
    /// SQL type used in `CREATE TABLE`. Only numeric columns get a non-text type.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "INTEGER",
            _ => "TEXT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "INTEGER",
            ColumnKind::Boolean => "boolean",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Duration => "duration",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric when every non-null value is a number (or there are none);
/// otherwise the shared kind of the values, falling back to text.
pub fn infer_column_kind<'a, I>(values: I) -> ColumnKind
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let mut kind: Option<ColumnKind> = None;
    for value in values {
        let observed = match value {
            CellValue::Null => continue,
            CellValue::Integer(_) | CellValue::Float(_) => ColumnKind::Numeric,
            CellValue::Boolean(_) => ColumnKind::Boolean,
            CellValue::DateTime(_) => ColumnKind::DateTime,
            CellValue::Duration(_) => ColumnKind::Duration,
            CellValue::Text(_) => return ColumnKind::Text,
        };
        match kind {
            None => kind = Some(observed),
            Some(current) if current != observed => return ColumnKind::Text,
            Some(_) => {}
        }
    }
    kind.unwrap_or(ColumnKind::Numeric)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnNaming {
    /// `column_1`, `column_2`, ...
    Positional,
    /// [`sanitize_column_name`] applied to each label.
    Sanitized,
}

impl ColumnNaming {
    pub fn from_sanitize_flag(sanitize: bool) -> Self {
        if sanitize {
            ColumnNaming::Sanitized
        } else {
            ColumnNaming::Positional
        }
    }
}

/// What to do when two labels sanitize to the same identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Emit the colliding identifiers as-is and log a warning.
    #[default]
    Keep,
    /// Append `_1`, `_2`, ... to later occurrences.
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub position: usize,
    pub label: String,
    pub identifier: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    descriptors: Vec<ColumnDescriptor>,
    collisions: Vec<String>,
}

impl ColumnMapping {
    pub fn build(rowset: &RowSet, naming: ColumnNaming, policy: CollisionPolicy) -> Self {
        let mut descriptors = Vec::with_capacity(rowset.column_count());
        let mut seen: HashSet<String> = HashSet::new();
        let mut collisions = Vec::new();

        for (idx, label) in rowset.columns().iter().enumerate() {
            let base = match naming {
                ColumnNaming::Positional => positional_alias(idx + 1),
                ColumnNaming::Sanitized => sanitize_column_name(label),
            };
            let identifier = if seen.contains(&base) {
                if !collisions.contains(&base) {
                    collisions.push(base.clone());
                }
                match policy {
                    CollisionPolicy::Keep => {
                        warn!("Column '{label}' maps to identifier '{base}' already in use");
                        base
                    }
                    CollisionPolicy::Suffix => next_free_identifier(&base, &seen),
                }
            } else {
                base
            };
            seen.insert(identifier.clone());
            descriptors.push(ColumnDescriptor {
                position: idx + 1,
                label: label.clone(),
                identifier,
                kind: infer_column_kind(rowset.column_values(idx)),
            });
        }

        Self {
            descriptors,
            collisions,
        }
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    pub fn first(&self) -> Option<&ColumnDescriptor> {
        self.descriptors.first()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.descriptors.iter().map(|d| d.identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Identifiers produced by more than one label, before any suffixing.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }
}

pub fn positional_alias(position: usize) -> String {
    format!("column_{position}")
}

fn next_free_identifier(base: &str, taken: &HashSet<String>) -> String {
    let mut counter = 1usize;
    loop {
        let suffix = format!("_{counter}");
        let keep = MAX_IDENTIFIER_LEN.saturating_sub(suffix.chars().count());
        let candidate = base.chars().take(keep).collect::<String>() + &suffix;
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[derive(Debug, Clone)]
pub struct TableSpec {
    pub schema: String,
    pub table: String,
    pub columns: ColumnMapping,
}

impl TableSpec {
    pub fn new(schema: impl Into<String>, table: impl Into<String>, columns: ColumnMapping) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            columns,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
