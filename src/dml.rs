//! `INSERT` generation and the optional duplicate-removal `DELETE`.
//!
//! The `DELETE` filters on the surrogate key created by the DDL script, so the
//! DDL must run first.

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    columns::{ColumnDescriptor, TableSpec, quote_ident},
    ddl::SURROGATE_KEY,
    rowset::RowSet,
    sanitize::sanitize_column_name,
    value::{QuoteEscape, format_sql_literal},
};

/// Column name the duplicate-removal `DELETE` groups by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum DeleteKey {
    /// The sanitized first label, whatever the naming mode. In positional
    /// mode this names a column the generated table does not have.
    #[default]
    Sanitized,
    /// The first column's identifier as it appears in the generated table.
    Identifier,
}

impl DeleteKey {
    pub fn column_name(self, column: &ColumnDescriptor) -> String {
        match self {
            DeleteKey::Sanitized => sanitize_column_name(&column.label),
            DeleteKey::Identifier => column.identifier.clone(),
        }
    }
}

/// One multi-row `INSERT` for the whole row-set, followed by a `DELETE` that
/// keeps the newest row per first-column value unless `skip_duplicates` is set.
pub fn insert_data_sql(
    spec: &TableSpec,
    rowset: &RowSet,
    skip_duplicates: bool,
    escape: QuoteEscape,
    delete_key: DeleteKey,
) -> String {
    let columns = spec.columns.identifiers().map(quote_ident).join(", ");
    let values = rowset
        .rows()
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|value| format_sql_literal(value, escape))
                .join(", ");
            format!("({cells})")
        })
        .join(", ");
    let mut sql = format!(
        "INSERT INTO {} ({columns}) VALUES {values};",
        spec.qualified_name()
    );

    if !skip_duplicates {
        if let Some(first) = spec.columns.first() {
            sql.push_str("\n\n");
            sql.push_str(&remove_duplicates_sql(spec, &delete_key.column_name(first)));
        }
    }
    sql
}

/// Deletes every row except the one with the highest surrogate key per
/// distinct `column` value.
pub fn remove_duplicates_sql(spec: &TableSpec, column: &str) -> String {
    let table = spec.qualified_name();
    let column = quote_ident(column);
    format!(
        "DELETE FROM {table}\n\
         WHERE {SURROGATE_KEY} NOT IN\n\
         (\n    \
             SELECT MAX({SURROGATE_KEY})\n    \
             FROM {table}\n    \
             GROUP BY {column}\n\
         );"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        columns::{CollisionPolicy, ColumnMapping, ColumnNaming},
        value::CellValue,
    };

    fn two_rows() -> RowSet {
        RowSet::new(
            vec!["Response ID".to_string(), "Answer".to_string()],
            vec![vec![1.into(), "A".into()], vec![2.into(), "B".into()]],
        )
    }

    fn spec_for(rowset: &RowSet, naming: ColumnNaming) -> TableSpec {
        TableSpec::new(
            "s",
            "t",
            ColumnMapping::build(rowset, naming, CollisionPolicy::Keep),
        )
    }

    #[test]
    fn single_insert_without_delete_when_skipping_duplicates() {
        let rowset = two_rows();
        let spec = spec_for(&rowset, ColumnNaming::Positional);
        let sql = insert_data_sql(&spec, &rowset, true, QuoteEscape::Legacy, DeleteKey::default());
        assert_eq!(
            sql,
            "INSERT INTO \"s\".\"t\" (\"column_1\", \"column_2\") VALUES (1, 'A'), (2, 'B');"
        );
        assert!(!sql.contains("DELETE"));
    }

    #[test]
    fn sanitized_naming_deletes_by_first_label() {
        let rowset = two_rows();
        let spec = spec_for(&rowset, ColumnNaming::Sanitized);
        let sql = insert_data_sql(&spec, &rowset, false, QuoteEscape::Legacy, DeleteKey::default());
        let (insert, delete) = sql.split_once("\n\n").expect("two statements");
        assert!(insert.starts_with("INSERT INTO \"s\".\"t\" (\"Response ID\", \"Answer\")"));
        assert!(delete.starts_with("DELETE FROM \"s\".\"t\""));
        assert!(delete.contains("SELECT MAX(id)"));
        assert!(delete.contains("GROUP BY \"Response ID\""));
    }

    #[test]
    fn positional_delete_groups_by_sanitized_label_by_default() {
        let rowset = RowSet::new(
            vec!["Response ID?".to_string(), "A".to_string()],
            vec![vec![1.into(), "x".into()]],
        );
        let spec = spec_for(&rowset, ColumnNaming::Positional);
        let sql = insert_data_sql(&spec, &rowset, false, QuoteEscape::Legacy, DeleteKey::default());
        assert!(sql.starts_with("INSERT INTO \"s\".\"t\" (\"column_1\", \"column_2\")"));
        assert!(sql.contains("GROUP BY \"Response ID_\""));
    }

    #[test]
    fn identifier_key_targets_positional_column() {
        let rowset = two_rows();
        let spec = spec_for(&rowset, ColumnNaming::Positional);
        let sql = insert_data_sql(
            &spec,
            &rowset,
            false,
            QuoteEscape::Legacy,
            DeleteKey::Identifier,
        );
        assert!(sql.contains("GROUP BY \"column_1\""));
    }

    #[test]
    fn nulls_and_quotes_in_rows() {
        let rowset = RowSet::new(
            vec!["id".to_string(), "note".to_string()],
            vec![vec![CellValue::Null, "it's".into()]],
        );
        let spec = spec_for(&rowset, ColumnNaming::Positional);
        let legacy = insert_data_sql(
            &spec,
            &rowset,
            true,
            QuoteEscape::Legacy,
            DeleteKey::default(),
        );
        assert!(legacy.ends_with("VALUES (NULL, 'it\"s');"));
        let standard = insert_data_sql(
            &spec,
            &rowset,
            true,
            QuoteEscape::Standard,
            DeleteKey::default(),
        );
        assert!(standard.ends_with("VALUES (NULL, 'it''s');"));
    }

    #[test]
    fn delete_statement_layout() {
        let rowset = two_rows();
        let spec = spec_for(&rowset, ColumnNaming::Positional);
        let expected = "DELETE FROM \"s\".\"t\"\n\
                        WHERE id NOT IN\n\
                        (\n    \
                        SELECT MAX(id)\n    \
                        FROM \"s\".\"t\"\n    \
                        GROUP BY \"column_1\"\n\
                        );";
        assert_eq!(remove_duplicates_sql(&spec, "column_1"), expected);
    }
}
