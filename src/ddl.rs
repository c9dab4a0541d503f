//! `CREATE TABLE` generation plus the surrogate `id` key.

use itertools::Itertools;

use crate::columns::{TableSpec, quote_ident};

pub const SURROGATE_KEY: &str = "id";

pub fn create_table_sql(spec: &TableSpec) -> String {
    let columns_sql = spec
        .columns
        .descriptors()
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                quote_ident(&column.identifier),
                column.kind.sql_type()
            )
        })
        .join(", ");
    format!(
        "CREATE TABLE {} ({columns_sql});\n\n{}",
        spec.qualified_name(),
        alter_table_sql(spec)
    )
}

pub fn alter_table_sql(spec: &TableSpec) -> String {
    let table = spec.qualified_name();
    format!(
        "ALTER TABLE {table} ADD {SURROGATE_KEY} SERIAL;\n\
         ALTER TABLE {table} ADD PRIMARY KEY ({SURROGATE_KEY});"
    )
}
