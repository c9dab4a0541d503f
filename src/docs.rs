use std::fmt::Write as _;

use crate::columns::ColumnMapping;

const HEADING: &str = "Table Columns Documentation";

pub fn column_documentation(mapping: &ColumnMapping) -> String {
    let mut doc = format!("{HEADING}\n\n");
    for column in mapping.descriptors() {
        let _ = writeln!(
            doc,
            "Column_{} ({}): {} [{}]",
            column.position, column.kind, column.label, column.identifier
        );
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        columns::{CollisionPolicy, ColumnNaming},
        rowset::RowSet,
        value::CellValue,
    };

    #[test]
    fn lists_each_column_with_original_label() {
        let rowset = RowSet::new(
            vec!["Response ID".to_string(), "Visited?".to_string()],
            vec![vec![1.into(), CellValue::from(true)]],
        );
        let mapping =
            ColumnMapping::build(&rowset, ColumnNaming::Positional, CollisionPolicy::Keep);
        let doc = column_documentation(&mapping);
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Table Columns Documentation",
                "",
                "Column_1 (INTEGER): Response ID [column_1]",
                "Column_2 (boolean): Visited? [column_2]",
            ]
        );
    }
}
