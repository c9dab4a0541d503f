use std::fmt::Write as _;

/// Renders rows as a left-aligned plain-text table with a dashed rule under
/// the header. Embedded line breaks and tabs are flattened to spaces.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let headers = headers.iter().map(|h| flatten(h)).collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| {
            row.iter()
                .take(headers.len())
                .map(|cell| flatten(cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(1))
        .collect::<Vec<_>>();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", join_padded(&headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", join_padded(&rule, &widths));
    for row in &rows {
        let _ = writeln!(output, "{}", join_padded(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn flatten(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
