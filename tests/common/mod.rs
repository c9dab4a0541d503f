#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

const SHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Creates (if needed) and returns a table folder under the workspace.
    pub fn table_dir(&self, table: &str) -> PathBuf {
        let dir = self.temp_dir.path().join(table);
        fs::create_dir_all(&dir).expect("create table dir");
        dir
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Blank,
}

pub fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

pub fn num(value: f64) -> Cell {
    Cell::Number(value)
}

/// Writes a single-sheet `.xlsx` workbook. The first row is the header.
pub fn write_xlsx(path: &Path, sheet: &str, rows: &[Vec<Cell>]) {
    write_workbook(path, &[(sheet, rows)]);
}

/// Writes a minimal `.xlsx` workbook with one worksheet per entry. Cells use
/// inline strings so neither a shared-string table nor a styles part is needed.
pub fn write_workbook(path: &Path, sheets: &[(&str, &[Vec<Cell>])]) {
    let file = File::create(path).expect("create xlsx");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut overrides = String::from(
        "<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
    );
    let mut sheet_entries = String::new();
    let mut relationships = String::new();
    for (idx, (name, _)) in sheets.iter().enumerate() {
        let n = idx + 1;
        overrides.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{n}.xml\" ContentType=\"{SHEET_CONTENT_TYPE}\"/>"
        ));
        sheet_entries.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{n}\" r:id=\"rId{n}\"/>",
            escape_xml(name)
        ));
        relationships.push_str(&format!(
            "<Relationship Id=\"rId{n}\" Type=\"{WORKSHEET_REL}\" Target=\"worksheets/sheet{n}.xml\"/>"
        ));
    }

    let header = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";
    let parts = [
        (
            "[Content_Types].xml".to_string(),
            format!(
                "{header}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
                 <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
                 <Default Extension=\"xml\" ContentType=\"application/xml\"/>{overrides}</Types>"
            ),
        ),
        (
            "_rels/.rels".to_string(),
            format!(
                "{header}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                 <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
                 </Relationships>"
            ),
        ),
        (
            "xl/workbook.xml".to_string(),
            format!(
                "{header}<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
                 xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
                 <sheets>{sheet_entries}</sheets></workbook>"
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                "{header}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                 {relationships}</Relationships>"
            ),
        ),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).expect("start part");
        zip.write_all(body.as_bytes()).expect("write part");
    }
    for (idx, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)
            .expect("start sheet");
        zip.write_all(sheet_xml(header, rows).as_bytes())
            .expect("write sheet");
    }
    zip.finish().expect("finish xlsx");
}

fn sheet_xml(header: &str, rows: &[Vec<Cell>]) -> String {
    let mut xml = format!(
        "{header}<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>"
    );
    for (row_idx, row) in rows.iter().enumerate() {
        let r = row_idx + 1;
        xml.push_str(&format!("<row r=\"{r}\">"));
        for (col_idx, cell) in row.iter().enumerate() {
            let reference = format!("{}{r}", column_letters(col_idx));
            match cell {
                Cell::Text(value) => xml.push_str(&format!(
                    "<c r=\"{reference}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                    escape_xml(value)
                )),
                Cell::Number(value) => {
                    xml.push_str(&format!("<c r=\"{reference}\"><v>{value}</v></c>"))
                }
                Cell::Bool(value) => xml.push_str(&format!(
                    "<c r=\"{reference}\" t=\"b\"><v>{}</v></c>",
                    u8::from(*value)
                )),
                Cell::Blank => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
