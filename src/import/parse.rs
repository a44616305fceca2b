//! Upload parsers. Both turn the file into header-keyed string maps so the
//! validation step can treat CSV and spreadsheet uploads identically.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::import::ImportError;

/// One data row keyed by its lowercased header.
pub type RawRow = HashMap<String, String>;

/// Splits delimited text into rows. The first line is the header; header
/// cells are trimmed and lowercased, values are trimmed. Blank lines are
/// skipped and short rows are padded with empty strings. Commas are plain
/// separators here: quoted fields are not interpreted, so values containing
/// commas will be split.
pub fn parse_delimited(text: &str) -> Vec<RawRow> {
    let mut lines = text
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    let header: Vec<String> = lines
        .next()
        .unwrap_or("")
        .split(',')
        .map(|cell| cell.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split(',').collect();
        let mut row = RawRow::new();
        for (index, key) in header.iter().enumerate() {
            let value = cols.get(index).copied().unwrap_or("");
            row.insert(key.clone(), value.trim().to_string());
        }
        rows.push(row);
    }

    rows
}

/// Reads the first worksheet of an XLSX/XLS workbook into rows, using the
/// first sheet row as the header. Rows whose cells are all empty are
/// skipped, matching the delimited parser's handling of blank lines.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| ImportError::Spreadsheet(err.to_string()))?;

    let sheet_name = match workbook.sheet_names().first() {
        Some(name) => name.clone(),
        None => return Ok(Vec::new()),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| ImportError::Spreadsheet(err.to_string()))?;

    let mut sheet_rows = range.rows();
    let header: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| render_cell(cell).trim().to_lowercase())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let mut row = RawRow::new();
        for (index, key) in header.iter().enumerate() {
            let value = cells
                .get(index)
                .map(render_cell)
                .unwrap_or_default();
            row.insert(key.clone(), value.trim().to_string());
        }

        if row.values().all(|value| value.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Renders a cell the way a spreadsheet user typed it: whole numbers
/// without a decimal point, booleans as true/false.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                format!("{}", *value as i64)
            } else {
                value.to_string()
            }
        }
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value.as_f64().to_string(),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, cells) in rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn delimited_header_is_normalized() {
        let rows = parse_delimited(" Full_Name , EMAIL \nBudi,budi@acme.com\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["full_name"], "Budi");
        assert_eq!(rows[0]["email"], "budi@acme.com");
    }

    #[test]
    fn delimited_pads_short_rows() {
        let rows = parse_delimited("full_name,email,nik\nBudi,budi@acme.com");
        assert_eq!(rows[0]["nik"], "");
    }

    #[test]
    fn delimited_drops_extra_columns() {
        let rows = parse_delimited("full_name,email\nBudi,budi@acme.com,extra,more");
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn delimited_skips_blank_lines() {
        let rows = parse_delimited("full_name,email\n\n  \nBudi,budi@acme.com\n\n");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn delimited_handles_crlf() {
        let rows = parse_delimited("full_name,email\r\nBudi,budi@acme.com\r\nSiti,siti@acme.com\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["full_name"], "Siti");
    }

    #[test]
    fn delimited_empty_input_yields_no_rows() {
        assert!(parse_delimited("").is_empty());
        assert!(parse_delimited("full_name,email\n").is_empty());
    }

    #[test]
    fn delimited_does_not_interpret_quotes() {
        let rows = parse_delimited("full_name,email\n\"Budi, Jr\",budi@acme.com");
        assert_eq!(rows[0]["full_name"], "\"Budi");
        assert_eq!(rows[0]["email"], "Jr\"");
    }

    #[test]
    fn workbook_rows_keyed_by_lowercased_header() {
        let bytes = workbook_bytes(&[
            &["Full_Name", "Email"],
            &["Budi Santoso", "budi@acme.com"],
        ]);
        let rows = parse_workbook(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["full_name"], "Budi Santoso");
        assert_eq!(rows[0]["email"], "budi@acme.com");
    }

    #[test]
    fn workbook_skips_empty_rows() {
        let bytes = workbook_bytes(&[
            &["full_name", "email"],
            &["", ""],
            &["Siti", "siti@acme.com"],
        ]);
        let rows = parse_workbook(&bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["full_name"], "Siti");
    }

    #[test]
    fn workbook_numeric_cells_render_without_decimal_point() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "nik").unwrap();
        sheet.write_number(1, 0, 1234567890.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = parse_workbook(&bytes).unwrap();
        assert_eq!(rows[0]["nik"], "1234567890");
    }

    #[test]
    fn workbook_boolean_cells_render_as_words() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "is_active").unwrap();
        sheet.write_boolean(1, 0, true).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = parse_workbook(&bytes).unwrap();
        assert_eq!(rows[0]["is_active"], "true");
    }

    #[test]
    fn workbook_without_data_rows_is_empty() {
        let bytes = workbook_bytes(&[&["full_name", "email"]]);
        assert!(parse_workbook(&bytes).unwrap().is_empty());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = parse_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, ImportError::Spreadsheet(_)));
    }
}
