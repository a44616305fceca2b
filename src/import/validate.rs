//! Row validation and normalization for employee uploads.

use std::sync::LazyLock;

use regex::Regex;

use crate::import::RawRow;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid regex"));

/// A clean employee row ready to be written to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub full_name: String,
    pub email: String,
    pub nik: Option<String>,
    pub employment_status: String,
    pub is_active: bool,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lenient boolean used for the is_active column. A missing or empty value
/// means active; anything else is matched against the usual spellings of
/// true.
pub fn parse_bool(value: Option<&str>) -> bool {
    let Some(raw) = value else {
        return true;
    };
    if raw.is_empty() {
        return true;
    }
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

fn field<'a>(row: &'a RawRow, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

/// Validates and normalizes parsed rows in one pass.
///
/// Every row is checked even after the first failure so the caller gets the
/// complete error list. Messages carry the spreadsheet line number: data
/// starts at line 2, right under the header.
pub fn validate_rows(raw: &[RawRow]) -> Result<Vec<EmployeeRecord>, Vec<String>> {
    let mut records = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for (index, row) in raw.iter().enumerate() {
        let line = index + 2;

        let full_name = field(row, "full_name").trim().to_string();
        let email = field(row, "email").trim().to_lowercase();
        let nik = Some(field(row, "nik").trim().to_string()).filter(|value| !value.is_empty());
        let employment_status = match field(row, "employment_status").trim() {
            "" => "permanent".to_string(),
            value => value.to_string(),
        };
        let is_active = parse_bool(row.get("is_active").map(String::as_str));

        if full_name.is_empty() {
            errors.push(format!("Baris {line}: full_name kosong"));
        }
        if email.is_empty() || !is_valid_email(&email) {
            errors.push(format!("Baris {line}: email tidak valid"));
        }

        records.push(EmployeeRecord {
            full_name,
            email,
            nik,
            employment_status,
            is_active,
        });
    }

    if errors.is_empty() {
        Ok(records)
    } else {
        Err(errors)
    }
}
