//! Directory exports and the import template, as CSV or XLSX documents.

use rust_xlsxwriter::Workbook;

use crate::models::Employee;

pub const EXPORT_HEADER: [&str; 6] = [
    "full_name",
    "email",
    "nik",
    "employment_status",
    "is_active",
    "created_at",
];

/// Starter file for the bulk import, one row per supported column shape.
pub const TEMPLATE_CSV: &str = "full_name,email,nik,employment_status,is_active\n\
    Budi Santoso,budi@acme.com,1234567890,permanent,true\n\
    Siti Aminah,siti@acme.com,,contract,true\n";

const TEMPLATE_ROWS: [[&str; 5]; 3] = [
    ["full_name", "email", "nik", "employment_status", "is_active"],
    ["Budi Santoso", "budi@acme.com", "1234567890", "permanent", "true"],
    ["Siti Aminah", "siti@acme.com", "", "contract", "true"],
];

pub const SHEET_NAME: &str = "Employees";

pub fn employees_csv(rows: &[Employee]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for row in rows {
        let created_at = row.created_at.to_rfc3339();
        writer.write_record([
            row.full_name.as_str(),
            row.email.as_str(),
            row.nik.as_deref().unwrap_or(""),
            row.employment_status.as_str(),
            if row.is_active { "true" } else { "false" },
            created_at.as_str(),
        ])?;
    }

    Ok(writer.into_inner()?)
}

pub fn employees_xlsx(rows: &[Employee]) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in EXPORT_HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }

    for (index, employee) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, &employee.full_name)?;
        sheet.write_string(row, 1, &employee.email)?;
        if let Some(nik) = &employee.nik {
            sheet.write_string(row, 2, nik)?;
        }
        sheet.write_string(row, 3, &employee.employment_status)?;
        sheet.write_boolean(row, 4, employee.is_active)?;
        sheet.write_string(row, 5, employee.created_at.to_rfc3339())?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn template_xlsx() -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (row, cells) in TEMPLATE_ROWS.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string(row as u32, col as u16, *value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
