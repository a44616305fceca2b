//! Bulk employee import: CSV/XLSX intake, parsing, validation, and the
//! upsert-by-email reconciliation against the directory.
//!
//! Validation is all-or-nothing: a single bad row rejects the whole file
//! with the full error list. Persistence is the opposite: once rows are
//! valid, each one succeeds or fails on its own and the summary reports
//! how many went each way.

pub mod intake;
pub mod parse;
pub mod validate;

pub use intake::{classify, FileKind};
pub use parse::{parse_delimited, parse_workbook, RawRow};
pub use validate::{is_valid_email, parse_bool, validate_rows, EmployeeRecord};

use bytes::Bytes;
use uuid::Uuid;

/// One multipart upload, as received from the request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Format tidak didukung. Pakai CSV atau XLSX.")]
    UnsupportedFormat,

    #[error("File tidak bisa dibaca: {0}")]
    Spreadsheet(String),

    #[error("Validasi gagal")]
    Validation(Vec<String>),
}

/// Outcome counters for one import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub inserted: u32,
    pub updated: u32,
    pub failed: u32,
}

/// Persistence seam for the reconciler. The directory's pool implements
/// this; tests use an in-memory store.
#[async_trait::async_trait]
pub trait ImportStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Uuid>>;
    async fn insert(&self, record: &EmployeeRecord) -> anyhow::Result<()>;
    async fn update(&self, id: Uuid, record: &EmployeeRecord) -> anyhow::Result<()>;
}

/// Runs the whole pipeline on an upload: classify, parse, validate, then
/// reconcile row by row.
pub async fn run_import<S>(store: &S, file: &UploadedFile) -> Result<ImportSummary, ImportError>
where
    S: ImportStore + Sync,
{
    let raw = match classify(&file.filename, &file.content_type)? {
        FileKind::Csv => parse_delimited(&String::from_utf8_lossy(&file.bytes)),
        FileKind::Xlsx => parse_workbook(&file.bytes)?,
    };

    let records = validate_rows(&raw).map_err(ImportError::Validation)?;

    tracing::debug!(rows = records.len(), file = %file.filename, "import validated");

    Ok(reconcile(store, &records).await)
}

/// Applies validated rows in file order. Each row is looked up by email and
/// either updated in place or inserted. A row that fails any step is
/// counted and skipped; later rows still run, so a duplicate email within
/// one file ends up with the last row's values.
pub async fn reconcile<S>(store: &S, records: &[EmployeeRecord]) -> ImportSummary
where
    S: ImportStore + Sync,
{
    let mut summary = ImportSummary::default();

    for record in records {
        let existing = match store.find_by_email(&record.email).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(email = %record.email, error = %err, "import lookup failed");
                summary.failed += 1;
                continue;
            }
        };

        match existing {
            Some(id) => match store.update(id, record).await {
                Ok(()) => summary.updated += 1,
                Err(err) => {
                    tracing::warn!(email = %record.email, error = %err, "import update failed");
                    summary.failed += 1;
                }
            },
            None => match store.insert(record).await {
                Ok(()) => summary.inserted += 1,
                Err(err) => {
                    tracing::warn!(email = %record.email, error = %err, "import insert failed");
                    summary.failed += 1;
                }
            },
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory directory. `fail_for` makes every write or lookup for that
    /// email return an error, to exercise per-row isolation.
    #[derive(Default)]
    struct MemStore {
        rows: Mutex<Vec<(Uuid, EmployeeRecord)>>,
        fail_for: Option<String>,
    }

    impl MemStore {
        fn failing_on(email: &str) -> Self {
            MemStore {
                rows: Mutex::new(Vec::new()),
                fail_for: Some(email.to_string()),
            }
        }

        fn snapshot(&self) -> Vec<EmployeeRecord> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .map(|(_, record)| record.clone())
                .collect()
        }

        fn check(&self, email: &str) -> anyhow::Result<()> {
            if self.fail_for.as_deref() == Some(email) {
                anyhow::bail!("simulated store failure");
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl ImportStore for MemStore {
        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Uuid>> {
            self.check(email)?;
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|(_, record)| record.email == email)
                .map(|(id, _)| *id))
        }

        async fn insert(&self, record: &EmployeeRecord) -> anyhow::Result<()> {
            self.check(&record.email)?;
            self.rows
                .lock()
                .unwrap()
                .push((Uuid::new_v4(), record.clone()));
            Ok(())
        }

        async fn update(&self, id: Uuid, record: &EmployeeRecord) -> anyhow::Result<()> {
            self.check(&record.email)?;
            let mut rows = self.rows.lock().unwrap();
            let slot = rows
                .iter_mut()
                .find(|(row_id, _)| *row_id == id)
                .ok_or_else(|| anyhow::anyhow!("no such row"))?;
            let email = slot.1.email.clone();
            slot.1 = record.clone();
            slot.1.email = email;
            Ok(())
        }
    }

    fn csv_upload(body: &str) -> UploadedFile {
        UploadedFile {
            filename: "employees.csv".to_string(),
            content_type: "text/csv".to_string(),
            bytes: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn csv_import_inserts_new_rows() {
        let store = MemStore::default();
        let file = csv_upload(
            "full_name,email,nik,employment_status,is_active\n\
             Budi Santoso,Budi@Acme.com,1234567890,permanent,true\n\
             Siti Aminah,siti@acme.com,,contract,true\n",
        );

        let summary = run_import(&store, &file).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 2,
                updated: 0,
                failed: 0
            }
        );

        let rows = store.snapshot();
        assert_eq!(rows[0].email, "budi@acme.com");
        assert_eq!(rows[1].nik, None);
        assert_eq!(rows[1].employment_status, "contract");
    }

    #[tokio::test]
    async fn reimport_updates_by_email() {
        let store = MemStore::default();
        let first = csv_upload(
            "full_name,email\n\
             Budi Santoso,budi@acme.com\n\
             Siti Aminah,siti@acme.com\n",
        );
        run_import(&store, &first).await.unwrap();

        let second = csv_upload(
            "full_name,email,employment_status\n\
             Budi S.,budi@acme.com,contract\n\
             Siti Aminah,siti@acme.com,permanent\n",
        );
        let summary = run_import(&store, &second).await.unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                inserted: 0,
                updated: 2,
                failed: 0
            }
        );

        let rows = store.snapshot();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].full_name, "Budi S.");
        assert_eq!(rows[0].employment_status, "contract");
    }

    #[tokio::test]
    async fn duplicate_email_in_one_file_keeps_the_last_row() {
        let store = MemStore::default();
        let file = csv_upload(
            "full_name,email\n\
             First Version,dup@acme.com\n\
             Second Version,dup@acme.com\n",
        );

        let summary = run_import(&store, &file).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 1,
                updated: 1,
                failed: 0
            }
        );

        let rows = store.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].full_name, "Second Version");
    }

    #[tokio::test]
    async fn row_failure_does_not_stop_the_rest() {
        let store = MemStore::failing_on("broken@acme.com");
        let file = csv_upload(
            "full_name,email\n\
             Ok One,one@acme.com\n\
             Broken,broken@acme.com\n\
             Ok Two,two@acme.com\n",
        );

        let summary = run_import(&store, &file).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                inserted: 2,
                updated: 0,
                failed: 1
            }
        );
        assert_eq!(summary.inserted + summary.updated + summary.failed, 3);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn validation_failure_writes_nothing() {
        let store = MemStore::default();
        let file = csv_upload(
            "full_name,email\n\
             Budi,budi@acme.com\n\
             ,not-an-email\n",
        );

        let err = run_import(&store, &file).await.unwrap_err();
        match err {
            ImportError::Validation(details) => {
                assert_eq!(
                    details,
                    vec![
                        "Baris 3: full_name kosong".to_string(),
                        "Baris 3: email tidak valid".to_string(),
                    ]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected() {
        let store = MemStore::default();
        let file = UploadedFile {
            filename: "notes.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: Bytes::from_static(b"hello"),
        };

        let err = run_import(&store, &file).await.unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat));
    }

    #[tokio::test]
    async fn workbook_upload_goes_through_the_same_pipeline() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "full_name").unwrap();
        sheet.write_string(0, 1, "email").unwrap();
        sheet.write_string(0, 2, "is_active").unwrap();
        sheet.write_string(1, 0, "Budi Santoso").unwrap();
        sheet.write_string(1, 1, "budi@acme.com").unwrap();
        sheet.write_boolean(1, 2, false).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let store = MemStore::default();
        let file = UploadedFile {
            filename: "employees.xlsx".to_string(),
            content_type:
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            bytes: Bytes::from(bytes),
        };

        let summary = run_import(&store, &file).await.unwrap();
        assert_eq!(summary.inserted, 1);

        let rows = store.snapshot();
        assert!(!rows[0].is_active);
    }
}
