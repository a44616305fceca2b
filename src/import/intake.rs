use crate::import::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

/// Decides how to parse an upload. The declared media type is consulted
/// first; the filename extension is only a fallback for clients that send
/// a generic type. The extension is the last dot-separated segment of the
/// name, which for a name without dots is the whole name.
pub fn classify(filename: &str, content_type: &str) -> Result<FileKind, ImportError> {
    let media = content_type.to_ascii_lowercase();
    if media.contains("csv") {
        return Ok(FileKind::Csv);
    }
    if media.contains("sheet") || media.contains("excel") {
        return Ok(FileKind::Xlsx);
    }

    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Ok(FileKind::Csv),
        "xlsx" | "xls" => Ok(FileKind::Xlsx),
        _ => Err(ImportError::UnsupportedFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_media_type() {
        assert_eq!(classify("upload.bin", "text/csv").unwrap(), FileKind::Csv);
        assert_eq!(
            classify(
                "upload.bin",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            )
            .unwrap(),
            FileKind::Xlsx
        );
        assert_eq!(
            classify("upload.bin", "application/vnd.ms-excel").unwrap(),
            FileKind::Xlsx
        );
    }

    #[test]
    fn falls_back_to_extension() {
        assert_eq!(
            classify("employees.csv", "application/octet-stream").unwrap(),
            FileKind::Csv
        );
        assert_eq!(classify("employees.XLSX", "").unwrap(), FileKind::Xlsx);
        assert_eq!(classify("legacy.xls", "").unwrap(), FileKind::Xlsx);
    }

    #[test]
    fn media_type_wins_over_extension() {
        assert_eq!(
            classify("employees.csv", "application/vnd.ms-excel").unwrap(),
            FileKind::Xlsx
        );
        assert_eq!(
            classify("employees.xlsx", "text/csv").unwrap(),
            FileKind::Csv
        );
    }

    #[test]
    fn rejects_unknown_formats() {
        let err = classify("notes.txt", "text/plain").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Format tidak didukung. Pakai CSV atau XLSX."
        );
        assert!(classify("README", "").is_err());
    }
}
