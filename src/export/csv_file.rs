//! Single-column CSV with the converted file names, no header row

use anyhow::{Context, Result};
use std::path::Path;

use crate::image_processing::ConversionResult;

/// Write one row per converted image, returning the number of rows
pub fn write_csv_file(batch: &[ConversionResult], path: &Path) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    for entry in batch {
        writer
            .write_record([entry.converted_name.as_str()])
            .with_context(|| format!("Failed to write CSV row for {}", entry.converted_name))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;

    Ok(batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::result;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rows_in_batch_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zimagenes.csv");

        let written = write_csv_file(&[result("a"), result("b")], &path).unwrap();

        assert_eq!(written, 2);
        assert_eq!(fs::read(&path).unwrap(), b"a.webp\r\nb.webp\r\n");
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zimagenes.csv");

        write_csv_file(&[result("red, large"), result("say \"hi\"")], &path).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(rows, vec!["red, large.webp", "say \"hi\".webp"]);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("\"red, large.webp\""));
    }

    #[test]
    fn test_empty_batch_truncates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zimagenes.csv");
        fs::write(&path, "old.webp\r\n").unwrap();

        assert_eq!(write_csv_file(&[], &path).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
