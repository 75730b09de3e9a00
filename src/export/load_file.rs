//! Pipe-delimited load file (`.unl`)
//!
//! One record per line: `<base_name>|<converted_name>|<YYYY-MM-DD>|1`.
//! Delimiters, backslashes and line breaks inside a field are escaped with a
//! backslash, as bulk loaders of this format expect.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use super::{format_date, DEFAULT_FLAG};
use crate::image_processing::ConversionResult;

pub const DELIMITER: char = '|';

fn escape_field(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == DELIMITER || ch == '\\' || ch == '\n' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub fn render_load_file(batch: &[ConversionResult], date: NaiveDate) -> String {
    let date = format_date(date);
    let mut content = String::new();

    for entry in batch {
        content.push_str(&format!(
            "{base}{d}{img}{d}{date}{d}{flag}\n",
            base = escape_field(&entry.base_name),
            img = escape_field(&entry.converted_name),
            date = date,
            flag = DEFAULT_FLAG,
            d = DELIMITER,
        ));
    }

    content
}

/// Write the load file, returning the number of records
pub fn write_load_file(batch: &[ConversionResult], date: NaiveDate, path: &Path) -> Result<usize> {
    fs::write(path, render_load_file(batch, date))
        .with_context(|| format!("Failed to write load file: {}", path.display()))?;
    Ok(batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::{date, result};
    use tempfile::TempDir;

    #[test]
    fn test_render_records_in_batch_order() {
        let content = render_load_file(&[result("a"), result("b")], date());
        assert_eq!(content, "a|a.webp|2024-03-09|1\nb|b.webp|2024-03-09|1\n");
    }

    #[test]
    fn test_render_empty_batch() {
        assert_eq!(render_load_file(&[], date()), "");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain-name"), "plain-name");
        assert_eq!(escape_field("a|b"), "a\\|b");
        assert_eq!(escape_field("c:\\d"), "c:\\\\d");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let content = render_load_file(&[result("dup"), result("dup")], date());
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().all(|l| l == "dup|dup.webp|2024-03-09|1"));
    }

    #[test]
    fn test_write_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zimagenes.unl");
        fs::write(&path, "old|old.webp|2000-01-01|1\nstale\nstale\n").unwrap();

        let written = write_load_file(&[result("new")], date(), &path).unwrap();

        assert_eq!(written, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "new|new.webp|2024-03-09|1\n"
        );
    }
}
