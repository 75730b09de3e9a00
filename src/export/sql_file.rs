//! SQL script reloading the `img_product` table
//!
//! The script replaces the whole table content inside one transaction with
//! triggers disabled. Values are emitted as escaped string literals.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use super::{format_date, DEFAULT_FLAG};
use crate::image_processing::ConversionResult;

pub const TABLE: &str = "img_product";

pub const PREAMBLE: &str = "--
BEGIN WORK;
--SET client_encoding=LATIN1;
SET client_encoding=UTF8;
SET datestyle = 'ISO,DMY';
ALTER TABLE img_product DISABLE TRIGGER ALL;
DELETE FROM img_product;
";

pub const POSTAMBLE: &str = "ALTER TABLE img_product ENABLE TRIGGER ALL;
COMMIT;
";

/// Quote a value as a SQL string literal
///
/// Single quotes are doubled and NUL characters removed.
pub fn sql_literal(value: &str) -> String {
    let escaped: String = value
        .chars()
        .filter(|&c| c != '\0')
        .collect::<String>()
        .replace('\'', "''");
    format!("'{}'", escaped)
}

pub fn insert_statement(entry: &ConversionResult, date: &str) -> String {
    format!(
        "INSERT INTO {} (cod_producto, img, fecha_actualizacion, predet) VALUES ({}, {}, {}, {});",
        TABLE,
        sql_literal(&entry.base_name),
        sql_literal(&entry.converted_name),
        sql_literal(date),
        DEFAULT_FLAG
    )
}

pub fn render_sql_file(batch: &[ConversionResult], date: NaiveDate) -> String {
    let date = format_date(date);
    let mut content = String::from(PREAMBLE);

    for entry in batch {
        content.push_str(&insert_statement(entry, &date));
        content.push('\n');
    }

    content.push_str(POSTAMBLE);
    content
}

/// Write the SQL script, returning the number of INSERT statements
pub fn write_sql_file(batch: &[ConversionResult], date: NaiveDate, path: &Path) -> Result<usize> {
    fs::write(path, render_sql_file(batch, date))
        .with_context(|| format!("Failed to write SQL file: {}", path.display()))?;
    Ok(batch.len())
}
