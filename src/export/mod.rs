//! Flat-file exports describing a converted batch
//!
//! Three independent writers consume the same batch: a pipe-delimited load
//! file, a single-column CSV and a SQL script for the `img_product` table.
//! Each one fully overwrites its target; a failure in one never stops the
//! others.

pub mod csv_file;
pub mod load_file;
pub mod sql_file;

use anyhow::Result;
use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::image_processing::ConversionResult;
use crate::notify::Notifier;

pub const WEBP_DIR: &str = "imagenes_webp";
pub const LOAD_FILE: &str = "zimagenes.unl";
pub const CSV_FILE: &str = "zimagenes.csv";
pub const SQL_FILE: &str = "zimagenes.sql";

/// Marks every exported image as the default one for its product
pub const DEFAULT_FLAG: u8 = 1;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Where converted images and the three export files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub image_dir: PathBuf,
    pub load_file: PathBuf,
    pub csv_file: PathBuf,
    pub sql_file: PathBuf,
}

impl Default for ExportPaths {
    /// Fixed locations relative to the working directory
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(WEBP_DIR),
            load_file: PathBuf::from(LOAD_FILE),
            csv_file: PathBuf::from(CSV_FILE),
            sql_file: PathBuf::from(SQL_FILE),
        }
    }
}

impl ExportPaths {
    /// Same fixed names, placed under `root`
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            image_dir: root.join(WEBP_DIR),
            load_file: root.join(LOAD_FILE),
            csv_file: root.join(CSV_FILE),
            sql_file: root.join(SQL_FILE),
        }
    }

    pub fn export_path(&self, kind: ExportKind) -> &Path {
        match kind {
            ExportKind::LoadFile => &self.load_file,
            ExportKind::Csv => &self.csv_file,
            ExportKind::Sql => &self.sql_file,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    LoadFile,
    Csv,
    Sql,
}

impl ExportKind {
    /// Writers run in this order
    pub const ALL: [ExportKind; 3] = [ExportKind::LoadFile, ExportKind::Csv, ExportKind::Sql];

    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::LoadFile => ".unl",
            ExportKind::Csv => ".csv",
            ExportKind::Sql => ".sql",
        }
    }

    fn write(&self, batch: &[ConversionResult], date: NaiveDate, path: &Path) -> Result<usize> {
        match self {
            ExportKind::LoadFile => load_file::write_load_file(batch, date, path),
            ExportKind::Csv => csv_file::write_csv_file(batch, path),
            ExportKind::Sql => sql_file::write_sql_file(batch, date, path),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one writer
#[derive(Debug)]
pub struct ExportReport {
    pub kind: ExportKind,
    pub path: PathBuf,
    /// Records written, or the error message
    pub outcome: std::result::Result<usize, String>,
}

impl ExportReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run the load-file, CSV and SQL writers in that order
///
/// Every writer reports its own success or failure through `notifier`.
pub fn write_exports(
    batch: &[ConversionResult],
    paths: &ExportPaths,
    date: NaiveDate,
    notifier: &mut dyn Notifier,
) -> Vec<ExportReport> {
    ExportKind::ALL
        .iter()
        .map(|&kind| {
            let path = paths.export_path(kind).to_path_buf();
            let outcome = match kind.write(batch, date, &path) {
                Ok(records) => {
                    notifier.info(&format!(
                        "{} file created successfully: {}",
                        kind,
                        path.display()
                    ));
                    Ok(records)
                }
                Err(e) => {
                    let message = format!("Could not create the {} file: {:#}", kind, e);
                    notifier.error(&message);
                    Err(message)
                }
            };

            ExportReport {
                kind,
                path,
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn result(base_name: &str) -> ConversionResult {
        let converted_name = format!("{}.webp", base_name);
        ConversionResult {
            source_path: PathBuf::from(format!("{}.png", base_name)),
            base_name: base_name.to_string(),
            output_path: PathBuf::from(WEBP_DIR).join(&converted_name),
            converted_name,
        }
    }

    pub fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{date, result};
    use super::*;
    use crate::notify::{NoticeLog, Severity};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths_are_relative() {
        let paths = ExportPaths::default();
        assert_eq!(paths.image_dir, PathBuf::from("imagenes_webp"));
        assert_eq!(paths.load_file, PathBuf::from("zimagenes.unl"));
        assert_eq!(paths.csv_file, PathBuf::from("zimagenes.csv"));
        assert_eq!(paths.sql_file, PathBuf::from("zimagenes.sql"));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date()), "2024-03-09");
    }

    #[test]
    fn test_write_exports_record_counts() {
        let dir = TempDir::new().unwrap();
        let paths = ExportPaths::rooted_at(dir.path());
        let batch = vec![result("a"), result("b"), result("c")];
        let mut log = NoticeLog::default();

        let reports = write_exports(&batch, &paths, date(), &mut log);

        let kinds: Vec<ExportKind> = reports.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, ExportKind::ALL.to_vec());
        assert!(reports.iter().all(|r| r.outcome == Ok(3)));
        assert_eq!(log.count(Severity::Info), 3);

        let unl = fs::read_to_string(&paths.load_file).unwrap();
        assert_eq!(unl.lines().count(), 3);
        let csv = fs::read_to_string(&paths.csv_file).unwrap();
        assert_eq!(csv.lines().count(), 3);
        let sql = fs::read_to_string(&paths.sql_file).unwrap();
        assert_eq!(sql.matches("INSERT INTO").count(), 3);
    }

    #[test]
    fn test_failed_writer_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let paths = ExportPaths::rooted_at(dir.path());
        // A directory in place of the CSV file makes that writer fail
        fs::create_dir_all(&paths.csv_file).unwrap();
        let mut log = NoticeLog::default();

        let reports = write_exports(&[result("a")], &paths, date(), &mut log);

        assert!(reports[0].is_ok());
        assert!(!reports[1].is_ok());
        assert!(reports[2].is_ok());
        assert_eq!(log.count(Severity::Error), 1);
        assert_eq!(log.count(Severity::Info), 2);
        assert!(paths.load_file.is_file());
        assert!(paths.sql_file.is_file());
    }

    #[test]
    fn test_rerun_is_deterministic_for_same_date() {
        let dir = TempDir::new().unwrap();
        let paths = ExportPaths::rooted_at(dir.path());
        let batch = vec![result("x"), result("y")];

        write_exports(&batch, &paths, date(), &mut NoticeLog::default());
        let first: Vec<Vec<u8>> = ExportKind::ALL
            .iter()
            .map(|&k| fs::read(paths.export_path(k)).unwrap())
            .collect();

        write_exports(&batch, &paths, date(), &mut NoticeLog::default());
        let second: Vec<Vec<u8>> = ExportKind::ALL
            .iter()
            .map(|&k| fs::read(paths.export_path(k)).unwrap())
            .collect();

        assert_eq!(first, second);
    }
}
