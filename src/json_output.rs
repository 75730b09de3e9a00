//! JSON output for wrapping tools
//!
//! When --json-progress is enabled, progress, per-file results, export
//! results and the final summary are emitted as JSON lines to stdout,
//! replacing all other output.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::export::ExportReport;
use crate::image_processing::{ConversionFailure, ConversionResult};
use crate::notify::{Notice, Notifier, Severity};

/// Last progress emission timestamp (milliseconds since epoch)
/// Used for throttling progress updates to ~25 FPS (40ms between updates)
static LAST_PROGRESS_MS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    FileCompleted {
        input_path: String,
        output_path: String,
        base_name: String,
        converted_name: String,
    },
    FileFailed {
        input_path: String,
        error: String,
    },
    ExportWritten {
        export: String,
        path: String,
        records: usize,
    },
    ExportFailed {
        export: String,
        path: String,
        error: String,
    },
    Notice {
        severity: String,
        message: String,
    },
    Summary {
        total_files: usize,
        converted: usize,
        failed: usize,
        exports_written: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Create and emit progress message, throttled to one every 40ms
    ///
    /// The final progress (current == total) is always emitted.
    pub fn progress(current: usize, total: usize, message: impl Into<String>) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let last_ms = LAST_PROGRESS_MS.load(Ordering::Relaxed);

        if now_ms.saturating_sub(last_ms) >= 40 || current == total {
            LAST_PROGRESS_MS.store(now_ms, Ordering::Relaxed);
            Self::Progress {
                current,
                total,
                message: message.into(),
            }
            .emit();
        }
    }

    pub fn file_completed(result: &ConversionResult) -> Self {
        Self::FileCompleted {
            input_path: result.source_path.display().to_string(),
            output_path: result.output_path.display().to_string(),
            base_name: result.base_name.clone(),
            converted_name: result.converted_name.clone(),
        }
    }

    pub fn file_failed(failure: &ConversionFailure) -> Self {
        Self::FileFailed {
            input_path: failure.source.display().to_string(),
            error: failure.error.clone(),
        }
    }

    pub fn export(report: &ExportReport) -> Self {
        let path = report.path.display().to_string();
        let export = report.kind.label().to_string();
        match &report.outcome {
            Ok(records) => Self::ExportWritten {
                export,
                path,
                records: *records,
            },
            Err(error) => Self::ExportFailed {
                export,
                path,
                error: error.clone(),
            },
        }
    }

    pub fn summary(
        total_files: usize,
        converted: usize,
        failed: usize,
        exports_written: usize,
        duration_secs: f64,
    ) {
        Self::Summary {
            total_files,
            converted,
            failed,
            exports_written,
            duration_secs,
        }
        .emit();
    }
}

/// Emits warnings as JSON notice lines
///
/// Conversion and export results are emitted separately as typed messages,
/// so only warnings are forwarded here.
#[derive(Default)]
pub struct JsonNotifier;

impl Notifier for JsonNotifier {
    fn notify(&mut self, notice: Notice) {
        if notice.severity == Severity::Warning {
            JsonMessage::Notice {
                severity: "warning".to_string(),
                message: notice.message,
            }
            .emit();
        }
    }
}
