use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::convert::{convert_to_webp, ConversionResult};
use crate::export::{write_exports, ExportPaths, ExportReport};
use crate::notify::Notifier;

pub const EMPTY_SELECTION_MESSAGE: &str = "No images selected.";

/// Ordered list of source images chosen by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: Vec<PathBuf>,
}

impl Selection {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Replace the whole selection
    pub fn replace(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.paths = paths.into_iter().collect();
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Reported after each image of a batch
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    pub completed: usize,
    pub total: usize,
    pub current: &'a Path,
    pub succeeded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionFailure {
    pub source: PathBuf,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successful conversions, in selection order
    pub converted: Vec<ConversionResult>,
    pub failures: Vec<ConversionFailure>,
    pub duration: Duration,
}

/// Result of a full process run
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: BatchOutcome,
    /// Empty when no image converted successfully
    pub exports: Vec<ExportReport>,
}

/// Convert every selected image, one at a time, in selection order
///
/// Failures are reported through `notifier` and left out of the batch.
pub fn process_selection<F>(
    selection: &Selection,
    output_dir: &Path,
    notifier: &mut dyn Notifier,
    mut on_progress: F,
) -> BatchOutcome
where
    F: FnMut(BatchProgress<'_>),
{
    let start = Instant::now();
    let total = selection.len();
    let mut outcome = BatchOutcome::default();

    for (index, source) in selection.paths().iter().enumerate() {
        let succeeded = match convert_to_webp(source, output_dir) {
            Ok(result) => {
                outcome.converted.push(result);
                true
            }
            Err(e) => {
                let error = format!("{:#}", e);
                notifier.error(&format!("Could not convert the image: {}", error));
                outcome.failures.push(ConversionFailure {
                    source: source.clone(),
                    error,
                });
                false
            }
        };

        on_progress(BatchProgress {
            completed: index + 1,
            total,
            current: source,
            succeeded,
        });
    }

    outcome.duration = start.elapsed();
    outcome
}

/// The "process" action: convert the selection, then write the three exports
///
/// An empty selection only produces a warning and returns `None`; no file is
/// touched. Exports are skipped when no image converted successfully.
pub fn process_and_export<F>(
    selection: &Selection,
    paths: &ExportPaths,
    date: NaiveDate,
    notifier: &mut dyn Notifier,
    on_progress: F,
) -> Option<RunSummary>
where
    F: FnMut(BatchProgress<'_>),
{
    if selection.is_empty() {
        notifier.warn(EMPTY_SELECTION_MESSAGE);
        return None;
    }

    let outcome = process_selection(selection, &paths.image_dir, notifier, on_progress);

    let exports = if outcome.converted.is_empty() {
        Vec::new()
    } else {
        write_exports(&outcome.converted, paths, date, notifier)
    };

    Some(RunSummary { outcome, exports })
}
