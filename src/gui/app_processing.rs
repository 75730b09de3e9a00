// Processing implementation for the GUI
// The batch runs sequentially on a background thread and reports back over a channel

use super::{ImageExporterApp, ProgressMessage};
use chrono::Local;
use product_image_exporter::image_processing::{process_and_export, EMPTY_SELECTION_MESSAGE};
use product_image_exporter::notify::{Notice, Notifier, Severity};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Forwards notices from the worker thread to the UI thread
struct ChannelNotifier {
    tx: Sender<ProgressMessage>,
}

impl Notifier for ChannelNotifier {
    fn notify(&mut self, notice: Notice) {
        let _ = self.tx.send(ProgressMessage::Notice(notice));
    }
}

impl ImageExporterApp {
    pub fn start_processing(&mut self) {
        if self.selection.is_empty() {
            self.push_notice(Notice::new(Severity::Warning, EMPTY_SELECTION_MESSAGE));
            return;
        }

        // Clear previous state
        self.is_processing = true;
        self.progress = 0.0;
        self.processed_count = 0;
        self.total_count = self.selection.len();
        self.current_file.clear();
        self.results_message.clear();
        self.info_messages.clear();

        // Create channel for progress updates
        let (tx, rx) = channel();
        self.progress_receiver = Some(rx);

        let selection = self.selection.clone();
        let paths = self.export_paths.clone();

        std::thread::spawn(move || {
            let date = Local::now().date_naive();
            let mut notifier = ChannelNotifier { tx: tx.clone() };

            let summary = process_and_export(&selection, &paths, date, &mut notifier, |p| {
                let _ = tx.send(ProgressMessage::Progress {
                    current: p.completed,
                    total: p.total,
                    file: p.current.display().to_string(),
                });
            });

            let (converted, failed, exports_written) = match summary {
                Some(summary) => (
                    summary.outcome.converted.len(),
                    summary.outcome.failures.len(),
                    summary.exports.iter().filter(|r| r.is_ok()).count(),
                ),
                None => (0, 0, 0),
            };

            let _ = tx.send(ProgressMessage::Complete {
                converted,
                failed,
                exports_written,
            });
        });
    }

    /// Check for progress updates from the background thread
    pub fn check_progress(&mut self) {
        let (messages, disconnected) = match self.progress_receiver {
            Some(ref receiver) => drain(receiver),
            None => return,
        };

        let mut should_clear_receiver = false;
        for msg in messages {
            match msg {
                ProgressMessage::Progress {
                    current,
                    total,
                    file,
                } => {
                    self.processed_count = current;
                    self.total_count = total;
                    self.current_file = file;
                    if total > 0 {
                        self.progress = current as f32 / total as f32;
                    }
                }
                ProgressMessage::Notice(notice) => self.push_notice(notice),
                ProgressMessage::Complete {
                    converted,
                    failed,
                    exports_written,
                } => {
                    self.is_processing = false;
                    self.results_message = if failed == 0 {
                        format!(
                            "✓ Converted {} images, {} export files written",
                            converted, exports_written
                        )
                    } else {
                        format!(
                            "Converted {} images ({} failed), {} export files written",
                            converted, failed, exports_written
                        )
                    };
                    should_clear_receiver = true;
                }
            }
        }

        // Worker hung up without sending Complete, most likely a panic
        if disconnected && !should_clear_receiver {
            self.is_processing = false;
            self.results_message = "Processing stopped unexpectedly".to_string();
            self.push_notice(Notice::new(
                Severity::Error,
                "Processing stopped unexpectedly before finishing",
            ));
            should_clear_receiver = true;
        }

        if should_clear_receiver {
            self.progress_receiver = None;
        }
    }
}

/// Take every pending message; the flag is set once the sender is gone
fn drain(receiver: &Receiver<ProgressMessage>) -> (Vec<ProgressMessage>, bool) {
    let mut messages = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(msg) => messages.push(msg),
            Err(TryRecvError::Empty) => return (messages, false),
            Err(TryRecvError::Disconnected) => return (messages, true),
        }
    }
}
