use eframe::egui;
use product_image_exporter::export::ExportPaths;
use product_image_exporter::image_processing::{Selection, SUPPORTED_EXTENSIONS};
use product_image_exporter::notify::{Notice, Severity};
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

#[path = "app_processing.rs"]
mod app_processing;

pub struct ImageExporterApp {
    // Source of truth for the selected images; widgets only render it
    selection: Selection,
    highlighted: Option<usize>,
    export_paths: ExportPaths,

    // Processing state
    is_processing: bool,
    progress: f32,
    current_file: String,
    processed_count: usize,
    total_count: usize,

    // Results
    results_message: String,
    info_messages: Vec<String>,
    pending_dialogs: VecDeque<Notice>,

    // Communication channel for background processing
    progress_receiver: Option<Receiver<ProgressMessage>>,
}

#[derive(Debug)]
pub(crate) enum ProgressMessage {
    Progress { current: usize, total: usize, file: String },
    Notice(Notice),
    Complete { converted: usize, failed: usize, exports_written: usize },
}

impl ImageExporterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            selection: Selection::default(),
            highlighted: None,
            export_paths: ExportPaths::default(),
            is_processing: false,
            progress: 0.0,
            current_file: String::new(),
            processed_count: 0,
            total_count: 0,
            results_message: String::new(),
            info_messages: Vec::new(),
            pending_dialogs: VecDeque::new(),
            progress_receiver: None,
        }
    }

    fn select_images(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select images")
            .add_filter("Images", SUPPORTED_EXTENSIONS)
            .pick_files();

        if let Some(paths) = picked {
            if !paths.is_empty() {
                self.selection.replace(paths);
                self.highlighted = None;
            }
        }
    }

    /// Queue a notice; warnings and errors become modal dialogs
    pub(crate) fn push_notice(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Info => self.info_messages.push(notice.message),
            Severity::Warning | Severity::Error => self.pending_dialogs.push_back(notice),
        }
    }

    fn show_next_dialog(&mut self) {
        let Some(notice) = self.pending_dialogs.pop_front() else {
            return;
        };

        let level = match notice.severity {
            Severity::Info => rfd::MessageLevel::Info,
            Severity::Warning => rfd::MessageLevel::Warning,
            Severity::Error => rfd::MessageLevel::Error,
        };

        let _ = rfd::MessageDialog::new()
            .set_level(level)
            .set_title(notice.severity.title())
            .set_description(&notice.message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_gray(211))
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(360.0, 260.0));
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for (index, path) in self.selection.paths().iter().enumerate() {
                            let label = egui::RichText::new(path.display().to_string())
                                .color(egui::Color32::BLACK);
                            ui.selectable_value(&mut self.highlighted, Some(index), label);
                        }
                    });
            });
    }

    fn render_buttons(&mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            let select = egui::Button::new("Select Images").min_size(egui::vec2(180.0, 30.0));
            if ui.add_enabled(!self.is_processing, select).clicked() {
                self.select_images();
            }

            ui.add_space(5.0);

            let process_text = if self.is_processing {
                "Processing..."
            } else {
                "Compress and Convert"
            };
            let process = egui::Button::new(process_text).min_size(egui::vec2(180.0, 30.0));
            if ui.add_enabled(!self.is_processing, process).clicked() {
                self.start_processing();
            }
        });
    }

    fn render_progress(&mut self, ui: &mut egui::Ui) {
        if self.is_processing {
            ui.label(format!(
                "Processing: {}/{}",
                self.processed_count, self.total_count
            ));
            ui.label(&self.current_file);
            ui.add(
                egui::ProgressBar::new(self.progress)
                    .show_percentage()
                    .animate(true),
            );
        }

        if !self.results_message.is_empty() {
            ui.label(&self.results_message);
            for message in &self.info_messages {
                ui.label(format!("✓ {}", message));
            }
        }
    }
}

impl eframe::App for ImageExporterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for progress updates from background thread
        self.check_progress();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                self.render_file_list(ui);
                ui.add_space(10.0);
                self.render_buttons(ui);
            });

            ui.add_space(10.0);
            ui.label(format!("Selected images: {}", self.selection.len()));
            ui.add_space(10.0);

            self.render_progress(ui);
        });

        self.show_next_dialog();

        if self.is_processing || !self.pending_dialogs.is_empty() {
            ctx.request_repaint();
        }
    }
}
