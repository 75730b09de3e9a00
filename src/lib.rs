// Library exports for reuse by the CLI and the GUI
pub mod cli;
pub mod export;
pub mod image_processing;
pub mod json_output;
pub mod notify;
pub mod utils;

// Re-export commonly used types
pub use export::{write_exports, ExportKind, ExportPaths, ExportReport};
pub use image_processing::{
    convert_to_webp, discover_images, process_and_export, process_selection, BatchOutcome,
    ConversionFailure, ConversionResult, RunSummary, Selection,
};
pub use json_output::JsonMessage;
pub use notify::{Notice, Notifier, Severity};
