//! User-facing notifications
//!
//! Nothing in a run is fatal: conversion failures, export failures and an
//! empty selection are all reported through a [`Notifier`] and the run goes
//! on. The GUI shows them as modal dialogs, the CLI prints them.

use indicatif::ProgressBar;

use crate::utils::{error_println, success_println, warn_println};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Dialog title for this severity
    pub fn title(&self) -> &'static str {
        match self {
            Severity::Info => "Success",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);

    fn info(&mut self, message: &str) {
        self.notify(Notice::new(Severity::Info, message));
    }

    fn warn(&mut self, message: &str) {
        self.notify(Notice::new(Severity::Warning, message));
    }

    fn error(&mut self, message: &str) {
        self.notify(Notice::new(Severity::Error, message));
    }
}

/// Prints notices to the terminal, suspending the progress bar if one is active
#[derive(Default)]
pub struct ConsoleNotifier {
    progress: Option<ProgressBar>,
}

impl ConsoleNotifier {
    pub fn with_progress(progress: ProgressBar) -> Self {
        Self {
            progress: Some(progress),
        }
    }

    fn print(notice: &Notice) {
        match notice.severity {
            Severity::Info => success_println(&notice.message),
            Severity::Warning => warn_println(&notice.message),
            Severity::Error => error_println(&notice.message),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        match &self.progress {
            Some(pb) => pb.suspend(|| Self::print(&notice)),
            None => Self::print(&notice),
        }
    }
}

/// Keeps every notice in memory, in the order received
#[derive(Debug, Default)]
pub struct NoticeLog {
    pub notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
