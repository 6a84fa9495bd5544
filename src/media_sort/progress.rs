//! Progress reporting interface for scans and sorts.

use std::sync::mpsc::Sender;

use crate::media_sort::{ScanResult, SortOutcome};

/// Receives scan results, sort progress, per-file errors and completion summaries.
///
/// Methods are called synchronously and in the order the events happen.
/// All methods default to doing nothing.
pub trait ProgressReporter {
    fn on_scan_start(&mut self) {}

    fn on_scan_complete(&mut self, _result: &ScanResult) {}

    /// Progress in percent (0..=100) with a label for the file being processed.
    fn on_sort_progress(&mut self, _percent: u8, _label: &str) {}

    fn on_sort_file_error(&mut self, _file_name: &str, _message: &str) {}

    fn on_sort_complete(&mut self, _outcome: &SortOutcome) {}
}

/// Reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {}

/// Reporter calls as values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    ScanStarted,
    ScanCompleted(ScanResult),
    SortProgress { percent: u8, label: String },
    SortFileError { file_name: String, message: String },
    SortCompleted(SortOutcome),
}

/// Reporter that records every event in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ProgressEvent>,
}

/// Reporter that sends every event to a channel, for consumers on another thread.
#[derive(Debug)]
pub struct ChannelReporter {
    sender: Sender<ProgressEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn drain(&mut self) -> std::vec::Drain<'_, ProgressEvent> {
        self.events.drain(..)
    }

    /// Progress percentages reported so far.
    #[must_use]
    pub fn percentages(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::SortProgress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }
}

impl ChannelReporter {
    #[must_use]
    pub const fn new(sender: Sender<ProgressEvent>) -> Self {
        Self { sender }
    }

    fn send(&self, event: ProgressEvent) {
        // Receiver going away only means nobody is listening anymore
        let _ = self.sender.send(event);
    }
}

impl ProgressReporter for EventLog {
    fn on_scan_start(&mut self) {
        self.events.push(ProgressEvent::ScanStarted);
    }

    fn on_scan_complete(&mut self, result: &ScanResult) {
        self.events.push(ProgressEvent::ScanCompleted(result.clone()));
    }

    fn on_sort_progress(&mut self, percent: u8, label: &str) {
        self.events.push(ProgressEvent::SortProgress {
            percent,
            label: label.to_string(),
        });
    }

    fn on_sort_file_error(&mut self, file_name: &str, message: &str) {
        self.events.push(ProgressEvent::SortFileError {
            file_name: file_name.to_string(),
            message: message.to_string(),
        });
    }

    fn on_sort_complete(&mut self, outcome: &SortOutcome) {
        self.events.push(ProgressEvent::SortCompleted(outcome.clone()));
    }
}

impl ProgressReporter for ChannelReporter {
    fn on_scan_start(&mut self) {
        self.send(ProgressEvent::ScanStarted);
    }

    fn on_scan_complete(&mut self, result: &ScanResult) {
        self.send(ProgressEvent::ScanCompleted(result.clone()));
    }

    fn on_sort_progress(&mut self, percent: u8, label: &str) {
        self.send(ProgressEvent::SortProgress {
            percent,
            label: label.to_string(),
        });
    }

    fn on_sort_file_error(&mut self, file_name: &str, message: &str) {
        self.send(ProgressEvent::SortFileError {
            file_name: file_name.to_string(),
            message: message.to_string(),
        });
    }

    fn on_sort_complete(&mut self, outcome: &SortOutcome) {
        self.send(ProgressEvent::SortCompleted(outcome.clone()));
    }
}
