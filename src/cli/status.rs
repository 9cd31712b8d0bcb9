//! Terminal status reporter
//!
//! Shows a spinner while a step runs and replaces it with a check mark or a
//! cross when the step ends. When stdout is not a terminal indicatif hides
//! the spinner and only the final line is printed.

use crate::cli::output::{CHECK, CROSS};
use crate::status::StatusReporter;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Status reporter backed by an indicatif spinner
#[derive(Default)]
pub struct SpinnerStatus {
    current: Mutex<Option<(String, ProgressBar)>>,
}

impl SpinnerStatus {
    pub fn new() -> Self {
        Self::default()
    }

    fn spinner(label: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let template =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]");
        if let Ok(spinner_style) = template {
            spinner.set_style(spinner_style);
        }
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

impl StatusReporter for SpinnerStatus {
    fn start(&self, label: &str) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((_, previous)) = current.take() {
            previous.finish_and_clear();
        }
        *current = Some((label.to_string(), Self::spinner(label)));
    }

    fn end(&self, success: bool) {
        let finished = self.current.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some((label, spinner)) = finished else {
            return;
        };
        spinner.finish_and_clear();
        if success {
            println!(" {} {}", CHECK, label);
        } else {
            println!(" {} {}", CROSS, style(label).red());
        }
    }
}
