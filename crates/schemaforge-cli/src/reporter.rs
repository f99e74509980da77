//! Terminal reporter: one line per written file, warnings in yellow, and a
//! spinner while a run is in progress on a TTY. Skipped files are listed
//! only with `-v`.

use std::io::IsTerminal as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use schemaforge_core::{
    application::ports::Reporter,
    domain::{ArtifactKind, RelativePath},
};

use crate::output::OutputManager;

pub struct ConsoleReporter {
    output: OutputManager,
    spinner: Option<ProgressBar>,
    list_skipped: bool,
}

impl ConsoleReporter {
    pub fn new(output: OutputManager, list_skipped: bool) -> Self {
        let spinner = (!output.is_quiet() && std::io::stderr().is_terminal()).then(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                spinner.set_style(style);
            }
            spinner.set_message("Generating...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });
        Self {
            output,
            spinner,
            list_skipped,
        }
    }

    /// Stop the spinner and clear its line.
    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    /// Print without tearing the spinner.
    fn emit(&self, write: impl FnOnce(&OutputManager) -> std::io::Result<()>) {
        let result = match &self.spinner {
            Some(spinner) => spinner.suspend(|| write(&self.output)),
            None => write(&self.output),
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "Failed to write to terminal");
        }
    }

    fn tick(&self, path: &RelativePath) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(path.to_string());
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

impl Reporter for ConsoleReporter {
    fn written(&self, kind: ArtifactKind, path: &RelativePath) {
        self.tick(path);
        self.emit(|out| out.success(&format!("{:<15} {path}", kind.as_str())));
    }

    fn skipped(&self, kind: ArtifactKind, path: &RelativePath, reason: &str) {
        self.tick(path);
        if self.list_skipped {
            self.emit(|out| out.detail(&format!("skipped {kind} {path} ({reason})")));
        }
    }

    fn warning(&self, model: &str, message: &str) {
        self.emit(|out| out.warning(&format!("{model}: {message}")));
    }
}
