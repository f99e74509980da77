//! Reporter that turns generation events into tracing events.

use tracing::{info, warn};

use schemaforge_core::{
    application::ports::Reporter,
    domain::{ArtifactKind, RelativePath},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn written(&self, kind: ArtifactKind, path: &RelativePath) {
        info!(%kind, %path, "Written");
    }

    fn skipped(&self, kind: ArtifactKind, path: &RelativePath, reason: &str) {
        info!(%kind, %path, reason, "Skipped");
    }

    fn warning(&self, model: &str, message: &str) {
        warn!(model, "{message}");
    }
}
