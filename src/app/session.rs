use std::path::Path;

use crate::encode::{EncodeBackend, RegistryEncodeBackend};
use crate::export::{self, ExportError, ExportResult};
use crate::generate::{self, GenerateResult, QrArtifact};
use crate::options::{normalize, OptionsRecord, RawOptions};

/// The orchestration core behind the chrome: the validated options plus
/// the single mutable current-artifact slot. The slot is replaced by each
/// successful generation, never mutated in place.
pub struct GeneratorSession<B = RegistryEncodeBackend> {
    backend: B,
    options: OptionsRecord,
    artifact: Option<QrArtifact>,
}

impl GeneratorSession {
    pub fn new(options: OptionsRecord) -> Self {
        Self::with_backend(RegistryEncodeBackend, options)
    }
}

impl<B: EncodeBackend> GeneratorSession<B> {
    pub fn with_backend(backend: B, options: OptionsRecord) -> Self {
        Self {
            backend,
            options,
            artifact: None,
        }
    }

    pub fn options(&self) -> &OptionsRecord {
        &self.options
    }

    pub fn artifact(&self) -> Option<&QrArtifact> {
        self.artifact.as_ref()
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// A failed generation leaves the previous artifact in place.
    pub fn generate(&mut self, text: &str) -> GenerateResult<&QrArtifact> {
        let artifact = generate::generate_with(&self.backend, text, &self.options)?;
        Ok(self.artifact.insert(artifact))
    }

    /// Always exports the full-resolution artifact; exporting before the
    /// first successful generation is a distinct failure from a bad path.
    pub fn export(&self, path: &Path) -> ExportResult<()> {
        let artifact = self.artifact.as_ref().ok_or(ExportError::NoArtifact)?;
        export::write_png(artifact, path)
    }

    /// Runs a submitted record through the clamp rules; fields the caller
    /// left out keep their current values.
    pub fn apply_options(&mut self, raw: &RawOptions) -> OptionsRecord {
        let current = self.options;
        self.options = normalize(raw, &current);
        self.options
    }
}
