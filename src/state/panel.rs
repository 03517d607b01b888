use tracing::{debug, error, info};

use super::data::{
    format_megabytes, Bytes, CompressedImage, CompressionResult, QualityLevel, SourceImage,
    WorkflowStatus,
};
use crate::error::CompressError;

pub const MISSING_SOURCE_MESSAGE: &str = "Please select an image first.";
pub const COMPRESSION_FAILED_MESSAGE: &str = "Error compressing image. Please try again.";

/// Tag identifying one compression run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunId(u64);

/// Tag identifying one read of a picked file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadId(u64);

/// Everything the engine needs for a run that was just started
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub id: RunId,
    pub source: Bytes,
    pub quality: f32,
}

/// State of the compression panel.
///
/// All fields change only through the transition methods below, which keep
/// two rules: a new selection resets the outcome of any previous run, and a
/// finished run leaves exactly one of result or error.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    source: Option<SourceImage>,
    quality: QualityLevel,
    result: Option<CompressionResult>,
    error: Option<String>,
    status: WorkflowStatus,
    /// Run whose completion will be applied
    active_run: Option<RunId>,
    /// Last issued run tag
    last_run: u64,
    /// Last issued load tag; only that load may become the source
    last_load: u64,
}

impl PanelState {
    pub fn new(default_quality: f32) -> Self {
        Self {
            quality: QualityLevel::new(default_quality),
            ..Self::default()
        }
    }

    // ========== Transitions ==========

    /// Replace the source image and reset the workflow
    pub fn select_source(&mut self, source: SourceImage) {
        info!(
            "🖼️  Selected {} ({})",
            source.name,
            format_megabytes(source.size())
        );

        if let Some(run) = self.active_run.take() {
            debug!("Run {:?} superseded by new selection", run);
        }

        self.source = Some(source);
        self.result = None;
        self.error = None;
        self.status = WorkflowStatus::Idle;
    }

    /// Tag a file read that is about to start
    pub fn load_start(&mut self) -> LoadId {
        self.last_load += 1;
        LoadId(self.last_load)
    }

    /// Select a loaded file unless a newer read was started since.
    /// Returns false if the load is stale.
    pub fn load_complete(&mut self, id: LoadId, source: SourceImage) -> bool {
        if id != LoadId(self.last_load) {
            debug!("Discarding stale load {:?} of {}", id, source.name);
            return false;
        }
        self.select_source(source);
        true
    }

    pub fn set_quality(&mut self, value: f32) {
        self.quality = QualityLevel::new(value);
    }

    /// Start a compression run.
    ///
    /// Returns `None` (and sets the guidance message) if no image is selected.
    pub fn run_start(&mut self) -> Option<RunRequest> {
        let Some(source) = &self.source else {
            self.error = Some(MISSING_SOURCE_MESSAGE.to_string());
            return None;
        };

        self.last_run += 1;
        let id = RunId(self.last_run);
        let request = RunRequest {
            id,
            source: source.bytes.clone(),
            quality: self.quality.value(),
        };

        self.active_run = Some(id);
        self.status = WorkflowStatus::Compressing;
        self.error = None;

        debug!("Starting run {:?} at quality {}", id, self.quality);
        Some(request)
    }

    /// Apply a successful run. Returns false if the run is stale.
    pub fn run_success(&mut self, id: RunId, compressed: CompressedImage) -> bool {
        if !self.finish(id) {
            return false;
        }

        let result = CompressionResult::from(compressed);
        match result.jpeg_quality {
            Some(quality) => info!(
                "✅ Compressed to {} ({}x{}, quality {})",
                format_megabytes(result.size()),
                result.width,
                result.height,
                quality
            ),
            None => info!("✅ Source already smallest, keeping it as is"),
        }

        self.result = Some(result);
        self.error = None;
        true
    }

    /// Apply a failed run. Returns false if the run is stale.
    pub fn run_failure(&mut self, id: RunId, err: &CompressError) -> bool {
        if !self.finish(id) {
            return false;
        }

        error!("Compression run {:?} failed: {}", id, err);
        self.result = None;
        self.error = Some(COMPRESSION_FAILED_MESSAGE.to_string());
        true
    }

    /// Route an engine outcome to `run_success` or `run_failure`
    pub fn run_complete(
        &mut self,
        id: RunId,
        outcome: Result<CompressedImage, CompressError>,
    ) -> bool {
        match outcome {
            Ok(compressed) => self.run_success(id, compressed),
            Err(e) => self.run_failure(id, &e),
        }
    }

    /// Close the active run if `id` matches it
    fn finish(&mut self, id: RunId) -> bool {
        if self.active_run != Some(id) {
            debug!("Discarding stale completion of run {:?}", id);
            return false;
        }
        self.active_run = None;
        self.status = WorkflowStatus::Idle;
        true
    }

    // ========== Queries ==========

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    pub fn result(&self) -> Option<&CompressionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn is_compressing(&self) -> bool {
        self.status() == WorkflowStatus::Compressing
    }

    /// The trigger is enabled only with a source and no run in flight
    pub fn can_compress(&self) -> bool {
        self.source.is_some() && !self.is_compressing()
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.is_compressing() {
            "Compressing..."
        } else {
            "Compress Image"
        }
    }

    pub fn quality_label(&self) -> String {
        format!("Compression Quality: {}", self.quality)
    }

    pub fn original_size_label(&self) -> Option<String> {
        self.source.as_ref().map(|s| format_megabytes(s.size()))
    }

    pub fn compressed_size_label(&self) -> Option<String> {
        self.result.as_ref().map(|r| format_megabytes(r.size()))
    }
}
