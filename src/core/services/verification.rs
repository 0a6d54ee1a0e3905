// src/core/services/verification.rs
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    core::{
        capture,
        comparator::{ComparatorError, FaceComparator},
        types::{Verification, VerificationRequest},
    },
    storage::{ObjectStore, ScratchSpace},
};

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("No JSON data provided")]
    MissingPayload,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Failed to download reference image: {0}")]
    ReferenceDownload(String),

    #[error("Failed to decode captured image: {0}")]
    CapturedDecode(String),

    #[error("No face detected in image(s)")]
    NoFaceDetected(String),

    #[error("{0}")]
    Internal(String),
}

impl VerificationError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingPayload
                | Self::MissingField(_)
                | Self::CapturedDecode(_)
                | Self::NoFaceDetected(_)
        )
    }
}

/// Compares a captured image against the stored reference for a face id.
pub struct VerificationService {
    store: Arc<dyn ObjectStore>,
    comparator: Arc<dyn FaceComparator>,
    scratch_dir: PathBuf,
}

impl VerificationService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        comparator: Arc<dyn FaceComparator>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            comparator,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Runs one verification. Temporary images are removed before this
    /// returns, whatever the outcome.
    pub async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<Verification, VerificationError> {
        let mut scratch = ScratchSpace::new(&self.scratch_dir);
        let result = self.run(&mut scratch, request).await;
        scratch.cleanup();

        result
    }

    async fn run(
        &self,
        scratch: &mut ScratchSpace,
        request: &VerificationRequest,
    ) -> Result<Verification, VerificationError> {
        let face_id = request.face_id.as_str();

        let reference = self.store.download(face_id).await.map_err(|e| {
            error!(face_id, "Failed to download reference image: {}", e);
            VerificationError::ReferenceDownload(e.to_string())
        })?;
        let captured = capture::decode_captured_image(&request.image).map_err(|e| {
            warn!(face_id, "Failed to decode captured image: {}", e);
            VerificationError::CapturedDecode(e.to_string())
        })?;

        let captured_path = scratch.stage("captured", &captured).map_err(|e| {
            error!(face_id, "Failed to stage captured image: {}", e);
            VerificationError::Internal(format!("Failed to stage captured image: {}", e))
        })?;
        let reference_path = scratch.stage("reference", &reference).map_err(|e| {
            error!(face_id, "Failed to stage reference image: {}", e);
            VerificationError::ReferenceDownload(e.to_string())
        })?;

        match self.comparator.compare(&captured_path, &reference_path).await {
            Ok(comparison) => {
                info!(
                    face_id,
                    verified = comparison.verified,
                    distance = comparison.distance,
                    threshold = comparison.threshold,
                    "Face comparison complete"
                );
                Ok(Verification {
                    face_id: face_id.to_string(),
                    comparison,
                })
            }
            Err(ComparatorError::NoFaceDetected(details)) => {
                warn!(face_id, %details, "No face detected");
                Err(VerificationError::NoFaceDetected(details))
            }
            Err(ComparatorError::Failed(message)) => {
                error!(face_id, %message, "Face comparison failed");
                Err(VerificationError::Internal(message))
            }
        }
    }
}
