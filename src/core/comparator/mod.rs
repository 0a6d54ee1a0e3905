// src/core/comparator/mod.rs
pub mod deepface;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use deepface::DeepFaceComparator;

/// Raw verdict from a face comparator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceComparison {
    pub verified: bool,
    pub distance: f64,
    pub threshold: f64,
}

impl FaceComparison {
    /// `1 - distance / threshold` for a verified match, 0 when the threshold
    /// is not positive, `None` when the faces did not match. Not clamped.
    pub fn confidence(&self) -> Option<f64> {
        if !self.verified {
            return None;
        }
        if self.threshold > 0.0 {
            Some(1.0 - self.distance / self.threshold)
        } else {
            Some(0.0)
        }
    }
}

#[derive(Debug, Error)]
pub enum ComparatorError {
    #[error("No face detected: {0}")]
    NoFaceDetected(String),

    #[error("{0}")]
    Failed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaceComparator: Send + Sync {
    /// Compares the face in `captured` against the face in `reference`.
    async fn compare(
        &self,
        captured: &Path,
        reference: &Path,
    ) -> Result<FaceComparison, ComparatorError>;
}
