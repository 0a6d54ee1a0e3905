// src/api/types.rs
use serde::Serialize;

use crate::core::types::Verification;

pub const MATCH_MESSAGE: &str = "Face verification successful! Identity confirmed.";
pub const MISMATCH_MESSAGE: &str = "Face verification failed. Face does not match.";

#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub success: bool,
    pub verified: bool,
    pub message: &'static str,
    pub face_id: String,
    pub distance: f64,
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl From<&Verification> for VerificationResponse {
    fn from(verification: &Verification) -> Self {
        let comparison = &verification.comparison;
        Self {
            success: true,
            verified: comparison.verified,
            message: if comparison.verified {
                MATCH_MESSAGE
            } else {
                MISMATCH_MESSAGE
            },
            face_id: verification.face_id.clone(),
            distance: comparison.distance,
            threshold: comparison.threshold,
            confidence: comparison.confidence(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct NoFaceResponse {
    pub success: bool,
    pub verified: bool,
    pub error: String,
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}
