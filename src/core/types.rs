// src/core/types.rs
use serde_json::Value;

use crate::core::comparator::FaceComparison;
use crate::core::services::verification::VerificationError;

/// A validated verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub face_id: String,
    pub image: String,
}

impl VerificationRequest {
    /// Parses and validates a JSON request body. An unparseable body, a
    /// non-object, or an empty object all count as "no data".
    pub fn from_json(body: &[u8]) -> Result<Self, VerificationError> {
        let object = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(object)) if !object.is_empty() => object,
            _ => return Err(VerificationError::MissingPayload),
        };

        let field = |name: &'static str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
                .ok_or(VerificationError::MissingField(name))
        };

        Ok(Self {
            face_id: field("face_id")?,
            image: field("image")?,
        })
    }
}

/// Outcome of a completed comparison for one face id.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub face_id: String,
    pub comparison: FaceComparison,
}
