use actix_web::{
    http::{header, Method, StatusCode},
    web::{self, Bytes, Data},
    HttpResponse, ResponseError,
};
use std::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::{
    api::types::{ErrorResponse, NoFaceResponse, StatusResponse, VerificationResponse},
    core::{
        services::verification::{VerificationError, VerificationService},
        types::{Verification, VerificationRequest},
    },
    utils::metrics::{Metrics, RequestOutcome},
};

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE: &str = "86400";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/image")
            .route(web::post().to(verify_image))
            .route(web::method(Method::OPTIONS).to(preflight)),
    );
}

async fn preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE))
        .json(StatusResponse { status: "ok" })
}

async fn verify_image(
    service: Data<VerificationService>,
    metrics: Data<Metrics>,
    body: Bytes,
) -> Result<HttpResponse, VerificationError> {
    let started = Instant::now();
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "verify_image",
        %request_id,
        face_id = tracing::field::Empty
    );

    async move {
        info!("Received verification request");

        let result = match VerificationRequest::from_json(&body) {
            Ok(request) => {
                tracing::Span::current().record("face_id", request.face_id.as_str());
                service.verify(&request).await
            }
            Err(e) => Err(e),
        };

        metrics.record_request(outcome(&result), started.elapsed());
        result.map(|verification| HttpResponse::Ok().json(VerificationResponse::from(&verification)))
    }
    .instrument(span)
    .await
}

fn outcome(result: &Result<Verification, VerificationError>) -> RequestOutcome {
    match result {
        Ok(verification) if verification.comparison.verified => RequestOutcome::Verified,
        Ok(_) => RequestOutcome::NotVerified,
        Err(VerificationError::NoFaceDetected(_)) => RequestOutcome::NoFace,
        Err(e) if e.is_client_error() => RequestOutcome::ClientError,
        Err(_) => RequestOutcome::Failed,
    }
}

impl ResponseError for VerificationError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            VerificationError::NoFaceDetected(details) => response.json(NoFaceResponse {
                success: false,
                verified: false,
                error: self.to_string(),
                details: details.clone(),
            }),
            _ => response.json(ErrorResponse {
                error: self.to_string(),
            }),
        }
    }
}
