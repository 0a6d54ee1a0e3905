// tests/integration/verification_tests.rs
use actix_web::{
    http::{header, Method, StatusCode},
    test, App,
};
use serde_json::{json, Value};

use crate::common::{matched, mismatched, TestContext, Verdict};
use face_verifier::api;

const REFERENCE: &[u8] = b"\xff\xd8\xffreference-jpeg";
// base64 of "captured-jpeg"
const CAPTURED_B64: &str = "Y2FwdHVyZWQtanBlZw==";

async fn send(ctx: &TestContext, req: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .wrap(api::cors_headers())
            .configure(|cfg| ctx.state.configure(cfg)),
    )
    .await;
    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    (status, test::read_body_json(resp).await)
}

async fn verify(ctx: &TestContext, body: Value) -> (StatusCode, Value) {
    send(ctx, test::TestRequest::post().uri("/image").set_json(body)).await
}

#[actix_web::test]
async fn test_verified_identity() {
    let ctx = TestContext::new(matched(0.2, 0.4));
    ctx.put_reference("user123", REFERENCE);

    let (status, body) = verify(
        &ctx,
        json!({
            "face_id": "user123",
            "image": format!("data:image/jpeg;base64,{}", CAPTURED_B64),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["verified"], true);
    assert_eq!(body["face_id"], "user123");
    assert_eq!(body["distance"], 0.2);
    assert_eq!(body["threshold"], 0.4);
    assert_eq!(body["confidence"], 0.5);

    let calls = ctx.comparator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].captured, b"captured-jpeg");
    assert_eq!(calls[0].reference, REFERENCE);
    assert!(!calls[0].captured_path.exists());
    assert!(!calls[0].reference_path.exists());
    assert_eq!(ctx.scratch_entries(), 0);
}

#[actix_web::test]
async fn test_prefixed_and_bare_images_match() {
    let ctx = TestContext::new(mismatched(0.8, 0.4));
    ctx.put_reference("user123", REFERENCE);

    let prefixed = format!("data:image/png;base64,{}", CAPTURED_B64);
    for image in [prefixed.as_str(), CAPTURED_B64] {
        let (status, body) = verify(&ctx, json!({"face_id": "user123", "image": image})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verified"], false);
        assert!(body.get("confidence").is_none());
    }

    let calls = ctx.comparator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].captured, calls[1].captured);
}

#[actix_web::test]
async fn test_nested_reference_key() {
    let ctx = TestContext::new(matched(0.1, 0.4));
    ctx.put_reference("faces/2024/user123.jpg", REFERENCE);

    let (status, body) = verify(
        &ctx,
        json!({"face_id": "faces/2024/user123.jpg", "image": CAPTURED_B64}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["face_id"], "faces/2024/user123.jpg");
}

#[actix_web::test]
async fn test_unknown_reference() {
    let ctx = TestContext::new(matched(0.1, 0.4));

    let (status, body) = verify(&ctx, json!({"face_id": "ghost", "image": CAPTURED_B64})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Failed to download reference image: Object not found: ghost"})
    );
    assert!(ctx.comparator.calls().is_empty());
}

#[actix_web::test]
async fn test_escaping_reference_key() {
    let ctx = TestContext::new(matched(0.1, 0.4));

    let (status, body) =
        verify(&ctx, json!({"face_id": "../etc/passwd", "image": CAPTURED_B64})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to download reference image: Invalid object key"));
    assert!(ctx.comparator.calls().is_empty());
}

#[actix_web::test]
async fn test_undecodable_capture() {
    let ctx = TestContext::new(matched(0.1, 0.4));
    ctx.put_reference("user123", REFERENCE);

    let (status, body) = verify(&ctx, json!({"face_id": "user123", "image": "not*base64"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to decode captured image: "));
    assert!(ctx.comparator.calls().is_empty());
    assert_eq!(ctx.scratch_entries(), 0);
}

#[actix_web::test]
async fn test_no_face_detected() {
    let ctx = TestContext::new(Verdict::NoFace(
        "Face could not be detected in img1_path".to_string(),
    ));
    ctx.put_reference("user123", REFERENCE);

    let (status, body) = verify(&ctx, json!({"face_id": "user123", "image": CAPTURED_B64})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "verified": false,
            "error": "No face detected in image(s)",
            "details": "Face could not be detected in img1_path",
        })
    );
    assert_eq!(ctx.scratch_entries(), 0);
}

#[actix_web::test]
async fn test_comparator_failure() {
    let ctx = TestContext::new(Verdict::Fail("DeepFace is unavailable".to_string()));
    ctx.put_reference("user123", REFERENCE);

    let (status, body) = verify(&ctx, json!({"face_id": "user123", "image": CAPTURED_B64})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "DeepFace is unavailable"}));
    assert_eq!(ctx.scratch_entries(), 0);
}

#[actix_web::test]
async fn test_malformed_body() {
    let ctx = TestContext::new(matched(0.1, 0.4));

    let (status, body) = send(
        &ctx,
        test::TestRequest::post()
            .uri("/image")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No JSON data provided"}));
}

#[actix_web::test]
async fn test_preflight() {
    let ctx = TestContext::new(matched(0.1, 0.4));

    let (status, body) = send(
        &ctx,
        test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/image")
            .insert_header((header::ORIGIN, "https://kiosk.example"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    assert!(ctx.comparator.calls().is_empty());
}

#[actix_web::test]
async fn test_health_reports_outcomes() {
    let ctx = TestContext::new(matched(0.2, 0.4));
    ctx.put_reference("user123", REFERENCE);

    verify(&ctx, json!({"face_id": "user123", "image": CAPTURED_B64})).await;
    verify(&ctx, json!({"face_id": "user123"})).await;
    verify(&ctx, json!({"face_id": "ghost", "image": CAPTURED_B64})).await;

    let (status, body) = send(&ctx, test::TestRequest::get().uri("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["requests"]["total"], 3);
    assert_eq!(body["requests"]["verified"], 1);
    assert_eq!(body["requests"]["client_errors"], 1);
    assert_eq!(body["requests"]["failures"], 1);
    assert_eq!(ctx.metrics.snapshot().total, 3);
}
