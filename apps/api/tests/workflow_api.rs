//! End-to-end tests for the Workflow API, driven through the router.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rehearse::{build_router, AppState, Config};
use serde_json::{json, Value};
use tower::util::ServiceExt;

const PDF: &str = "application/pdf";
const BOUNDARY: &str = "rehearse-test-boundary";

/// Test helper: app with every simulated delay set to zero and a fixed grader seed.
fn create_test_app() -> Router {
    let config = Config::from_lookup(|key| match key {
        "ANALYSIS_DELAY_MS" | "GENERATION_DELAY_MS" | "TRANSCRIPTION_DELAY_MS" => {
            Some("0".to_string())
        }
        "GRADER_SEED" => Some("11".to_string()),
        _ => None,
    })
    .expect("test config");
    let state = AppState::from_config(config).expect("test state");
    build_router(state)
}

fn upload(file_name: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/workflow/document")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn reach_item_list(app: &Router) -> Value {
    let (status, _) = send(app, upload("cv.pdf", PDF, b"%PDF-1.7 resume")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(app, post("/api/v1/workflow/items")).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "rehearse");
}

#[tokio::test]
async fn test_fresh_workflow_snapshot() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/api/v1/workflow")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "upload");
    assert_eq!(body["busy"], false);
    assert!(body["profile"].is_null());
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_upload_then_generate_items() {
    let app = create_test_app();

    let (status, body) = send(&app, upload("cv.pdf", PDF, b"%PDF-1.7 resume")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["stage"], "analysis");
    assert_eq!(body["snapshot"]["document"]["file_name"], "cv.pdf");
    assert!(body["snapshot"]["profile"]["skills"].as_array().unwrap().len() > 0);
    assert_eq!(body["notification"]["level"], "success");

    let (status, body) = send(&app, post("/api/v1/workflow/items")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["stage"], "item_list");
    let items = body["snapshot"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["id"], "1");
    assert_eq!(items[0]["category"], "experience");
}

#[tokio::test]
async fn test_unsupported_media_type_is_rejected() {
    let app = create_test_app();

    let (status, body) = send(&app, upload("notes.txt", "text/plain", b"hello")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(body["error"]["retryable"], false);

    let (_, snapshot) = send(&app, get("/api/v1/workflow")).await;
    assert_eq!(snapshot["stage"], "upload");
    assert!(snapshot["document"].is_null());
}

#[tokio::test]
async fn test_analysis_failure_is_retryable() {
    let app = create_test_app();

    let (status, body) = send(&app, upload("empty.pdf", PDF, b"")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "ANALYSIS_FAILED");
    assert_eq!(body["error"]["retryable"], true);
    assert_eq!(body["notification"]["title"], "Analysis Failed");

    let (_, snapshot) = send(&app, get("/api/v1/workflow")).await;
    assert_eq!(snapshot["stage"], "upload");
    assert_eq!(snapshot["busy"], false);
    assert_eq!(snapshot["document"]["file_name"], "empty.pdf");

    let (status, body) = send(&app, post("/api/v1/workflow/document/retry")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "ANALYSIS_FAILED");
}

#[tokio::test]
async fn test_missing_file_field_is_a_validation_error() {
    let app = create_test_app();
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/workflow/document")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_out_of_order_operations_conflict() {
    let app = create_test_app();

    let (status, body) = send(&app, post("/api/v1/workflow/items")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let (status, _) = send(&app, post("/api/v1/workflow/session/next")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, post("/api/v1/workflow/item-list")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_session_requires_a_selection() {
    let app = create_test_app();
    reach_item_list(&app).await;

    let (status, body) = send(
        &app,
        post_json("/api/v1/workflow/session", json!({ "selected": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_full_session_to_results() {
    let app = create_test_app();
    let body = reach_item_list(&app).await;
    let total = body["snapshot"]["items"].as_array().unwrap().len();

    let (status, body) = send(
        &app,
        post_json("/api/v1/workflow/session", json!({ "selected": ["1", "2"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["stage"], "session");
    assert_eq!(body["snapshot"]["session"]["index"], 0);
    assert_eq!(body["snapshot"]["session"]["capture"], "idle");

    // Answer the first item.
    let (status, _) = send(&app, post("/api/v1/workflow/session/recording/start")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, post("/api/v1/workflow/session/recording/stop")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["session"]["capture"], "captured");

    // Skipping a captured item is refused.
    let (status, body) = send(&app, post("/api/v1/workflow/session/skip")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let (status, _) = send(&app, post("/api/v1/workflow/session/next")).await;
    assert_eq!(status, StatusCode::OK);

    // Go back and forth; the captured answer survives.
    let (status, body) = send(&app, post("/api/v1/workflow/session/previous")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["session"]["capture"], "captured");
    send(&app, post("/api/v1/workflow/session/next")).await;

    // Skip the rest.
    let mut last = Value::Null;
    for _ in 1..total {
        let (status, body) = send(&app, post("/api/v1/workflow/session/skip")).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }
    assert_eq!(last["snapshot"]["stage"], "results");
    assert_eq!(last["notification"]["title"], "Interview Completed");

    let (status, results) = send(&app, get("/api/v1/workflow/results")).await;
    assert_eq!(status, StatusCode::OK);
    let outcomes = results["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), total);
    assert_eq!(outcomes[0]["item_id"], "1");
    assert_eq!(outcomes[0]["answered"], true);
    assert_eq!(outcomes[1]["response"], "No answer provided");
    assert_eq!(results["summary"]["answered"], 1);
    assert_eq!(results["summary"]["total"], total);
    for outcome in outcomes {
        let score = outcome["score"].as_u64().unwrap();
        assert!((6..=10).contains(&score));
    }

    // Back to the list keeps the items; reset clears everything.
    let (status, body) = send(&app, post("/api/v1/workflow/item-list")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["stage"], "item_list");
    assert_eq!(body["snapshot"]["items"].as_array().unwrap().len(), total);

    let (status, body) = send(&app, post("/api/v1/workflow/reset")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["stage"], "upload");
    assert!(body["snapshot"]["profile"].is_null());
    assert_eq!(body["snapshot"]["items"], json!([]));
    assert_eq!(body["snapshot"]["outcomes"], json!([]));
}
