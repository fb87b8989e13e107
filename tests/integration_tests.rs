// tests/integration_tests.rs
use actix_web::{test, web, App};
use async_trait::async_trait;
use media_analyzer::api::{configure_routes, AppState};
use media_analyzer::backend::{AnalysisBackend, AnalysisRequest, RemoteResponse};
use media_analyzer::config::{AppConfig, BackendConfig, PayloadShape, ServerConfig, SubmissionPolicy};
use media_analyzer::errors::{AnalyzerError, Result};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use uuid::Uuid;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Replies according to keywords in the description and records each request.
#[derive(Default)]
struct ScriptedBackend {
    seen: Mutex<Vec<AnalysisRequest>>,
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(&self, request: AnalysisRequest) -> Result<RemoteResponse> {
        self.seen.lock().unwrap().push(request.clone());
        let text = request.description.as_str();
        if text.contains("fail") {
            Err(AnalyzerError::ApiError { status: 401, body: "session expired".to_string() })
        } else if text.contains("errors") {
            Ok(RemoteResponse::with_errors(["ValidationException"]))
        } else if text.contains("empty") {
            Ok(RemoteResponse::default())
        } else {
            Ok(RemoteResponse::with_body(format!("analysis of: {}", text)))
        }
    }
}

/// Holds the first call open until the test releases it; later calls answer at once.
struct GatedBackend {
    gate: Mutex<Option<oneshot::Receiver<RemoteResponse>>>,
}

impl GatedBackend {
    fn new() -> (Arc<Self>, oneshot::Sender<RemoteResponse>) {
        let (tx, rx) = oneshot::channel();
        (Arc::new(Self { gate: Mutex::new(Some(rx)) }), tx)
    }
}

#[async_trait]
impl AnalysisBackend for GatedBackend {
    async fn analyze(&self, request: AnalysisRequest) -> Result<RemoteResponse> {
        let gate = self.gate.lock().unwrap().take();
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| AnalyzerError::CallThrew("gate dropped".to_string())),
            None => Ok(RemoteResponse::with_body(format!("ungated: {}", request.description))),
        }
    }
}

fn test_config(function_url: &str) -> AppConfig {
    AppConfig {
        backend: BackendConfig {
            function_url: function_url.to_string(),
            session_token: Some("session-token".to_string()),
            payload_shape: PayloadShape::Description,
        },
        server: ServerConfig::default(),
        submission_policy: SubmissionPolicy::LastWriteWins,
        username: Some("alice".to_string()),
        view_ttl_secs: 1800,
    }
}

fn scripted_state() -> (AppState, Arc<ScriptedBackend>) {
    let backend = Arc::new(ScriptedBackend::default());
    let state = AppState::with_backend(test_config("http://localhost:9/fn"), backend.clone());
    (state, backend)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

macro_rules! open_view_id {
    ($app:expr) => {{
        let req = test::TestRequest::post().uri("/api/v1/views").to_request();
        let view: Value = test::call_and_read_body_json($app, req).await;
        view["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn test_health_and_session() {
    let (state, _) = scripted_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "media-analyzer");

    let req = test::TestRequest::get().uri("/api/v1/session").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "alice");
}

#[actix_web::test]
async fn test_serves_embedded_page() {
    let (state, _) = scripted_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().get("content-type").unwrap().to_str().unwrap().starts_with("text/html"));
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Media Analyzer"));

    let req = test::TestRequest::get().uri("/missing.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_new_view_starts_idle() {
    let (state, _) = scripted_state();
    let app = app!(state);

    let req = test::TestRequest::post().uri("/api/v1/views").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["loading"], false);
    assert_eq!(view["result"], Value::Null);
    assert_eq!(view["output"]["kind"], "placeholder");
    assert_eq!(view["submit_label"], "Run AI Analysis");
    assert_eq!(view["file_prompt"], "Click to choose a file or drag it here");
    assert_eq!(state.view_count().await, 1);
}

#[actix_web::test]
async fn test_submit_shows_returned_body() {
    let (state, backend) = scripted_state();
    let app = app!(state);
    let id = open_view_id!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "two speakers" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["message"], "analysis of: two speakers");
    assert_eq!(body["view"]["loading"], false);
    assert_eq!(body["view"]["output"]["kind"], "result");
    assert_eq!(body["view"]["output"]["text"], "analysis of: two speakers");

    let req = test::TestRequest::get().uri(&format!("/api/v1/views/{}", id)).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["result"], "analysis of: two speakers");
    assert_eq!(backend.seen.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_empty_body_and_remote_errors() {
    let (state, _) = scripted_state();
    let app = app!(state);
    let id = open_view_id!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "empty please" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["view"]["result"], "No data returned");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "errors please" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "remote_errors_returned");
    assert_eq!(body["view"]["result"], "An error occurred. Check the console for details.");
    assert!(!body.to_string().contains("ValidationException"));
}

#[actix_web::test]
async fn test_call_failure_sets_alert() {
    let (state, _) = scripted_state();
    let app = app!(state);
    let id = open_view_id!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "this will fail" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["outcome"], "call_threw");
    assert_eq!(body["view"]["result"], Value::Null);
    assert_eq!(body["view"]["output"]["kind"], "placeholder");
    let alert = body["alert"].as_str().unwrap();
    assert!(alert.starts_with("An error occurred: "));
    assert!(alert.contains("session expired"));
}

#[actix_web::test]
async fn test_selected_file_is_display_only() {
    let (state, backend) = scripted_state();
    let app = app!(state);
    let id = open_view_id!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/file", id))
        .set_json(json!({ "name": "standup.mp3" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["file_name"], "standup.mp3");
    assert_eq!(view["file_prompt"], "Selected: standup.mp3");
    assert_eq!(view["output"]["kind"], "placeholder");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "daily standup" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"]["file_name"], "standup.mp3");

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], AnalysisRequest::new("daily standup"));
}

#[actix_web::test]
async fn test_unknown_and_closed_views() {
    let (state, _) = scripted_state();
    let app = app!(state);

    let missing = uuid::Uuid::new_v4();
    let req = test::TestRequest::get().uri(&format!("/api/v1/views/{}", missing)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    let id = open_view_id!(&app);
    let req = test::TestRequest::delete().uri(&format!("/api/v1/views/{}", id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "too late" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
    assert_eq!(state.view_count().await, 0);
}

#[actix_web::test]
async fn test_submit_through_http_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "description": "product demo" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "body": "Speaker 1 introduces the app." },
            "errors": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = AppState::new(test_config(&format!("{}/ask", server.uri())));
    let app = app!(state);
    let id = open_view_id!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "product demo" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["view"]["result"], "Speaker 1 introduces the app.");
}

#[actix_web::test]
async fn test_second_submit_conflicts_while_loading() {
    let (backend, release) = GatedBackend::new();
    let mut config = test_config("http://localhost:9/fn");
    config.submission_policy = SubmissionPolicy::RejectWhileLoading;
    let state = AppState::with_backend(config, backend);
    let app = app!(state);
    let id = open_view_id!(&app);
    let view_id: Uuid = id.parse().unwrap();

    let first_req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "first clip" }))
        .to_request();
    let second_req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "second clip" }))
        .to_request();

    let (first, second) = tokio::join!(test::call_service(&app, first_req), async {
        let controller = state.view(view_id).await.unwrap();
        while controller.pending_calls().await == 0 {
            tokio::task::yield_now().await;
        }
        let resp = test::call_service(&app, second_req).await;
        release.send(RemoteResponse::with_body("first answer")).ok();
        resp
    });

    assert_eq!(second.status(), 409);
    let body: Value = test::read_body_json(second).await;
    assert!(body["error"].as_str().unwrap().contains("already in flight"));

    assert_eq!(first.status(), 200);
    let body: Value = test::read_body_json(first).await;
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["view"]["result"], "first answer");

    let req = test::TestRequest::get().uri(&format!("/api/v1/views/{}", id)).to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["result"], "first answer");
    assert_eq!(view["loading"], false);
}

#[actix_web::test]
async fn test_alert_belongs_to_the_failed_submission_only() {
    let (state, _) = scripted_state();
    let app = app!(state);
    let id = open_view_id!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "this will fail" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["alert"].is_string());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/views/{}/submit", id))
        .set_json(json!({ "description": "retry" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["alert"], Value::Null);
    assert!(body["view"].get("alert").is_none());
}

#[actix_web::test]
async fn test_page_shows_loading_before_submit_request() {
    let (state, _) = scripted_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/app.js").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let script = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    let handler = &script[script.find("form.addEventListener(\"submit\"").unwrap()..];
    let loading = handler.find("renderLoading()").unwrap();
    let request = handler.find("/submit`").unwrap();
    assert!(loading < request);
    assert!(!handler.contains("body.view.alert"));
}
