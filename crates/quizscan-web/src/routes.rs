use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/upload-pdf", post(handlers::upload::upload_pdf))
        .route("/save-questions", post(handlers::questions::save_questions))
        .route("/questions/{class}", get(handlers::questions::get_questions))
        .route("/grade", post(handlers::grade::grade_answers))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::{Path, PathBuf};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    use quizscan_core::{
        BackendError, JsonFileStore, MemoryStore, Question, QuestionStore, RasterizationError,
        RecognitionError, Rasterizer, Recognizer, StoreError, TextExtractor, UserRegistry,
    };
    use quizscan_ingest::{QuestionPipeline, TextAcquirer};
    use quizscan_parsing::QuestionParser;

    const BOUNDARY: &str = "quizscan-test-boundary";
    const SHEET: &str =
        "Class 5 Quiz\n2) 2+2? A)3 B)4 C)5 D)6\n1) Capital of France? A. Paris B. Lyon C. Nice D. Lille";

    struct FixedText(&'static str);

    impl TextExtractor for FixedText {
        fn extract_text(&self, _path: &Path) -> Result<String, BackendError> {
            Ok(self.0.to_string())
        }
    }

    struct NoRenderer;

    impl Rasterizer for NoRenderer {
        fn rasterize(&self, _: &Path, _: &Path) -> Result<Vec<PathBuf>, RasterizationError> {
            Err(RasterizationError::NoPages)
        }
    }

    struct NoEngine;

    impl Recognizer for NoEngine {
        fn recognize(&self, _: &Path) -> Result<String, RecognitionError> {
            Ok(String::new())
        }
    }

    /// Holds every save until the test releases it. Fails the save if the
    /// release never arrives.
    struct GatedStore {
        inner: MemoryStore,
        entered: Arc<AtomicBool>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl QuestionStore for GatedStore {
        fn questions(&self, class: &str) -> Option<Vec<Question>> {
            self.inner.questions(class)
        }

        fn replace(&self, class: &str, questions: Vec<Question>) -> Result<(), StoreError> {
            self.entered.store(true, Ordering::SeqCst);
            self.release
                .lock()
                .map_err(|_| StoreError::Poisoned)?
                .recv_timeout(Duration::from_secs(2))
                .map_err(|_| StoreError::Poisoned)?;
            self.inner.replace(class, questions)
        }
    }

    fn state_with(store: Arc<dyn QuestionStore>, text: &'static str) -> Arc<AppState> {
        let acquirer = TextAcquirer::new(FixedText(text), NoRenderer, NoEngine);
        Arc::new(AppState {
            store,
            users: UserRegistry::new(),
            pipeline: Arc::new(QuestionPipeline::new(acquirer, QuestionParser::new())),
            questions_path_display: "memory".into(),
        })
    }

    fn app() -> Router {
        router(state_with(Arc::new(MemoryStore::new()), SHEET), 1024 * 1024)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn multipart(class: Option<&str>, pdf: Option<&[u8]>) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(class) = class {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"class\"\r\n\r\n{class}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(pdf) = pdf {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"pdf\"; filename=\"quiz.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(pdf);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload-pdf")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn index_page_is_served() {
        let response = app().oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("quizscan is running"));
    }

    #[tokio::test]
    async fn upload_returns_sorted_normalized_questions() {
        let (status, body) = send(&app(), multipart(Some("5"), Some(b"%PDF-1.4"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["class"], "5");
        assert_eq!(body["parsedCount"], 2);
        assert!(body["message"].is_string());
        assert_eq!(body["questions"][0]["id"], 1);
        assert_eq!(body["questions"][0]["text"], "Capital of France?");
        assert_eq!(body["questions"][1]["choices"], json!(["3", "4", "5", "6"]));
    }

    #[tokio::test]
    async fn upload_with_unreadable_document_parses_nothing() {
        let app = router(
            state_with(Arc::new(MemoryStore::new()), "0123456789"),
            1024 * 1024,
        );
        let (status, body) = send(&app, multipart(Some("5"), Some(b"scan"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["parsedCount"], 0);
        assert_eq!(body["questions"], json!([]));
    }

    #[tokio::test]
    async fn upload_requires_class_and_file() {
        let (status, body) = send(&app(), multipart(None, Some(b"%PDF"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Class is required");

        let (status, body) = send(&app(), multipart(Some("  "), Some(b"%PDF"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Class is required");

        let (status, body) = send(&app(), multipart(Some("5"), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "PDF file is missing");
    }

    #[tokio::test]
    async fn save_then_fetch_round_trips_through_normalization() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/save-questions",
                json!({
                    "class": "7",
                    "questions": [
                        {"id": 3, "text": "Third", "choices": ["a", "b", "c", "d", "e"]},
                        {"id": 1, "text": "First", "choices": ["x"], "correctAnswerIndex": 0, "points": 5},
                        {"text": "No id", "correctAnswerIndex": 9, "points": "lots"}
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Saved 3 questions for class 7.");

        let (status, body) = send(&app, get_req("/questions/7")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["id"].as_u64().unwrap())
            .collect();
        // The id-less draft sorts first and defaults to its position.
        assert_eq!(ids, vec![1, 1, 3]);
        assert_eq!(body[0]["correctAnswerIndex"], Value::Null);
        assert_eq!(body[0]["points"], Value::Null);
        assert_eq!(body[1]["choices"], json!(["x", "", "", ""]));
        assert_eq!(body[1]["points"], 5.0);
        assert_eq!(body[2]["choices"], json!(["a", "b", "c", "d"]));
    }

    #[tokio::test]
    async fn save_rejects_invalid_payloads() {
        let app = app();
        for payload in [
            json!({"class": "", "questions": []}),
            json!({"class": "7"}),
            json!({"questions": []}),
            json!({"class": "7", "questions": "not a list"}),
        ] {
            let (status, body) = send(&app, post_json("/save-questions", payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid data");
        }

        let request = Request::builder()
            .method("POST")
            .uri("/save-questions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid data");
    }

    #[tokio::test]
    async fn unknown_class_is_not_found() {
        let app = app();
        let (status, body) = send(&app, get_req("/questions/unknown")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, _) = send(
            &app,
            post_json("/grade", json!({"class": "unknown", "answers": []})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn grading_sums_points_for_correct_answers() {
        let app = app();
        send(
            &app,
            post_json(
                "/save-questions",
                json!({
                    "class": "5",
                    "questions": [
                        {"id": 1, "text": "Q1", "correctAnswerIndex": 1, "points": 10},
                        {"id": 2, "text": "Q2", "correctAnswerIndex": 0, "points": 5},
                        {"id": 3, "text": "Q3", "correctAnswerIndex": 2}
                    ]
                }),
            ),
        )
        .await;

        let (status, body) = send(
            &app,
            post_json(
                "/grade",
                json!({
                    "class": "5",
                    "answers": [
                        {"id": 1, "selectedIndex": 1},
                        {"id": 2, "selectedIndex": 3},
                        {"id": 3, "selectedIndex": 2},
                        {"id": 99, "selectedIndex": 0}
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalScore"], 10.0);

        let (status, _) = send(&app, post_json("/grade", json!({"class": "5"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn grading_skips_malformed_answer_entries() {
        let app = app();
        send(
            &app,
            post_json(
                "/save-questions",
                json!({
                    "class": "6",
                    "questions": [
                        {"id": 1, "text": "Q1", "correctAnswerIndex": 1, "points": 3},
                        {"id": 2, "text": "Q2", "correctAnswerIndex": 0, "points": 7}
                    ]
                }),
            ),
        )
        .await;

        let (status, body) = send(
            &app,
            post_json(
                "/grade",
                json!({
                    "class": "6",
                    "answers": [
                        {"id": 1, "selectedIndex": 1},
                        {"id": "2", "selectedIndex": 0},
                        {"selectedIndex": 0}
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalScore"], 3.0);
    }

    #[tokio::test]
    async fn register_and_login() {
        let app = app();
        let user = json!({"username": "Ayse", "password": "secret", "class": "5"});

        let (status, body) = send(&app, post_json("/register", user.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Registration successful");

        let (status, body) = send(&app, post_json("/register", user)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User already exists");

        let (status, _) = send(
            &app,
            post_json("/register", json!({"username": "Ali", "class": "5"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            post_json("/login", json!({"username": "ayse", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"username": "Ayse", "class": "5", "score": 0.0, "role": "student"})
        );

        let (status, body) = send(
            &app,
            post_json("/login", json!({"username": "Ayse", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn save_does_not_block_the_runtime_thread() {
        let (release, gate) = mpsc::channel();
        let entered = Arc::new(AtomicBool::new(false));
        let store = Arc::new(GatedStore {
            inner: MemoryStore::new(),
            entered: Arc::clone(&entered),
            release: Mutex::new(gate),
        });
        let app = router(state_with(store, SHEET), 1024 * 1024);

        let save = tokio::spawn({
            let app = app.clone();
            async move {
                send(
                    &app,
                    post_json(
                        "/save-questions",
                        json!({"class": "4", "questions": [{"id": 1, "text": "Q"}]}),
                    ),
                )
                .await
            }
        });

        // Single-threaded runtime: this loop only gets to run again if the
        // store write happens off the runtime thread.
        while !entered.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        let _ = release.send(());

        let (status, _) = save.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, get_req("/questions/4")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["text"], "Q");
    }

    #[tokio::test]
    async fn saved_questions_persist_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        let store = Arc::new(JsonFileStore::open(&path));
        let app = router(state_with(store, SHEET), 1024 * 1024);

        let (status, _) = send(
            &app,
            post_json(
                "/save-questions",
                json!({"class": "9", "questions": [{"id": 1, "text": "Q"}]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let reopened = JsonFileStore::open(&path);
        let questions = reopened.questions("9").unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Q");
    }
}
