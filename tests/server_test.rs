// Integration tests for the HTTP server

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use sanctum::chat::{ChatEngine, SessionManager, DEFAULT_MAX_MESSAGE_CHARS};
use sanctum::responder::TemplateResponder;
use sanctum::server::{create_router, CompanionServer, ServerConfig};
use sanctum::store::{
    ChatHistoryStore, CrisisEventStore, EmergencyContact, MemoryChatHistory, MemoryCrisisEvents,
    MemoryProfileStore, UserProfile,
};

struct TestApp {
    router: axum::Router,
    history: Arc<MemoryChatHistory>,
    crisis_events: Arc<MemoryCrisisEvents>,
}

fn test_app() -> TestApp {
    let profiles = Arc::new(MemoryProfileStore::new());
    profiles.insert(UserProfile {
        subject_id: "user-1".to_string(),
        user_name: "Jordan".to_string(),
        companion_name: "Willow".to_string(),
        primary_diagnosis: "Generalized Anxiety Disorder".to_string(),
        emergency_contacts: vec![EmergencyContact {
            name: "Sam".to_string(),
            phone: "555-0100".to_string(),
        }],
        local_crisis_resources: None,
    });

    let history = Arc::new(MemoryChatHistory::new());
    let crisis_events = Arc::new(MemoryCrisisEvents::new());

    let engine = Arc::new(ChatEngine::new(
        profiles,
        Arc::clone(&history) as Arc<dyn ChatHistoryStore>,
        Arc::clone(&crisis_events) as Arc<dyn CrisisEventStore>,
        Arc::new(TemplateResponder::new()),
        Arc::new(SessionManager::new(30)),
        DEFAULT_MAX_MESSAGE_CHARS,
    ));

    let server = Arc::new(CompanionServer::new(
        engine,
        Arc::clone(&history) as Arc<dyn ChatHistoryStore>,
        ServerConfig::default(),
    ));

    TestApp {
        router: create_router(server),
        history,
        crisis_events,
    }
}

fn chat_request(subject: Option<&str>, message: &str) -> Request<Body> {
    let body = serde_json::json!({ "message": message }).to_string();
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json");
    if let Some(subject) = subject {
        builder = builder.header("x-subject-id", subject);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_requires_subject_header() {
    let app = test_app();

    let response = app
        .router
        .oneshot(chat_request(None, "hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_message_is_400_with_no_writes() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(chat_request(Some("user-1"), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("required"));

    assert!(app.history.list("user-1").await.unwrap().is_empty());
    assert!(app.crisis_events.list("user-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_message_is_400() {
    let app = test_app();
    let long = "a".repeat(2001);

    let response = app
        .router
        .oneshot(chat_request(Some("user-1"), &long))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("too long"));
}

#[tokio::test]
async fn test_unknown_subject_is_404() {
    let app = test_app();

    let response = app
        .router
        .oneshot(chat_request(Some("stranger"), "hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_crisis_message_returns_crisis_response() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(chat_request(Some("user-1"), "I want to die"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["isCrisis"], true);
    assert!(body["reply"].as_str().unwrap().contains("988"));

    // Audit record was written synchronously before responding.
    let events = app.crisis_events.list("user-1").await.unwrap();
    assert_eq!(events.len(), 1);

    // Follow-up state is visible on the session-status endpoint.
    let status = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/session-status")
                .header("x-subject-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(status).await;
    assert_eq!(body["awaiting_safety_confirmation"], true);
}

#[tokio::test]
async fn test_normal_message_tagged_with_framework() {
    let app = test_app();

    let response = app
        .router
        .oneshot(chat_request(
            Some("user-1"),
            "I'm feeling anxious about my presentation",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.get("isCrisis").is_none());
    assert_eq!(body["framework"], "cbt");
}

#[tokio::test]
async fn test_history_returns_turns_in_order() {
    let app = test_app();

    for message in ["hello there", "I'm feeling anxious"] {
        let response = app
            .router
            .clone()
            .oneshot(chat_request(Some("user-1"), message))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // History writes are fire-and-forget; give them a moment to land.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/history")
                .header("x-subject-id", "user-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let turns = body["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["user_message"], "hello there");
    assert_eq!(turns[1]["user_message"], "I'm feeling anxious");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}
