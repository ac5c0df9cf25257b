//! Integration tests for StudyOS
//!
//! These tests drive the dispatcher, panel and exporter against a local
//! mock HTTP server.

use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use studyos::app::{PanelState, TaskPanel};
use studyos::client::{DispatchError, Dispatcher, Endpoints, HttpTransport};
use studyos::config::{load_config, ConfigFile};
use studyos::export;
use studyos::models::{StudyRequest, StudyResult, TaskKind};
use studyos::ui::{present, Palette};

fn dispatcher_for(base_url: &str) -> Dispatcher {
    let transport = HttpTransport::new().unwrap();
    Dispatcher::new(Arc::new(transport), Endpoints::new(base_url).unwrap())
}

#[tokio::test]
async fn test_doubt_explanation_end_to_end() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/solve-doubt")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "question": "What is inertia?" })))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "explanation": {
                    "summary": "Inertia is resistance to change in motion.",
                    "step_by_step": "1. Objects at rest stay at rest.",
                    "example": "Passengers lurch forward when a bus brakes.",
                    "key_takeaway": "More mass means more inertia."
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let mut panel = TaskPanel::new(TaskKind::Doubt);
    let state = panel
        .submit(&dispatcher, &StudyRequest::doubt("What is inertia?"))
        .await
        .unwrap()
        .clone();

    mock.assert_async().await;
    let result = match state {
        PanelState::Showing(result) => result,
        other => panic!("Expected a result, got {:?}", other),
    };

    let text = present(&result, &Palette::plain(), 80);
    for heading in ["Summary", "Step-by-Step Explanation", "Example", "Key Takeaway"] {
        assert!(text.contains(heading), "missing {}", heading);
    }
    assert!(text.contains("Passengers lurch forward when a bus brakes."));
    assert!(!dispatcher.is_loading());
}

#[tokio::test]
async fn test_plan_export_contains_day_line() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate-plan")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "subjects": "Physics",
            "syllabus": "Optics",
            "exam_date": "2025-01-01",
            "hours_per_day": 3
        })))
        .with_body(json!({ "plan": [{ "day": 1, "task": "Optics basics" }] }).to_string())
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let result = dispatcher
        .dispatch(&StudyRequest::plan("Physics", "Optics", "2025-01-01", "3"))
        .await
        .unwrap();
    mock.assert_async().await;

    let document = export::export("", &result);
    assert!(document.contains_line("Day 1 → Optics basics"));
    assert_eq!(document.file_name, "Study_Plan.pdf");

    let dir = tempfile::tempdir().unwrap();
    let path = export::save(&document, dir.path()).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let pdf = lopdf::Document::load_mem(&bytes).unwrap();
    let pages = pdf.get_pages();
    assert_eq!(pages.len(), 1);

    // Helvetica has no arrow glyph; the PDF spells it out
    let page_id = pages[&1];
    let content = pdf.get_page_content(page_id).unwrap();
    let content = String::from_utf8_lossy(&content);
    assert!(content.contains("(Day 1 -> Optics basics)"));
}

#[tokio::test]
async fn test_notes_without_result_shows_generic_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate-notes-ai")
        .match_body(Matcher::Json(json!({ "topic": "Optics", "content": "" })))
        .with_body("{}")
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let mut panel = TaskPanel::new(TaskKind::Notes);
    let state = panel
        .submit(&dispatcher, &StudyRequest::notes("Optics", ""))
        .await
        .unwrap();

    assert_eq!(
        state,
        &PanelState::Failed("Error generating notes".to_string())
    );
    assert!(panel.result().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_error_message_is_shown_verbatim() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate-plan")
        .with_status(200)
        .with_body(json!({ "error": "Exam date must be in the future" }).to_string())
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let err = dispatcher
        .dispatch(&StudyRequest::plan("Physics", "Optics", "2020-01-01", "2"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DispatchError::ServiceError(Some("Exam date must be in the future".to_string()))
    );
    assert_eq!(
        err.user_message(TaskKind::Plan),
        "Exam date must be in the future"
    );
}

#[tokio::test]
async fn test_error_status_with_json_body_is_parsed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/summarize-youtube")
        .with_status(500)
        .with_body(json!({ "error": "Could not fetch transcript" }).to_string())
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let err = dispatcher
        .dispatch(&StudyRequest::summary("https://youtu.be/abc"))
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(TaskKind::Summary),
        "Could not fetch transcript"
    );
}

#[tokio::test]
async fn test_flat_video_summary() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/summarize-youtube")
        .match_body(Matcher::Json(json!({ "url": "https://youtu.be/abc" })))
        .with_body(
            json!({
                "summary": "A tour of geometric optics.",
                "key_points": ["Reflection", "Refraction"],
                "takeaways": []
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let result = dispatcher
        .dispatch(&StudyRequest::summary(" https://youtu.be/abc "))
        .await
        .unwrap();

    match &result {
        StudyResult::Summary(summary) => {
            assert_eq!(summary.key_points, vec!["Reflection", "Refraction"]);
            assert!(summary.takeaways.is_empty());
        }
        other => panic!("Expected a summary, got {:?}", other),
    }

    let text = present(&result, &Palette::plain(), 80);
    assert!(text.contains("• Refraction"));
    assert!(!text.contains("Takeaways"));
}

#[tokio::test]
async fn test_non_json_body_is_connection_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/solve-doubt")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let err = dispatcher
        .dispatch(&StudyRequest::doubt("What is inertia?"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::ConnectionFailed(_)));
    assert_eq!(err.user_message(TaskKind::Doubt), "Backend connection error");
}

#[tokio::test]
async fn test_unreachable_service_is_connection_failure() {
    let dispatcher = dispatcher_for("http://127.0.0.1:1");
    let mut panel = TaskPanel::new(TaskKind::Doubt);

    let state = panel
        .submit(&dispatcher, &StudyRequest::doubt("What is inertia?"))
        .await
        .unwrap();

    assert_eq!(
        state,
        &PanelState::Failed("Backend connection error".to_string())
    );
    assert!(!dispatcher.is_loading());
}

#[tokio::test]
async fn test_missing_input_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    let mut panel = TaskPanel::new(TaskKind::Notes);
    let state = panel
        .submit(&dispatcher, &StudyRequest::notes("   ", "some content"))
        .await
        .unwrap();

    assert_eq!(state, &PanelState::Failed("Please enter a topic".to_string()));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_health_banner() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_body(json!({ "message": "AI StudyOS Backend Running 🚀" }).to_string())
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server.url());
    assert_eq!(
        dispatcher.health().await.unwrap(),
        "AI StudyOS Backend Running 🚀"
    );
}

#[tokio::test]
async fn test_configured_override_routes_one_tool() {
    let mut shared = Server::new_async().await;
    let mut notes = Server::new_async().await;

    let shared_mock = shared
        .mock("POST", "/solve-doubt")
        .with_body(json!({ "explanation": { "summary": "s" } }).to_string())
        .expect(1)
        .create_async()
        .await;
    let notes_mock = notes
        .mock("POST", "/generate-notes-ai")
        .with_body(json!({ "notes": { "summary": "n", "key_points": [], "formulas": [] } }).to_string())
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyos.toml");
    let mut file = ConfigFile::create_default(&path);
    file.config.service.base_url = shared.url();
    file.config.service.endpoints.notes = Some(notes.url());
    file.save(false).unwrap();

    let config = load_config(Some(path.as_path())).unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(HttpTransport::with_timeout(config.timeout()).unwrap()),
        config.endpoints().unwrap(),
    );

    dispatcher
        .dispatch(&StudyRequest::doubt("q"))
        .await
        .unwrap();
    dispatcher
        .dispatch(&StudyRequest::notes("Optics", ""))
        .await
        .unwrap();

    shared_mock.assert_async().await;
    notes_mock.assert_async().await;
}
