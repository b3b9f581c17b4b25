pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::profile::handlers as bios;
use crate::render::handlers as render;
use crate::state::AppState;

/// Uploaded documents may exceed axum's 2 MB default.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Bio extraction
        .route("/api/v1/bios/extract", post(bios::handle_extract))
        .route(
            "/api/v1/bios/extract/upload",
            post(bios::handle_extract_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/bios/generate", post(bios::handle_generate))
        .route("/api/v1/bios/reconcile", post(bios::handle_reconcile))
        .route("/api/v1/bios/validate", post(bios::handle_validate))
        // Rendering
        .route("/api/v1/render", post(render::handle_render))
        .route("/api/v1/render-plans", post(render::handle_create_plan))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::ladder::testing::ScriptedService;
    use crate::render::plan::load_plan;
    use crate::state::PromptSet;

    fn state(replies: &[&str]) -> AppState {
        let config = Config::from_lookup(|key| (key == "LLM_BACKEND").then(|| "ollama".to_string()))
            .unwrap();
        AppState {
            llm: Arc::new(ScriptedService::replies(replies)),
            config,
            prompts: Arc::new(PromptSet::load(None)),
            default_plan: None,
        }
    }

    fn app(replies: &[&str]) -> Router {
        build_router(state(replies))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload(file_name: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--XBOUNDARY\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {contents}\r\n\
             --XBOUNDARY--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/v1/bios/extract/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(&[]), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["llm_backend"], "scripted");
    }

    #[tokio::test]
    async fn test_extract_from_lines() {
        let (status, body) = send(
            app(&[]),
            post_json("/api/v1/bios/extract", json!({"lines": ["Jane Doe", "Partner"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "heuristic");
        assert_eq!(body["bio"]["full_name"], "Jane Doe");
        assert_eq!(body["bio"]["current_title"], "Partner");
        assert_eq!(body["manifest"]["title"], "Partner");
    }

    #[tokio::test]
    async fn test_extract_without_text_is_bad_request() {
        let (status, body) = send(
            app(&[]),
            post_json("/api/v1/bios/extract", json!({"lines": ["  ", ""]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_upload_plain_text_document() {
        let (status, body) = send(app(&[]), upload("bio.txt", "Jane Doe\nPartner\n")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "upload");
        assert_eq!(body["bio"]["full_name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_upload_legacy_doc_is_unprocessable() {
        let (status, body) = send(app(&[]), upload("bio.doc", "binary")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_generate_reconciles_model_output() {
        let reply = r#"{"full_name": "jane doe", "expertise_bullets": "Pricing; Strategy"}"#;
        let (status, body) = send(
            app(&[reply]),
            post_json("/api/v1/bios/generate", json!({"text": "Jane Doe\nPartner"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "model");
        assert_eq!(body["bio"]["full_name"], "Jane Doe");
        assert_eq!(body["bio"]["expertise_bullets"], json!(["Pricing", "Strategy"]));
    }

    #[tokio::test]
    async fn test_generate_without_parsable_output() {
        let (status, body) = send(
            app(&["not json", "still not json", "nope"]),
            post_json("/api/v1/bios/generate", json!({"text": "Jane Doe"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "NO_STRUCTURED_DATA");
        assert_eq!(body["error"]["details"]["last_raw"], "nope");
    }

    #[tokio::test]
    async fn test_validate_reports_failing_field() {
        let (status, body) = send(
            app(&[]),
            post_json(
                "/api/v1/bios/validate",
                json!({"bio": {"full_name": "Jane Doe", "email": "not-an-email"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"]["field"], "email");
    }

    #[tokio::test]
    async fn test_reconcile_repairs_name() {
        let (status, body) = send(
            app(&[]),
            post_json(
                "/api/v1/bios/reconcile",
                json!({"payload": {"full_name": ""}, "source_text": "John Q. Public\nPartner"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bio"]["full_name"], "John Q. Public");
    }

    #[tokio::test]
    async fn test_render_with_template_styles() {
        let (status, body) = send(
            app(&[]),
            post_json(
                "/api/v1/render",
                json!({
                    "bio": {"full_name": "Jane Doe", "expertise_bullets": ["Pricing"]},
                    "plan": {
                        "header": {"line_order": ["name"]},
                        "sections": [{"key": "expertise", "label": "Expertise"}]
                    },
                    "template_styles": ["Heading 1", "Heading 2"]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["paragraphs"],
            json!([
                {"text": "Jane Doe", "style": "Heading 1"},
                {"text": "Expertise", "style": "Heading 2"},
                {"text": "Pricing", "style": null}
            ])
        );
        assert_eq!(body["summary"]["unstyled"], 1);
    }

    #[tokio::test]
    async fn test_render_plan_from_exemplar() {
        let reply = r#"{"sections": [{"key": "expertise", "label": "Areas of Focus"}]}"#;
        let (status, body) = send(
            app(&[reply]),
            post_json(
                "/api/v1/render-plans",
                json!({"paragraphs": [{"style_name": "Heading 2", "text": "Areas of Focus"}]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plan"]["sections"][0]["label"], "Areas of Focus");
    }

    #[tokio::test]
    async fn test_render_without_any_plan_is_bad_request() {
        let (status, _) = send(
            app(&[]),
            post_json("/api/v1/render", json!({"bio": {"full_name": "Jane Doe"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_render_with_default_plan_saves_document() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.json");
        std::fs::write(
            &plan_path,
            "\u{feff}{\"header\": {\"line_order\": [\"name\", \"title\"]}, \"sections\": [],}",
        )
        .unwrap();

        let mut state = state(&[]);
        state.default_plan = Some(Arc::new(load_plan(&plan_path).unwrap()));
        state.config.render_output_dir = Some(dir.path().join("out"));

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/v1/render",
                json!({"bio": {"full_name": "jane doe", "current_title": "partner"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["paragraphs"], 2);

        let saved = body["saved_to"].as_str().unwrap();
        let document: Value = serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
        assert_eq!(document["paragraphs"][0]["text"], "Jane Doe");
        assert_eq!(document["paragraphs"][1]["style"], "Subtitle");
    }
}
