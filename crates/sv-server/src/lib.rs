//! HTTP server for SheetVault.
//!
//! Exposes the namespace manager and the camp registry:
//!
//! - `POST /character-sheets` -- save (create, update or rename)
//! - `GET /character-sheets?key=...` -- load one sheet
//! - `GET /character-sheets/names` -- list distinct display names
//! - `POST /camps` -- create a camp and mint its code
//! - `GET /camps?code=...` -- fetch a camp by code
//! - `GET /health`, `GET /info` -- liveness and build/namespace info
//!
//! CORS preflight is answered by the `tower-http` layer.

pub mod camp;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use camp::{Camp, CampDetails, CampRegistry};
pub use config::{ServerConfig, StoreConfig};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::SheetServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use sv_namespace::NamespaceManager;
    use sv_store::{InMemoryObjectStore, ObjectStore};
    use tower::util::ServiceExt;

    fn app() -> (Arc<InMemoryObjectStore>, Router) {
        let store = Arc::new(InMemoryObjectStore::new());
        let manager = Arc::new(NamespaceManager::with_defaults(store.clone()));
        (store, build_router(AppState::new(manager)))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn save(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/character-sheets")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (_store, app) = app();
        let (status, _) = send(&app, get("/health")).await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn save_load_list_flow() {
        let (store, app) = app();

        let (status, body) = send(
            &app,
            save(json!({"key": "character-sheets/Alice|:|id1.json", "body": {"hp": 12}})),
        )
        .await;
        assert_eq!(status, 200);
        let saved: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(saved["status"], "created");
        assert_eq!(saved["key"], "character-sheets/Alice|:|id1.json");
        assert!(store.exists("character-sheets/Alice|:|id1.json").await.unwrap());

        let response = app
            .clone()
            .oneshot(get("/character-sheets?key=Alice"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{\"hp\":12}");

        let (status, body) = send(&app, get("/character-sheets/names")).await;
        assert_eq!(status, 200);
        let names: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(names, vec!["Alice"]);
    }

    #[tokio::test]
    async fn rename_via_name_and_id() {
        let (store, app) = app();
        send(&app, save(json!({"name": "Alice", "id": "id1", "body": "{}"}))).await;
        let (status, body) =
            send(&app, save(json!({"name": "Bob", "id": "id1", "body": "{\"v\":2}"}))).await;
        assert_eq!(status, 200);
        let saved: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(saved["status"], "renamed");
        assert_eq!(store.all_keys(), vec!["character-sheets/Bob|:|id1.json".to_string()]);
    }

    #[tokio::test]
    async fn conflict_is_409() {
        let (_store, app) = app();
        send(&app, save(json!({"key": "Alice|:|id1", "body": "{}"}))).await;
        let (status, body) = send(&app, save(json!({"key": "Alice|:|id2", "body": "{}"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["message"], "Character name \"Alice\" already exists.");
    }

    #[tokio::test]
    async fn missing_body_is_400() {
        let (store, app) = app();
        let (status, _) = send(&app, save(json!({"key": "Alice|:|id1"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, save(json!({"body": {"hp": 1}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn load_errors() {
        let (_store, app) = app();
        send(&app, save(json!({"name": "Alice Report", "id": "1", "body": "r"}))).await;
        send(&app, save(json!({"name": "Alice Summary", "id": "2", "body": "s"}))).await;

        let (status, _) = send(&app, get("/character-sheets")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/character-sheets?key=Nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, get("/character-sheets?key=Alice")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["keys"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn info_reports_prefix() {
        let (_store, app) = app();
        let (status, body) = send(&app, get("/info")).await;
        assert_eq!(status, 200);
        let info: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(info["name"], "sv-server");
        assert_eq!(info["prefix"], "character-sheets/");
    }

    #[tokio::test]
    async fn invalid_content_type_is_rejected_on_save() {
        let (store, app) = app();
        let (status, _) = send(
            &app,
            save(json!({"name": "Alice", "id": "id1", "body": "{}", "contentType": "text/plain\n"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn camp_create_then_fetch_by_code() {
        let (store, app) = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/camps")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"name": "Riverside"}).to_string()))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, 200);
        let created: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(created["message"], "Camp created successfully");
        let code = created["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 6);
        assert!(store.exists(&format!("camps/{code}.json")).await.unwrap());

        let (status, body) = send(&app, get(&format!("/camps?code={code}"))).await;
        assert_eq!(status, 200);
        let camp: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(camp["details"]["name"], "Riverside");
        assert_eq!(camp["details"]["code"], code.as_str());

        // Camps never show up as character sheets.
        let (_, body) = send(&app, get("/character-sheets/names")).await;
        let names: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn camp_errors() {
        let (_store, app) = app();
        let (status, body) = send(&app, get("/camps")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["message"], "Camp code is required");

        let (status, body) = send(&app, get("/camps?code=ZZZZZZ")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["message"], "Camp not found");
    }

    #[tokio::test]
    async fn cors_preflight() {
        let (_store, app) = app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/character-sheets")
            .header(header::ORIGIN, "https://sheets.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
