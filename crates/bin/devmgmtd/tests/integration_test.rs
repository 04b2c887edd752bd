//! End-to-end smoke tests for the full devmgmtd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, the real
//! filesystem adapters over a scratch directory, real services, real axum
//! router) and exercises the HTTP layer via `tower::ServiceExt::oneshot` —
//! no TCP port is bound.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use devmgmt_adapter_fs::{FsDatasets, FsVersionSource};
use devmgmt_adapter_http_axum::router;
use devmgmt_adapter_http_axum::state::AppState;
use devmgmt_adapter_location_http::HttpLocationApi;
use devmgmt_adapter_storage_sqlite_sqlx::{Config, SqliteDocumentStore};
use devmgmt_app::ports::{Collection, DocumentStore};
use devmgmt_domain::telemetry::Producer;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Scratch data directory with a version marker and bundled datasets.
struct DataDir(PathBuf);

impl DataDir {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!(
            "devmgmtd-it-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        let dir = Self(root);
        dir.write("version.txt", "3.1.0\n");
        dir.write(
            "location/state.json",
            r#"{"result":{"response":[
                {"id":"ka","name":"Karnataka","type":"state"},
                {"id":"mh","name":"Maharashtra","type":"state"}
            ]}}"#,
        );
        dir.write(
            "location/district-ka.json",
            r#"{"result":{"response":[{"id":"blr","name":"Bengaluru","parentId":"ka","type":"district"}]}}"#,
        );
        dir.write(
            "resourceBundles/en.json",
            r#"{"result":{"consumption":{"frmelmnts":{"lbl":{"home":"Home"}}}}}"#,
        );
        dir
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.0.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for DataDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app(data: &DataDir) -> (axum::Router, SqliteDocumentStore) {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let store = SqliteDocumentStore::new(db.pool().clone());

    let state = AppState::new(
        store.clone(),
        None::<HttpLocationApi>,
        FsVersionSource::new(data.path().join("version.txt")),
        Producer::new("it-device"),
    );
    let datasets = FsDatasets::new(data.path());
    state.location_service.bootstrap(&datasets).await.unwrap();
    state
        .resource_bundle_service
        .bootstrap(&datasets)
        .await
        .unwrap();

    (router::build(state), store)
}

async fn call(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let data = DataDir::new();
    let (app, _) = app(&data).await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_search_bootstrapped_states_and_districts() {
    let data = DataDir::new();
    let (app, _) = app(&data).await;

    let (status, json) = call(
        &app,
        "POST",
        "/location/search",
        Some(json!({ "request": { "filters": { "type": "state" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let states = json["result"]["response"].as_array().unwrap();
    assert_eq!(states.len(), 2);
    assert!(states.iter().all(|s| s.get("data").is_none()));

    let (status, json) = call(
        &app,
        "POST",
        "/location/search",
        Some(json!({ "request": { "filters": { "type": "district", "parentId": "ka" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["response"][0]["name"], "Bengaluru");

    let (status, json) = call(
        &app,
        "POST",
        "/location/search",
        Some(json!({ "request": { "filters": { "type": "district", "parentId": "mh" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["response"], json!([]));
}

#[tokio::test]
async fn should_return_not_found_for_districts_of_unknown_state() {
    let data = DataDir::new();
    let (app, _) = app(&data).await;

    let (status, json) = call(
        &app,
        "POST",
        "/location/search",
        Some(json!({ "request": { "filters": { "type": "district", "parentId": "zz" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["responseCode"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn should_persist_saved_location() {
    let data = DataDir::new();
    let (app, store) = app(&data).await;

    let (status, _) = call(
        &app,
        "POST",
        "/location/save",
        Some(json!({ "request": { "state": { "id": "ka" }, "city": { "id": "blr" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let saved = store.get(Collection::Settings, "location").await.unwrap().unwrap();
    assert_eq!(saved.body["city"]["id"], "blr");
}

// ---------------------------------------------------------------------------
// Resource bundles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_serve_bootstrapped_resource_bundle() {
    let data = DataDir::new();
    let (app, _) = app(&data).await;

    let (status, json) = call(&app, "GET", "/resourcebundles/en", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["consumption"]["frmelmnts"]["lbl"]["home"], "Home");

    let (status, _) = call(&app, "GET", "/resourcebundles/ta", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Device admin
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_manage_users_through_admin_routes() {
    let data = DataDir::new();
    let (app, store) = app(&data).await;

    let (status, _) = call(
        &app,
        "POST",
        "/user/create",
        Some(json!({ "actor": "admin", "username": "ravi", "permissions": ["read"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = call(
        &app,
        "POST",
        "/user/update",
        Some(json!({ "username": "ravi", "value": "[\"read\",\"write\"]", "oldValue": ["read"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["response"]["permissions"], json!(["read", "write"]));

    let user = store.get(Collection::Users, "ravi").await.unwrap().unwrap();
    assert_eq!(user.body["permissions"], json!(["read", "write"]));

    let (status, _) = call(&app, "DELETE", "/user/delete/ravi", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "DELETE", "/user/delete/ravi", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_keep_serving_admin_routes_without_version_marker() {
    let data = DataDir::new();
    let (app, store) = app(&data).await;
    std::fs::remove_file(data.path().join("version.txt")).unwrap();

    let (status, _) = call(&app, "POST", "/ssid/set", Some(json!({ "ssid": "rap-net" }))).await;
    assert_eq!(status, StatusCode::OK);

    let config = store.get(Collection::Config, "ssid").await.unwrap().unwrap();
    assert_eq!(config.body["ssid"], "rap-net");
}
