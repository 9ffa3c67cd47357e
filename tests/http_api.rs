use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use filedeck::browser::{BrowserSettings, FileBrowser, LoadState};
use filedeck::error::ApiError;
use filedeck::files::FileId;
use filedeck::identity::{UserId, UserIdentity};
use filedeck::{FileApi, HttpFileApi, ListQuery};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Requests seen by the stub server, as "METHOD path?query body".
#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<String>>,
}

type Shared = Arc<Recorder>;

fn record(state: &Shared, line: String) {
    state.requests.lock().push(line);
}

async fn list_files(State(state): State<Shared>, RawQuery(query): RawQuery) -> Result<Json<Value>, StatusCode> {
    let query = query.unwrap_or_default();
    record(&state, format!("GET /api/UserFiles?{query}"));
    if query.contains("userId=503") {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(json!({
        "result": [
            {"file_id": 11, "fileName": "a.txt", "mimeType": "text/plain"},
            {"file_id": 12, "fileName": "b.png", "thumbnail": {"data": "Zm9v"}}
        ],
        "totalCount": 2
    })))
}

async fn delete_one(
    State(state): State<Shared>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> StatusCode {
    record(&state, format!("DELETE /api/UserFiles/{id}?{}", query.unwrap_or_default()));
    if id == "404" {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn delete_many(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    record(&state, format!("DELETE /api/UserFiles {body}"));
    StatusCode::OK
}

async fn stream(State(state): State<Shared>, Path(id): Path<String>, RawQuery(query): RawQuery) -> String {
    record(&state, format!("GET /api/UserFiles/{id}/stream?{}", query.unwrap_or_default()));
    format!("contents of {id}")
}

async fn spawn_server() -> (String, Shared) {
    let state: Shared = Arc::new(Recorder::default());
    let app = Router::new()
        .route("/api/UserFiles", get(list_files).delete(delete_many))
        .route("/api/UserFiles/{id}", delete(delete_one))
        .route("/api/UserFiles/{id}/stream", get(stream))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn client(base_url: &str) -> HttpFileApi {
    HttpFileApi::new(base_url, Duration::from_secs(5)).unwrap()
}

fn query(user: i64) -> ListQuery {
    ListQuery {
        user_id: UserId::Int(user),
        page: 1,
        page_size: 20,
        search: Some("a b".into()),
        category: None,
    }
}

#[tokio::test]
async fn list_sends_only_present_parameters() {
    let (base, state) = spawn_server().await;
    let payload = client(&base).list(&query(7)).await.unwrap();

    assert_eq!(payload["totalCount"], json!(2));
    assert_eq!(
        state.requests.lock().clone(),
        vec!["GET /api/UserFiles?userId=7&page=1&pageSize=20&search=a%20b".to_string()]
    );
}

#[tokio::test]
async fn non_ok_status_is_a_failure() {
    let (base, _state) = spawn_server().await;
    let err = client(&base).list(&query(503)).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));

    let err = client(&base)
        .delete(&UserId::Int(1), &FileId::Int(404))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn deletes_and_streams_hit_their_endpoints() {
    let (base, state) = spawn_server().await;
    let api = client(&base);
    let user = UserId::Text("u1".into());

    api.delete(&user, &FileId::from("f-9")).await.unwrap();
    api.bulk_delete(&user, &[FileId::Int(1), FileId::from("two")]).await.unwrap();
    let text = api.stream_text(&user, &FileId::Int(5)).await.unwrap();
    assert_eq!(text, "contents of 5");

    let requests = state.requests.lock().clone();
    assert_eq!(requests[0], "DELETE /api/UserFiles/f-9?userId=u1");
    let body: Value = serde_json::from_str(
        requests[1].strip_prefix("DELETE /api/UserFiles ").unwrap(),
    )
    .unwrap();
    assert_eq!(body, json!({"user_id": "u1", "file_ids": [1, "two"]}));
    assert_eq!(requests[2], "GET /api/UserFiles/5/stream?userId=u1");
}

#[tokio::test]
async fn browser_over_http() {
    let (base, state) = spawn_server().await;
    let mut browser = FileBrowser::new(client(&base), BrowserSettings::default());
    browser.set_user(Some(UserIdentity::with_id(UserId::Int(3)))).await;

    assert_eq!(browser.state(), &LoadState::Loaded);
    assert_eq!(browser.total(), Some(2));
    assert!(!browser.has_more());
    let names: Vec<String> = browser.files().iter().map(|r| r.display_name()).collect();
    assert_eq!(names, ["a.txt", "b.png"]);
    assert_eq!(
        browser.files().items()[1].thumbnail_url().as_deref(),
        Some("data:image/jpeg;base64,Zm9v")
    );

    browser.delete(&FileId::Int(11)).await.unwrap();
    assert_eq!(browser.files().ids(), vec![FileId::Int(12)]);
    assert!(state
        .requests
        .lock()
        .contains(&"DELETE /api/UserFiles/11?userId=3".to_string()));
}
