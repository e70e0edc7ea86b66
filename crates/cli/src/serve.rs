//! HTTP front end over a built workspace.
//!
//! JSON endpoints for search, preview, summary and the call graph, with
//! every other path served from the static directory on disk.

use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, Uri, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use goscope_core::Workspace;
use goscope_core::preview::FileManager;
use goscope_core::query::{QueryOptions, format_results};
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    workspace: Workspace,
    files: FileManager,
    assets: FileManager,
}

impl AppState {
    pub(crate) fn new(workspace: Workspace, config: &ServerConfig) -> Self {
        let files = workspace.file_manager().with_offset(config.preview_offset);
        Self {
            workspace,
            files,
            assets: FileManager::new(config.static_dir.clone()),
        }
    }
}

type SharedState = Arc<AppState>;
type Params = Query<HashMap<String, String>>;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".html") {
        "text/html; charset=utf-8"
    } else if path.ends_with(".js") {
        "application/javascript; charset=utf-8"
    } else if path.ends_with(".css") {
        "text/css; charset=utf-8"
    } else if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".json") {
        "application/json"
    } else if path.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

async fn summary(State(state): State<SharedState>) -> Response {
    Json(state.workspace.summary()).into_response()
}

async fn search(State(state): State<SharedState>, Query(params): Params) -> Response {
    let Some(input) = params.get("query").filter(|q| !q.is_empty()) else {
        return StatusCode::OK.into_response();
    };
    let get = |key: &str| params.get(key).map(String::as_str);
    let options = QueryOptions::lenient(get("sort"), get("limit"), get("type"), get("file"));

    let refs = state.workspace.query_engine().query(input, &options);
    debug!(query = %input, results = refs.len(), "search");
    Json(format_results(refs)).into_response()
}

async fn preview(State(state): State<SharedState>, Query(params): Params) -> Response {
    let Some(file) = params.get("file").filter(|f| !f.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "must specify file");
    };
    let Some(line) = params.get("line").filter(|l| !l.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "must specify line number");
    };
    let Ok(line) = line.trim().parse::<usize>() else {
        return error_response(StatusCode::BAD_REQUEST, "line must be an integer");
    };

    match state.files.preview(file, line) {
        Ok(preview) => Json(preview).into_response(),
        Err(e) => {
            warn!("preview of {}:{} failed: {}", file, line, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "error generating preview")
        }
    }
}

async fn callstack(State(state): State<SharedState>) -> Response {
    match state.workspace.call_graph() {
        Some(graph) => Json(graph).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "no entry function"),
    }
}

async fn serve_asset(State(state): State<SharedState>, uri: Uri) -> Response {
    let mut path = uri.path().trim_start_matches('/');
    if path.is_empty() {
        path = "index.html";
    }

    let Ok(full) = state.assets.resolve(path) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };
    match tokio::fs::read(&full).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(path))],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Logs the request line and status of every request, static assets included.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!(%method, %uri, status = response.status().as_u16(), "request");
    response
}

pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/summary.json", get(summary))
        .route("/search", get(search))
        .route("/preview", get(preview))
        .route("/callstack.json", get(callstack))
        .fallback(serve_asset)
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(state))
}

pub async fn run(root: PathBuf, config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let workspace =
        tokio::task::spawn_blocking(move || goscope_runtime::build_workspace(root)).await??;

    if let Some(graph) = workspace.call_graph() {
        let target = config.static_dir.join("callstack.json");
        match graph.write(&target) {
            Ok(()) => info!("wrote {}", target.display()),
            Err(e) => warn!("could not write {}: {}", target.display(), e),
        }
    }

    let app = build_app(AppState::new(workspace, &config));
    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    info!(port = config.port, "goscope server listening");
    println!("Serving on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use std::fs;
    use tower::ServiceExt;

    const MAIN: &str = "package main

import \"fmt\"

func main() {
	total := add(1, 2)
	fmt.Println(total)
}

func add(a, b int) int {
	return a + b
}
";

    fn app(with_main: bool) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let assets = dir.path().join("static");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&assets).unwrap();
        let source = if with_main {
            MAIN.to_string()
        } else {
            MAIN.replace("func main()", "func start()")
        };
        fs::write(src.join("main.go"), source).unwrap();
        fs::write(assets.join("index.html"), "<h1>goscope</h1>").unwrap();

        let workspace = goscope_runtime::build_workspace(src).unwrap();
        let config = ServerConfig {
            static_dir: assets,
            ..ServerConfig::default()
        };
        (dir, build_app(AppState::new(workspace, &config)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn search_returns_records() {
        let (_dir, app) = app(true);
        let (status, body) = get(app, "/search?query=tot&limit=bogus").await;
        assert_eq!(status, StatusCode::OK);
        let records = json(&body);
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["word"], "total");
        assert_eq!(records[0]["type"], "variable");
        assert_eq!(records[0]["within_fn"], "main (main.go:5)");
    }

    #[tokio::test]
    async fn search_without_query_is_empty() {
        let (_dir, app) = app(true);
        let (status, body) = get(app, "/search").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn preview_errors() {
        let (_dir, app) = app(true);
        let (status, body) = get(app.clone(), "/preview?line=3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "must specify file");

        let (_, body) = get(app.clone(), "/preview?file=main.go").await;
        assert_eq!(json(&body)["error"], "must specify line number");

        let (_, body) = get(app.clone(), "/preview?file=main.go&line=x").await;
        assert_eq!(json(&body)["error"], "line must be an integer");

        let (status, body) = get(app, "/preview?file=../secret.go&line=1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["error"], "error generating preview");
    }

    #[tokio::test]
    async fn preview_returns_code() {
        let (_dir, app) = app(true);
        let (status, body) = get(app, "/preview?file=main.go&line=1").await;
        assert_eq!(status, StatusCode::OK);
        let code = json(&body)["code"].as_str().unwrap().to_string();
        assert!(code.starts_with("1\tpackage main"));
        assert_eq!(code.lines().count(), 6);
    }

    #[tokio::test]
    async fn callstack_and_summary() {
        let (_dir, app) = app(true);
        let (status, body) = get(app.clone(), "/callstack.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["downward"]["name"], "main (main.go:5)");

        let (status, body) = get(app, "/summary.json").await;
        assert_eq!(status, StatusCode::OK);
        let summary = json(&body);
        assert_eq!(summary["file_count"], 1);
        // main and add; Println is only called
        assert_eq!(summary["func_count"], 2);
    }

    #[tokio::test]
    async fn callstack_without_entry_function() {
        let (_dir, app) = app(false);
        let (status, body) = get(app, "/callstack.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["error"], "no entry function");
    }

    #[tokio::test]
    async fn static_assets() {
        let (_dir, app) = app(true);
        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>goscope</h1>");

        let (status, _) = get(app, "/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn every_request_is_logged() {
        let (_dir, app) = app(true);

        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        get(app.clone(), "/summary.json").await;
        get(app.clone(), "/preview?file=main.go&line=2").await;
        get(app.clone(), "/callstack.json").await;
        get(app, "/missing.css").await;

        let text = log.text();
        let requests: Vec<&str> = text.lines().filter(|l| l.contains("request")).collect();
        assert_eq!(requests.len(), 4, "{}", text);
        assert!(requests[0].contains("method=GET") && requests[0].contains("uri=/summary.json"));
        assert!(requests[1].contains("uri=/preview?file=main.go&line=2"));
        assert!(requests[2].contains("status=200"));
        assert!(requests[3].contains("uri=/missing.css") && requests[3].contains("status=404"));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("callstack.json"), "application/json");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }
}
