//! Printable invoice pages.
//!
//! Every request reads the data file again, so edits show up on reload and
//! no state is shared between requests.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::model::Model;
use crate::run::{find, RunError};
use crate::templates;

#[derive(Clone)]
pub struct AppState {
    data_file: Arc<PathBuf>,
    static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(data_file: &FsPath, static_dir: &FsPath) -> Self {
        Self {
            data_file: Arc::new(data_file.to_path_buf()),
            static_dir: Arc::new(static_dir.to_path_buf()),
        }
    }
}

impl IntoResponse for RunError {
    fn into_response(self) -> Response {
        match self {
            RunError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

/// Read the data file off the executor thread and build the model.
async fn load(state: &AppState) -> Result<Model, RunError> {
    let text = tokio::fs::read_to_string(state.data_file.as_path()).await?;
    let model = Model::from_yaml(&text)?;
    debug!(
        path = %state.data_file.display(),
        invoices = model.invoices().len(),
        "loaded model"
    );
    Ok(model)
}

/// GET / - every invoice in the data file
async fn home(State(state): State<AppState>) -> Result<Html<String>, RunError> {
    let model = load(&state).await?;
    Ok(Html(templates::home(&model, &state.static_dir)?))
}

/// GET /invoice/:code - one invoice, `?n=` copies on the page (capped)
async fn invoice(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, RunError> {
    let copies = params
        .get("n")
        .and_then(|n| n.parse().ok())
        .unwrap_or(1);
    let model = load(&state).await?;
    let invoice = find(&model, &code)?;
    Ok(Html(templates::invoice_page(
        &model,
        invoice,
        copies,
        &state.static_dir,
    )?))
}

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.static_dir.as_path());
    Router::new()
        .route("/", get(home))
        .route("/invoice/:code", get(invoice))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}

pub async fn serve(bind: SocketAddr, state: AppState) -> io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(
        address = %listener.local_addr()?,
        data_file = %state.data_file.display(),
        "serving invoices"
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::NamedTempFile;
    use tower::util::ServiceExt;

    use super::*;
    use crate::fixtures::{DATA, ODD_NUMBER};
    use crate::templates::MAX_COPIES;

    fn data_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DATA.as_bytes()).unwrap();
        file
    }

    async fn get_page(file: &NamedTempFile, uri: &str) -> (StatusCode, String) {
        let state = AppState::new(file.path(), FsPath::new("static"));
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn home_lists_invoices() {
        let file = data_file();
        let (status, body) = get_page(&file, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/invoice/2014-01-31-11"));
        assert!(body.contains("/invoice/2014-03-31-14"));
    }

    #[tokio::test]
    async fn invoice_page_renders() {
        let file = data_file();
        let (status, body) = get_page(&file, "/invoice/2014-01-31-11").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<html lang=\"ro\">"));
        assert!(body.contains("149.10"));
    }

    #[tokio::test]
    async fn copies_come_from_the_query() {
        let file = data_file();
        let (_, body) = get_page(&file, "/invoice/2014-02-28-12?n=2").await;
        assert_eq!(body.matches("class=\"invoice\"").count(), 2);

        let (status, body) = get_page(&file, "/invoice/2014-02-28-12?n=lots").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches("class=\"invoice\"").count(), 1);
    }

    #[tokio::test]
    async fn huge_copy_counts_are_capped() {
        let file = data_file();
        let (status, body) = get_page(&file, "/invoice/2014-02-28-12?n=1099511627776").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches("class=\"invoice\"").count(), MAX_COPIES);

        let (status, _) = get_page(&file, "/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn links_with_reserved_characters_resolve() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ODD_NUMBER.as_bytes()).unwrap();
        let (_, home) = get_page(&file, "/").await;
        let link = "/invoice/2014-06-30-A%2F7%20%3F%23";
        assert!(home.contains(link));

        let (status, body) = get_page(&file, link).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("30.06.2014"));
    }

    #[tokio::test]
    async fn missing_data_file_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(&dir.path().join("absent.yaml"), FsPath::new("static"));
        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unknown_invoice_is_404() {
        let file = data_file();
        let (status, body) = get_page(&file, "/invoice/2099-01-01-1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("2099-01-01-1"));
    }

    #[tokio::test]
    async fn broken_data_file_is_500() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"supplier: {}\ninvoices:\n  - contract: nope\n").unwrap();
        let (status, body) = get_page(&file, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("unknown contract 'nope'"));
    }

    #[tokio::test]
    async fn serves_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("invoice.css"), "body {}").unwrap();
        let file = data_file();
        let state = AppState::new(file.path(), dir.path());
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/static/invoice.css?t=abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
