use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};

use super::{attachments, pages};
use crate::store::Store;
use crate::uploads::Uploads;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub uploads: Uploads,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, data_dir: PathBuf) -> Self {
        let uploads = Uploads::new(&data_dir, store.clone());
        Self { store, uploads }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(pages::index))
        .route("/pages/{key}/", get(pages::show))
        .route("/pages/{key}/history/", get(pages::history))
        .route("/pages/{key}/{file}", get(attachments::download))
        .route("/pages/edit/", get(pages::edit_new).post(pages::create))
        .route("/pages/edit/{key}/", get(pages::edit).post(pages::save))
        .route("/pages/edit/{key}/delete", post(pages::delete))
        .route("/pages/edit/{key}/{file}", get(attachments::download))
        .route("/pages/edit/{key}/attachments/", post(attachments::upload))
        .route(
            "/pages/edit/{key}/attachments/{file}/delete",
            post(attachments::delete),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
