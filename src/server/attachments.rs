use std::io::ErrorKind;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::header,
    response::{Redirect, Response},
};
use tokio_util::io::ReaderStream;

use crate::server::AppState;
use crate::server::response::{AppError, StoreOptionExt, StoreResultExt};
use crate::types::Page;

fn load_page(state: &AppState, key: i64) -> Result<Page, AppError> {
    state
        .store
        .get_page_by_key(key)
        .app_err("Failed to load page")?
        .or_not_found("No such page")
}

/// Content type for a download, inferred from the file name extension.
fn content_type_for(file_name: &str) -> &'static str {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let page = load_page(&state, key)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Failed to read multipart: {e}")))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(format!("Failed to read file: {e}")))?;
            file = Some((name, data.to_vec()));
        }
    }

    let (name, data) = file.ok_or_else(|| AppError::bad_request("File part is required"))?;
    if name.is_empty() {
        return Err(AppError::bad_request("File name must not be empty"));
    }

    state
        .uploads
        .upload(page.id, &name, &data)
        .await
        .app_err("Failed to store upload")?;

    Ok(Redirect::to(&format!("/pages/{}/", page.created_ts)))
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path((key, file_name)): Path<(i64, String)>,
) -> Result<Response, AppError> {
    let page = load_page(&state, key)?;

    let path = state
        .uploads
        .read(page.id, &file_name)
        .app_err("No such attachment")?;

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AppError::not_found("No such attachment")
        } else {
            AppError::internal("Failed to open attachment")
        }
    })?;

    let stream = ReaderStream::new(file);
    Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(&file_name))
        .body(Body::from_stream(stream))
        .map_err(|_| AppError::internal("Failed to build response"))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((key, file_name)): Path<(i64, String)>,
) -> Result<Redirect, AppError> {
    let page = load_page(&state, key)?;

    state
        .uploads
        .delete(page.id, &file_name)
        .await
        .app_err("No such attachment")?;

    Ok(Redirect::to(&format!("/pages/{}/", page.created_ts)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for("a.txt"), "text/plain; charset=utf-8");
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("page.md"), "text/markdown; charset=utf-8");
    }

    #[test]
    fn test_content_type_defaults_to_octet_stream() {
        assert_eq!(content_type_for("data.none"), "application/octet-stream");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }
}
