use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use chrono::Utc;
use serde::Deserialize;

use crate::markdown;
use crate::server::AppState;
use crate::server::response::{AppError, StoreOptionExt, StoreResultExt};
use crate::server::templates;
use crate::types::{History, Page};

#[derive(Deserialize)]
pub struct SaveForm {
    pub body: String,
}

fn page_url(page: &Page) -> String {
    format!("/pages/{}/", page.created_ts)
}

fn load_page(state: &AppState, key: i64) -> Result<Page, AppError> {
    state
        .store
        .get_page_by_key(key)
        .app_err("Failed to load page")?
        .or_not_found("No such page")
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let pages = state.store.list_pages().app_err("Failed to list pages")?;
    Ok(Html(templates::index(&pages)))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let page = load_page(&state, key)?;

    let content = markdown::render(&page.body);
    let attachments = state
        .uploads
        .list(page.id)
        .app_err("Failed to list attachments")?;

    Ok(Html(templates::page(&page, &content, &attachments)))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let page = load_page(&state, key)?;
    let entries = state
        .store
        .list_page_history(page.id)
        .app_err("Failed to load history")?;

    Ok(Html(templates::history(&page, &entries)))
}

pub async fn edit_new() -> Html<String> {
    Html(templates::edit(None))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let page = load_page(&state, key)?;
    Ok(Html(templates::edit(Some(&page))))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect, AppError> {
    let page = Page::new(&form.body, Utc::now());
    state
        .store
        .create_page(&page)
        .app_err("Failed to create page")?;

    Ok(Redirect::to(&page_url(&page)))
}

/// Save an existing page. The pre-edit body and timestamp are snapshotted
/// into history before the page row is overwritten.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect, AppError> {
    let mut page = load_page(&state, key)?;

    state
        .store
        .create_history(&History {
            id: 0,
            page_id: page.id,
            body: page.body.clone(),
            updated_at: page.updated_at,
        })
        .app_err("Failed to snapshot history")?;

    page.apply_edit(&form.body, Utc::now());
    state
        .store
        .update_page(&page)
        .app_err("Failed to save page")?;

    Ok(Redirect::to(&page_url(&page)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
) -> Result<Redirect, AppError> {
    let page = load_page(&state, key)?;

    state
        .uploads
        .remove_page_files(page.id)
        .await
        .app_err("Failed to remove uploads")?;
    state
        .store
        .delete_page(page.id)
        .app_err("Failed to delete page")?;

    Ok(Redirect::to("/"))
}
