//! Display routes: HTML view and embed pages.

use super::paste::{read_counting_view, require_slug_shape};
use crate::presentation::{html, ShareLinks};
use crate::{error::HttpError, models::paste::*, AppState};
use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use linkpaste_core::service;

/// Full view page. Counts a view like the JSON read.
pub async fn view_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, HttpError> {
    require_slug_shape(&slug).map_err(HttpError::html)?;
    let (view, owner) = read_counting_view(&state, &slug, query.token.as_deref())
        .await
        .map_err(HttpError::html)?;
    let token = if owner { query.token.as_deref() } else { None };
    let links = ShareLinks::for_paste(&state.config.base_url(), &view.slug, view.privacy, token);
    Ok(Html(html::render_view_page(&view, &links)))
}

/// Embeddable page. Never counts a view.
pub async fn embed_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>, HttpError> {
    require_slug_shape(&slug).map_err(HttpError::html)?;
    let paste = state
        .pastes
        .authorize_read(&slug, query.token.as_deref())
        .map_err(HttpError::html)?;
    let token = if service::is_owner(&paste, query.token.as_deref()) {
        query.token.as_deref()
    } else {
        None
    };
    let view = PasteView::from(paste);
    let links = ShareLinks::for_paste(&state.config.base_url(), &view.slug, view.privacy, token);
    Ok(Html(html::render_embed_page(&view, &links)))
}
