//! Paste HTTP handlers.

use super::client::client_key;
use super::extract::ApiJson;
use crate::{error::HttpError, models::paste::*, AppError, AppState};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use linkpaste_core::{ids, PasteService};
use serde_json::{json, Value};
use std::net::SocketAddr;

/// Increment the view counter on the blocking pool and wait for it.
///
/// Failures are logged and reported as `None`; they never fail the read.
async fn record_view_task(pastes: PasteService, slug: String) -> Option<u64> {
    let task_slug = slug.clone();
    match tokio::task::spawn_blocking(move || pastes.record_view_logged(&task_slug)).await {
        Ok(views) => views,
        Err(err) => {
            tracing::warn!(slug = slug.as_str(), error = %err, "View counter task failed");
            None
        }
    }
}

/// Reject path segments that cannot be a generated slug without touching
/// the database.
///
/// Only read routes use this. Mutations report a missing token before any
/// lookup, so they leave unknown slugs to the service.
pub(crate) fn require_slug_shape(slug: &str) -> Result<(), AppError> {
    if ids::is_valid_slug(slug) {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// Authorize a read and count it unless the reader is the owner.
///
/// # Returns
/// The paste view and whether the presented token was the secret token.
///
/// # Errors
/// Returns the access failure from [`PasteService::begin_read`].
pub(crate) async fn read_counting_view(
    state: &AppState,
    slug: &str,
    token: Option<&str>,
) -> Result<(PasteView, bool), AppError> {
    let read = state.pastes.begin_read(slug, token)?;
    let owner = read.is_owner();
    let views = if read.counts_view() {
        record_view_task(state.pastes.clone(), read.slug().to_string()).await
    } else {
        None
    };
    Ok((read.finish(views), owner))
}

/// Create a new paste.
///
/// The client's rate-limit budget is charged before the body is validated.
///
/// # Returns
/// `201` with the slug and the secret token. The token is never shown again.
///
/// # Errors
/// Returns `429` when the client is over its limit, `400` on validation
/// failure, `500` on storage failure.
pub async fn create_paste(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreatePasteRequest>,
) -> Result<(StatusCode, Json<CreatedPaste>), HttpError> {
    let client = client_key(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.config.trust_forwarded_for,
    );
    if !state.limiter.allow(&client) {
        return Err(AppError::RateLimited.into());
    }

    let created = state.pastes.create(req)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a paste by slug, counting the view for non-owner readers.
///
/// # Errors
/// `404` when missing, `410` when expired, `403` when private and the token
/// does not match.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<PasteView>, HttpError> {
    require_slug_shape(&slug)?;
    let (view, _) = read_counting_view(&state, &slug, query.token.as_deref()).await?;
    Ok(Json(view))
}

/// Fetch only the content as `text/plain`. Does not count a view.
///
/// # Errors
/// Same statuses as [`get_paste`], rendered as plain text.
pub async fn get_raw_paste(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<String, HttpError> {
    require_slug_shape(&slug).map_err(HttpError::text)?;
    state
        .pastes
        .get_raw(&slug, query.token.as_deref())
        .map_err(HttpError::text)
}

/// Update a paste owned by the token holder.
///
/// # Returns
/// The updated paste as JSON.
///
/// # Errors
/// `401` without a token, `404` when missing, `403` on token mismatch,
/// `400` on validation failure.
pub async fn update_paste(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(req): ApiJson<UpdatePasteRequest>,
) -> Result<Json<PasteView>, HttpError> {
    Ok(Json(state.pastes.update(&slug, req)?))
}

/// Delete a paste owned by the token holder.
///
/// The token is read from the JSON body, falling back to the `token` query
/// parameter. A missing or unreadable body counts as no token.
///
/// # Errors
/// `401` without a token, `404` when missing, `403` on token mismatch.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<TokenQuery>,
    body: Option<ApiJson<DeletePasteRequest>>,
) -> Result<Json<Value>, HttpError> {
    let token = body
        .and_then(|ApiJson(req)| req.token)
        .or(query.token);
    state.pastes.delete(&slug, token.as_deref())?;
    Ok(Json(json!({ "success": true })))
}
