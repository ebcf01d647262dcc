//! HTTP error mapping for API, raw and page handlers.

use crate::presentation::html;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use linkpaste_core::AppError;
use serde_json::json;

/// Body encoding used when rendering an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    Json,
    Text,
    Html,
}

/// Wrapper around [`AppError`] that knows how to render itself.
#[derive(Debug)]
pub struct HttpError {
    error: AppError,
    format: ErrorFormat,
}

impl HttpError {
    /// Render as a `text/plain` body, for raw content routes.
    pub fn text(error: AppError) -> Self {
        Self {
            error,
            format: ErrorFormat::Text,
        }
    }

    /// Render as an HTML error page, for display routes.
    pub fn html(error: AppError) -> Self {
        Self {
            error,
            format: ErrorFormat::Html,
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for(&self.error)
    }
}

impl From<AppError> for HttpError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            format: ErrorFormat::Json,
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text())).into()
    }
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AppError::NotFound => StatusCode::NOT_FOUND,
        AppError::Gone => StatusCode::GONE,
        AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        AppError::Forbidden => StatusCode::FORBIDDEN,
        AppError::SlugTaken(_)
        | AppError::Database(_)
        | AppError::StorageMessage(_)
        | AppError::Serialization(_)
        | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.error.is_internal() {
            tracing::error!("Internal error: {}", self.error);
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        match self.format {
            ErrorFormat::Json => (status, Json(json!({ "error": message }))).into_response(),
            ErrorFormat::Text => (status, message).into_response(),
            ErrorFormat::Html => {
                (status, Html(html::render_error_page(status.as_u16(), &message))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HttpError;
    use axum::{http::StatusCode, response::IntoResponse};
    use linkpaste_core::AppError;

    #[test]
    fn lifecycle_errors_map_to_distinct_statuses() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::Gone, StatusCode::GONE),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (
                AppError::StorageMessage("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(HttpError::from(error).status(), expected);
        }
    }

    #[test]
    fn formats_pick_content_type() {
        let json = HttpError::from(AppError::NotFound).into_response();
        assert_eq!(
            json.headers()["content-type"].to_str().expect("header"),
            "application/json"
        );

        let text = HttpError::text(AppError::Gone).into_response();
        assert_eq!(text.status(), StatusCode::GONE);
        assert!(text.headers()["content-type"]
            .to_str()
            .expect("header")
            .starts_with("text/plain"));

        let html = HttpError::html(AppError::Forbidden).into_response();
        assert!(html.headers()["content-type"]
            .to_str()
            .expect("header")
            .starts_with("text/html"));
    }
}
