use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use harvest_core::error::AppError;

use crate::dto::{ErrorResponse, FieldError};

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// A domain or storage failure, rendered with its own detail.
    App(AppError),
    /// The request did not have the expected shape.
    InvalidInput(FieldError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "json_data",
            JsonRejection::JsonSyntaxError(_) => "json_syntax",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body",
        };
        Self::invalid(vec!["body".into()], rejection.body_text(), kind)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid(vec!["path".into(), "id".into()], rejection.body_text(), "path")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid(vec!["query".into()], rejection.body_text(), "query")
    }
}

impl ApiError {
    fn invalid(loc: Vec<String>, msg: String, kind: &str) -> Self {
        Self::InvalidInput(FieldError {
            loc,
            msg,
            kind: kind.to_string(),
        })
    }
}

/// HTTP status for a domain error.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::DatabaseError { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::App(err) => {
                let status = status_for(&err);
                tracing::debug!(status = status.as_u16(), error = %err, "Request failed");
                (status, axum::Json(ErrorResponse::new(err.detail()))).into_response()
            }
            ApiError::InvalidInput(field) => {
                tracing::debug!(loc = ?field.loc, msg = %field.msg, "Rejected request input");
                let body = ErrorResponse {
                    detail: "Validation Error".to_string(),
                    errors: Some(vec![field]),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
            }
        }
    }
}
