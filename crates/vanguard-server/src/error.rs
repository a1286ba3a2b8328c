//! Mapping of query failures to HTTP responses.
//!
//! Every failure is returned as
//!
//! ```json
//! { "error": { "code": "invalid_filter", "field": "light_level", "message": "..." } }
//! ```
//!
//! | Code | Status |
//! |---|---|
//! | `invalid_filter` | 400 |
//! | `invalid_reference` | 400 |
//! | `player_not_found` | 404 |
//! | `data_unavailable` | 503 |
//! | `internal_computation_error` | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::task::JoinError;
use tracing::{error, warn};
use vanguard_analysis::{filter::FilterError, profile::UnknownReference, query::QueryError};

/// A failed request.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ApiError {
    Query(QueryError),
    Filter(FilterError),
    InvalidReference(UnknownReference),
    #[display("query task failed: {_0}")]
    Task(JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Filter(_) | ApiError::Query(QueryError::InvalidFilter(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_filter")
            }
            ApiError::InvalidReference(_) => (StatusCode::BAD_REQUEST, "invalid_reference"),
            ApiError::Query(QueryError::PlayerNotFound { .. }) => {
                (StatusCode::NOT_FOUND, "player_not_found")
            }
            ApiError::Query(QueryError::DataUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "data_unavailable")
            }
            ApiError::Query(QueryError::InternalComputation { .. }) | ApiError::Task(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_computation_error")
            }
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            ApiError::Filter(e) | ApiError::Query(QueryError::InvalidFilter(e)) => {
                Some(e.field().to_owned())
            }
            ApiError::InvalidReference(_) => Some("reference".to_owned()),
            _ => None,
        }
    }

    fn message(&self) -> String {
        match self {
            // File paths and parser positions stay in the server log
            ApiError::Query(QueryError::DataUnavailable(_)) => {
                "player data is currently unavailable".to_owned()
            }
            ApiError::Query(QueryError::InternalComputation { .. }) | ApiError::Task(_) => {
                "internal computation error".to_owned()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            if status == StatusCode::SERVICE_UNAVAILABLE {
                warn!(error = %self, "statistics query failed");
            } else {
                error!(error = ?self, "statistics query failed");
            }
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code,
                field: self.field(),
                message: self.message(),
            },
        };
        (status, Json(body)).into_response()
    }
}
