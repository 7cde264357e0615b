//! HTTP mapping of tenant resolution failures.
//!
//! | Failure | HTTP Status | `error` code |
//! |---------|-------------|--------------|
//! | TenantRequired | 400 | `tenant-required` |
//! | TenantNotFound | 404 | `tenant-not-found` |
//! | Store | 503 | `store-unavailable` |
//! | Cancelled | 408 | `cancelled` |
//! | MissingContext | 500 | `tenancy-not-configured` |
//!
//! The body is a JSON object: `{ "error": <code>, "message": <text> }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use helios_tenancy::{Rejection, StoreError, TenancyError};
use serde::Serialize;
use thiserror::Error;

/// A tenant resolution failure that can be returned from a handler.
#[derive(Error, Debug)]
pub enum TenancyRejection {
    /// The pipeline rejected or failed the request.
    #[error(transparent)]
    Pipeline(#[from] TenancyError),

    /// A handler asked for the tenant context but the middleware is not
    /// installed on its route.
    #[error("tenant middleware is not installed for this route")]
    MissingContext,
}

impl TenancyRejection {
    /// Returns the HTTP status code for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TenancyRejection::Pipeline(TenancyError::Rejected(Rejection::TenantRequired {
                ..
            })) => StatusCode::BAD_REQUEST,
            TenancyRejection::Pipeline(TenancyError::Rejected(Rejection::TenantNotFound {
                ..
            })) => StatusCode::NOT_FOUND,
            TenancyRejection::Pipeline(TenancyError::Store(_)) => StatusCode::SERVICE_UNAVAILABLE,
            TenancyRejection::Pipeline(TenancyError::Cancelled) => StatusCode::REQUEST_TIMEOUT,
            TenancyRejection::MissingContext => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            TenancyRejection::Pipeline(TenancyError::Rejected(Rejection::TenantRequired {
                ..
            })) => "tenant-required",
            TenancyRejection::Pipeline(TenancyError::Rejected(Rejection::TenantNotFound {
                ..
            })) => "tenant-not-found",
            TenancyRejection::Pipeline(TenancyError::Store(_)) => "store-unavailable",
            TenancyRejection::Pipeline(TenancyError::Cancelled) => "cancelled",
            TenancyRejection::MissingContext => "tenancy-not-configured",
        }
    }
}

impl From<Rejection> for TenancyRejection {
    fn from(rejection: Rejection) -> Self {
        TenancyRejection::Pipeline(TenancyError::Rejected(rejection))
    }
}

impl From<StoreError> for TenancyRejection {
    fn from(err: StoreError) -> Self {
        TenancyRejection::Pipeline(TenancyError::Store(err))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for TenancyRejection {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let required: TenancyRejection = Rejection::TenantRequired {
            path: "/data".to_string(),
        }
        .into();
        assert_eq!(required.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(required.code(), "tenant-required");

        let not_found: TenancyRejection = Rejection::TenantNotFound {
            tenant_id: "unknown-xyz".to_string(),
        }
        .into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.code(), "tenant-not-found");

        let store: TenancyRejection = StoreError::unavailable("down").into();
        assert_eq!(store.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let cancelled = TenancyRejection::from(TenancyError::Cancelled);
        assert_eq!(cancelled.status_code(), StatusCode::REQUEST_TIMEOUT);

        assert_eq!(
            TenancyRejection::MissingContext.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = TenancyRejection::from(Rejection::TenantNotFound {
            tenant_id: "unknown-xyz".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
