//! Error types for tenant resolution.
//!
//! Errors are split by the component that raises them:
//!
//! - [`StoreError`] - the tenant store could not complete a lookup or was
//!   seeded with data that breaks its invariants
//! - [`Rejection`] - the enforcement policy refused the request
//! - [`TenancyError`] - everything the pipeline can surface to its caller
//! - [`BuildError`] - the pipeline could not be assembled from its parts
//!
//! A missing tenant is never a [`StoreError`]. Stores report it as `Ok(None)`
//! and the policy decides whether it becomes a [`Rejection`].

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Boxed error used as the cause of store failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by a tenant store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing system could not be reached or failed mid-lookup.
    #[error("tenant store unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Two seed entries share the same id under case-insensitive comparison.
    #[error("duplicate tenant id in seed: {tenant_id}")]
    DuplicateTenant { tenant_id: String },

    /// A seed entry is not a valid tenant.
    #[error("invalid tenant seed: {message}")]
    InvalidSeed { message: String },
}

impl StoreError {
    /// Creates an [`StoreError::Unavailable`] without an underlying cause.
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an [`StoreError::Unavailable`] wrapping the failure that caused it.
    pub fn unavailable_with_source(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        StoreError::Unavailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Reasons the enforcement policy rejects a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No tenant was available and the policy requires one.
    #[error("tenant resolution is required but no tenant could be resolved for '{path}'")]
    TenantRequired { path: String },

    /// An identifier was resolved but the store does not know it.
    #[error("tenant '{tenant_id}' was not found")]
    TenantNotFound { tenant_id: String },
}

/// Failures surfaced by the resolution pipeline.
#[derive(Error, Debug)]
pub enum TenancyError {
    /// The enforcement policy rejected the request.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The store failed; never reinterpreted as "not found".
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request was cancelled or its deadline elapsed mid-resolution.
    #[error("tenant resolution was cancelled")]
    Cancelled,
}

impl TenancyError {
    /// Returns the rejection, if this error is a policy rejection.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            TenancyError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Returns true if the pipeline was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TenancyError::Cancelled)
    }
}

/// Errors raised while assembling a pipeline.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Neither an in-memory seed nor a custom store was supplied.
    #[error("no tenant store configured")]
    MissingStore,

    /// The configured store could not be created.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for pipeline operations.
pub type TenancyResult<T> = Result<T, TenancyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_rejection_display() {
        let err = Rejection::TenantNotFound {
            tenant_id: "unknown-xyz".to_string(),
        };
        assert_eq!(err.to_string(), "tenant 'unknown-xyz' was not found");

        let err = Rejection::TenantRequired {
            path: "/data".to_string(),
        };
        assert!(err.to_string().contains("'/data'"));
    }

    #[test]
    fn test_rejection_converts_to_tenancy_error() {
        let err: TenancyError = Rejection::TenantNotFound {
            tenant_id: "acme".to_string(),
        }
        .into();

        assert_eq!(
            err.rejection(),
            Some(&Rejection::TenantNotFound {
                tenant_id: "acme".to_string()
            })
        );
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_store_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = StoreError::unavailable_with_source("tenant database", io);

        assert!(err.to_string().contains("tenant database"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_store_error_is_not_a_rejection() {
        let err: TenancyError = StoreError::unavailable("down").into();
        assert!(err.rejection().is_none());
        assert!(matches!(err, TenancyError::Store(_)));
    }
}
