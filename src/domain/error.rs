// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain error taxonomy.
//!
//! Every workflow and search call returns `Result<T, DomainError>`; the
//! presentation layer maps the kind to an HTTP status and a tagged
//! success/failure envelope. Business-rule failures (`NotFound`,
//! `Permission`, `Conflict`) are definitive and must not be retried;
//! `Internal` wraps infrastructure failures with the raw detail logged,
//! never surfaced.

use crate::domain::repository::RepositoryError;

/// Failure category, stable across the module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Permission,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Permission => "permission",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Permission(_) => ErrorKind::Permission,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        DomainError::Permission(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(detail) => DomainError::Conflict(detail),
            RepositoryError::Database(detail) => {
                tracing::error!(detail = %detail, "repository failure");
                DomainError::Internal("storage failure".to_string())
            }
            RepositoryError::Serialization(detail) => {
                tracing::error!(detail = %detail, "repository decode failure");
                DomainError::Internal("storage failure".to_string())
            }
        }
    }
}
