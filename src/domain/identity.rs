// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Caller identity and the authorization gateway port.
//!
//! The gateway resolves who is calling; role checks happen through
//! [`AuthorizationGateway::require_role`] and ownership checks live in the
//! workflow itself. No ambient session state: every service call threads an
//! explicit [`RequestContext`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Unique identifier for a marketplace user (worker or employer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Worker,
    Employer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Worker => "WORKER",
            Role::Employer => "EMPLOYER",
        }
    }
}

/// Resolved caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
}

/// Per-request call context carried into every workflow and search call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Opaque credential (e.g. a bearer token); interpretation belongs to
    /// the gateway implementation.
    pub token: Option<String>,
}

impl RequestContext {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

/// Port resolving a request context to a caller identity.
#[async_trait]
pub trait AuthorizationGateway: Send + Sync {
    /// Resolve the caller, failing with `Permission` when unauthenticated.
    async fn resolve_identity(&self, ctx: &RequestContext) -> Result<Identity, DomainError>;

    /// Resolve the caller and require a specific role.
    async fn require_role(
        &self,
        ctx: &RequestContext,
        role: Role,
    ) -> Result<Identity, DomainError> {
        let identity = self.resolve_identity(ctx).await?;
        if identity.role != role {
            return Err(DomainError::permission(format!(
                "this action requires the {} role",
                role.as_str()
            )));
        }
        Ok(identity)
    }
}
