// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Token-table authorization gateway.
//!
//! Maps opaque bearer tokens to identities. Session/token issuance is out
//! of scope; in deployment the table is fed by the external auth system,
//! in tests it is seeded directly.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::identity::{AuthorizationGateway, Identity, RequestContext};

#[derive(Default)]
pub struct StaticAuthGateway {
    identities: HashMap<String, Identity>,
}

impl StaticAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.identities.insert(token.into(), identity);
        self
    }

    pub fn register(&mut self, token: impl Into<String>, identity: Identity) {
        self.identities.insert(token.into(), identity);
    }
}

#[async_trait]
impl AuthorizationGateway for StaticAuthGateway {
    async fn resolve_identity(&self, ctx: &RequestContext) -> Result<Identity, DomainError> {
        ctx.token
            .as_deref()
            .and_then(|token| self.identities.get(token))
            .copied()
            .ok_or_else(|| DomainError::permission("unauthenticated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{Role, UserId};

    #[tokio::test]
    async fn resolves_known_token_and_rejects_the_rest() {
        let identity = Identity { id: UserId::new(), role: Role::Worker };
        let gateway = StaticAuthGateway::new().with_identity("tok-1", identity);

        let resolved = gateway
            .resolve_identity(&RequestContext::bearer("tok-1"))
            .await
            .unwrap();
        assert_eq!(resolved, identity);

        assert!(gateway
            .resolve_identity(&RequestContext::bearer("nope"))
            .await
            .is_err());
        assert!(gateway
            .resolve_identity(&RequestContext::anonymous())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn require_role_enforces_the_role() {
        let worker = Identity { id: UserId::new(), role: Role::Worker };
        let gateway = StaticAuthGateway::new().with_identity("w", worker);

        assert!(gateway
            .require_role(&RequestContext::bearer("w"), Role::Worker)
            .await
            .is_ok());
        assert!(gateway
            .require_role(&RequestContext::bearer("w"), Role::Employer)
            .await
            .is_err());
    }
}
