// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Geo-ranked, filtered, paginated gig search.
//!
//! The engine validates caller input at the boundary, resolves the ranking
//! (including the distance fallback), and delegates the single consistent
//! filter/order/paginate pass to the repository. The returned total always
//! reflects the same predicate as the page of rows.

use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::repository::GigRepository;
use crate::domain::search::{GigPage, GigSearchParams};

pub struct SearchRankingEngine {
    repository: Arc<dyn GigRepository>,
}

impl SearchRankingEngine {
    pub fn new(repository: Arc<dyn GigRepository>) -> Self {
        Self { repository }
    }

    pub async fn search(&self, params: GigSearchParams) -> Result<GigPage, DomainError> {
        let query = params.validate()?;
        let (gigs, total) = self.repository.search(&query).await?;
        tracing::debug!(total, page = query.page, "gig search executed");
        Ok(GigPage::new(gigs, total, query.page, query.per_page))
    }
}
