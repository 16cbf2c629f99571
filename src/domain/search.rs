// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Search query model: boundary validation, filter predicate and ranking.
//!
//! The raw [`GigSearchParams`] is validated into a [`RankedGigQuery`] that a
//! store executes as one consistent pass: filter, order (possibly by a
//! computed distance expression), then limit/offset. Pagination is never
//! applied before the full ordering.

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::geo::GeoPoint;
use crate::domain::gig::{Gig, GigStatus};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Pay,
    Deadline,
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw, caller-supplied search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GigSearchParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<GigStatus>,
    pub category: Option<String>,
    pub min_pay: Option<i64>,
    pub max_pay: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl GigSearchParams {
    /// Validate and normalize into an executable ranked query.
    ///
    /// Worker-facing search defaults the status filter to `Open`. A
    /// `distance` sort without a caller location falls back to the default
    /// ordering (deadline ascending) rather than erroring.
    pub fn validate(self) -> Result<RankedGigQuery, DomainError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(DomainError::validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        if self.min_pay.is_some_and(|p| p < 0) || self.max_pay.is_some_and(|p| p < 0) {
            return Err(DomainError::validation("pay bounds cannot be negative"));
        }

        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)?),
            (None, None) => None,
            _ => {
                return Err(DomainError::validation(
                    "lat and lng must be supplied together",
                ))
            }
        };

        let order = self.sort_order.unwrap_or_default();
        let ordering = match (self.sort_by, location) {
            (Some(SortBy::Pay), _) => GigOrdering::Pay(order),
            (Some(SortBy::Deadline), _) => GigOrdering::Deadline(order),
            (Some(SortBy::Distance), Some(origin)) => GigOrdering::Distance { origin, order },
            // No usable sort key: deadline ascending is the default ranking.
            (Some(SortBy::Distance), None) | (None, _) => GigOrdering::Deadline(SortOrder::Asc),
        };

        let normalize = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        Ok(RankedGigQuery {
            filter: GigFilter {
                status: Some(self.status.unwrap_or(GigStatus::Open)),
                category: normalize(self.category),
                min_pay: self.min_pay,
                max_pay: self.max_pay,
                search: normalize(self.search),
            },
            ordering,
            page,
            per_page,
        })
    }
}

/// Filter predicate; the total count must be taken over the same predicate
/// as the page of rows.
#[derive(Debug, Clone, Default)]
pub struct GigFilter {
    pub status: Option<GigStatus>,
    pub category: Option<String>,
    pub min_pay: Option<i64>,
    pub max_pay: Option<i64>,
    pub search: Option<String>,
}

impl GigFilter {
    /// In-application evaluation, used by stores without predicate pushdown.
    pub fn matches(&self, gig: &Gig) -> bool {
        if self.status.is_some_and(|s| gig.status != s) {
            return false;
        }
        if let Some(category) = &self.category {
            if !gig.has_category(category) {
                return false;
            }
        }
        if self.min_pay.is_some_and(|min| gig.pay < min) {
            return false;
        }
        if self.max_pay.is_some_and(|max| gig.pay > max) {
            return false;
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            if !gig.title.to_lowercase().contains(&needle)
                && !gig.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Ranking expression applied after filtering, before pagination.
#[derive(Debug, Clone, Copy)]
pub enum GigOrdering {
    Pay(SortOrder),
    Deadline(SortOrder),
    Distance { origin: GeoPoint, order: SortOrder },
}

/// A validated filter + order + page query, executed by the store in one
/// consistent pass.
#[derive(Debug, Clone)]
pub struct RankedGigQuery {
    pub filter: GigFilter,
    pub ordering: GigOrdering,
    pub page: u32,
    pub per_page: u32,
}

impl RankedGigQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// One page of ranked results.
#[derive(Debug, Clone, Serialize)]
pub struct GigPage {
    pub gigs: Vec<Gig>,
    pub total: u64,
    pub total_pages: u64,
    pub page: u32,
}

impl GigPage {
    pub fn new(gigs: Vec<Gig>, total: u64, page: u32, per_page: u32) -> Self {
        Self {
            gigs,
            total,
            total_pages: total.div_ceil(u64::from(per_page)),
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let q = GigSearchParams::default().validate().unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, DEFAULT_PER_PAGE);
        assert_eq!(q.filter.status, Some(GigStatus::Open));
        assert!(matches!(q.ordering, GigOrdering::Deadline(SortOrder::Asc)));
    }

    #[test]
    fn rejects_out_of_range_paging() {
        let zero_page = GigSearchParams { page: Some(0), ..Default::default() };
        assert!(zero_page.validate().is_err());

        let oversized = GigSearchParams { per_page: Some(51), ..Default::default() };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn rejects_half_supplied_location() {
        let params = GigSearchParams { lat: Some(1.0), ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_location() {
        let params = GigSearchParams {
            lat: Some(91.0),
            lng: Some(0.0),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn distance_sort_without_location_falls_back_to_deadline_asc() {
        let params = GigSearchParams {
            sort_by: Some(SortBy::Distance),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let q = params.validate().unwrap();
        assert!(matches!(q.ordering, GigOrdering::Deadline(SortOrder::Asc)));
    }

    #[test]
    fn distance_sort_with_location() {
        let params = GigSearchParams {
            sort_by: Some(SortBy::Distance),
            lat: Some(-6.2),
            lng: Some(106.8),
            ..Default::default()
        };
        let q = params.validate().unwrap();
        assert!(matches!(q.ordering, GigOrdering::Distance { .. }));
    }

    #[test]
    fn blank_filters_are_dropped() {
        let params = GigSearchParams {
            category: Some("  ".into()),
            search: Some(String::new()),
            ..Default::default()
        };
        let q = params.validate().unwrap();
        assert!(q.filter.category.is_none());
        assert!(q.filter.search.is_none());
    }

    #[test]
    fn offset_is_zero_based() {
        let params = GigSearchParams {
            page: Some(3),
            per_page: Some(12),
            ..Default::default()
        };
        let q = params.validate().unwrap();
        assert_eq!(q.offset(), 24);
        assert_eq!(q.limit(), 12);
    }

    #[test]
    fn page_math_rounds_up() {
        let page = GigPage::new(Vec::new(), 25, 2, 12);
        assert_eq!(page.total_pages, 3);
        let exact = GigPage::new(Vec::new(), 24, 1, 12);
        assert_eq!(exact.total_pages, 2);
        let empty = GigPage::new(Vec::new(), 0, 1, 12);
        assert_eq!(empty.total_pages, 0);
    }
}
