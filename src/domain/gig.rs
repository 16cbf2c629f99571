// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Gig aggregate: the posted job, its lifecycle status and milestones.
//!
//! # Invariants
//! - Status only moves along `Open → InProgress → Completed` or
//!   `Open → Canceled`; terminal states are never left and `InProgress`
//!   is never revisited.
//! - Mutation happens exclusively through `ApplicationWorkflow` transitions
//!   executed inside a repository unit of work.
//! - The milestone *set* is fixed once the gig leaves `Open`; milestone
//!   status may still progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::geo::GeoPoint;
use crate::domain::identity::UserId;

/// Unique identifier for a gig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GigId(pub Uuid);

impl GigId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GigId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GigId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GigStatus {
    Open,
    InProgress,
    Completed,
    Canceled,
}

impl GigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Open => "OPEN",
            GigStatus::InProgress => "IN_PROGRESS",
            GigStatus::Completed => "COMPLETED",
            GigStatus::Canceled => "CANCELED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(GigStatus::Open),
            "IN_PROGRESS" => Some(GigStatus::InProgress),
            "COMPLETED" => Some(GigStatus::Completed),
            "CANCELED" => Some(GigStatus::Canceled),
            _ => None,
        }
    }

    /// Legal lifecycle edges.
    pub fn can_transition_to(&self, target: GigStatus) -> bool {
        matches!(
            (self, target),
            (GigStatus::Open, GigStatus::InProgress)
                | (GigStatus::Open, GigStatus::Canceled)
                | (GigStatus::InProgress, GigStatus::Completed)
        )
    }
}

/// Gig aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gig {
    pub id: GigId,
    pub title: String,
    pub description: String,
    /// Positive amount in the smallest currency unit.
    pub pay: i64,
    pub deadline: DateTime<Utc>,
    pub status: GigStatus,
    pub categories: Vec<String>,
    pub location: GeoPoint,
    pub employer_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Gig {
    pub fn is_open(&self) -> bool {
        self.status == GigStatus::Open
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Validated input for posting a new gig.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGig {
    pub title: String,
    pub description: String,
    pub pay: i64,
    pub deadline: DateTime<Utc>,
    pub categories: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub milestones: Vec<NewMilestone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMilestone {
    pub title: String,
}

impl NewGig {
    /// Boundary validation; runs before any domain logic.
    pub fn validate(&self) -> Result<GeoPoint, DomainError> {
        if self.title.trim().len() < 3 {
            return Err(DomainError::validation("title must be at least 3 characters"));
        }
        if self.description.trim().len() < 10 {
            return Err(DomainError::validation(
                "description must be at least 10 characters",
            ));
        }
        if self.pay <= 0 {
            return Err(DomainError::validation("pay must be positive"));
        }
        if self.milestones.iter().any(|m| m.title.trim().is_empty()) {
            return Err(DomainError::validation("milestone titles cannot be empty"));
        }
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Build the `Open` gig and its initial milestones.
    pub fn into_gig(self, employer_id: UserId) -> Result<(Gig, Vec<Milestone>), DomainError> {
        let location = self.validate()?;
        let now = Utc::now();
        let gig = Gig {
            id: GigId::new(),
            title: self.title,
            description: self.description,
            pay: self.pay,
            deadline: self.deadline,
            status: GigStatus::Open,
            categories: self.categories,
            location,
            employer_id,
            created_at: now,
            updated_at: now,
        };
        let milestones = self
            .milestones
            .into_iter()
            .map(|m| Milestone {
                id: MilestoneId::new(),
                gig_id: gig.id,
                title: m.title,
                status: MilestoneStatus::Pending,
                completed_by_worker: false,
                created_at: now,
            })
            .collect();
        Ok((gig, milestones))
    }
}

/// Unique identifier for a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MilestoneId(pub Uuid);

impl MilestoneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MilestoneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneStatus {
    Pending,
    Completed,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "PENDING",
            MilestoneStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(MilestoneStatus::Pending),
            "COMPLETED" => Some(MilestoneStatus::Completed),
            _ => None,
        }
    }
}

/// A unit of work within a gig.
///
/// `completed_by_worker` is the worker-reported pre-approval flag; the
/// employer confirms it by moving `status` to `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub gig_id: GigId,
    pub title: String,
    pub status: MilestoneStatus,
    pub completed_by_worker: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewGig {
        NewGig {
            title: "Garden cleanup".into(),
            description: "Clear the backyard and trim the hedges".into(),
            pay: 150_000,
            deadline: Utc::now(),
            categories: vec!["outdoor".into()],
            latitude: -6.2,
            longitude: 106.8,
            milestones: vec![NewMilestone { title: "Trim hedges".into() }],
        }
    }

    #[test]
    fn status_transitions() {
        assert!(GigStatus::Open.can_transition_to(GigStatus::InProgress));
        assert!(GigStatus::Open.can_transition_to(GigStatus::Canceled));
        assert!(GigStatus::InProgress.can_transition_to(GigStatus::Completed));
        assert!(!GigStatus::InProgress.can_transition_to(GigStatus::Open));
        assert!(!GigStatus::Completed.can_transition_to(GigStatus::InProgress));
        assert!(!GigStatus::Canceled.can_transition_to(GigStatus::Open));
    }

    #[test]
    fn status_round_trips_wire_values() {
        for s in [
            GigStatus::Open,
            GigStatus::InProgress,
            GigStatus::Completed,
            GigStatus::Canceled,
        ] {
            assert_eq!(GigStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(GigStatus::parse("open"), None);
    }

    #[test]
    fn new_gig_validation() {
        assert!(valid_input().validate().is_ok());

        let mut short_title = valid_input();
        short_title.title = "ab".into();
        assert!(short_title.validate().is_err());

        let mut short_desc = valid_input();
        short_desc.description = "too short".into();
        assert!(short_desc.validate().is_err());

        let mut free = valid_input();
        free.pay = 0;
        assert!(free.validate().is_err());

        let mut off_map = valid_input();
        off_map.latitude = 95.0;
        assert!(off_map.validate().is_err());
    }

    #[test]
    fn into_gig_starts_open_with_pending_milestones() {
        let employer = UserId::new();
        let (gig, milestones) = valid_input().into_gig(employer).unwrap();
        assert_eq!(gig.status, GigStatus::Open);
        assert_eq!(gig.employer_id, employer);
        assert_eq!(milestones.len(), 1);
        assert_eq!(milestones[0].gig_id, gig.id);
        assert_eq!(milestones[0].status, MilestoneStatus::Pending);
        assert!(!milestones[0].completed_by_worker);
    }
}
