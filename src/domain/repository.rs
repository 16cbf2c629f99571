// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Persistence port for the gig marketplace, following the DDD repository
//! pattern: interface defined in the domain layer, implemented in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Implementations |
//! |-------|-----------------|
//! | `GigRepository` | `InMemoryGigRepository`, `PostgresGigRepository` |
//! | `GigUnitOfWork` | `MemoryUnitOfWork`, `PgUnitOfWork` |
//!
//! Reads outside a transaction go through [`GigRepository`] directly; every
//! multi-row mutation in the workflow runs inside exactly one
//! [`GigUnitOfWork`]. The unit of work gives compare-and-transition
//! semantics: `…_for_update` reads observe (and hold) the state that the
//! subsequent mutations act on, so a losing concurrent caller sees a
//! Conflict instead of silently overwriting.

use async_trait::async_trait;

use crate::domain::gig::{Gig, GigId, GigStatus, Milestone, MilestoneId, MilestoneStatus};
use crate::domain::gig_application::{Application, ApplicationId, ApplicationStatus};
use crate::domain::search::RankedGigQuery;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Uniqueness violation, e.g. a second application for the same
    /// `(gig, worker)` pair.
    #[error("{0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate("duplicate entry".to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

/// Repository interface for the gig aggregate and its applications.
#[async_trait]
pub trait GigRepository: Send + Sync {
    async fn find_gig(&self, id: GigId) -> Result<Option<Gig>, RepositoryError>;

    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<Application>, RepositoryError>;

    async fn applications_for_gig(
        &self,
        gig_id: GigId,
    ) -> Result<Vec<Application>, RepositoryError>;

    async fn milestones_for_gig(&self, gig_id: GigId) -> Result<Vec<Milestone>, RepositoryError>;

    /// Execute a ranked query in one consistent pass: filter, order (by a
    /// computed expression where needed), then limit/offset. Returns the
    /// page of rows plus the total count over the same predicate.
    async fn search(&self, query: &RankedGigQuery) -> Result<(Vec<Gig>, u64), RepositoryError>;

    /// Open a unit of work. Dropping it without [`GigUnitOfWork::commit`]
    /// rolls every staged mutation back.
    async fn begin(&self) -> Result<Box<dyn GigUnitOfWork>, RepositoryError>;
}

/// Transactional scope over gigs, applications and milestones.
#[async_trait]
pub trait GigUnitOfWork: Send {
    /// Read a gig with an exclusive claim for the rest of this unit of work.
    async fn gig_for_update(&mut self, id: GigId) -> Result<Option<Gig>, RepositoryError>;

    async fn application_for_update(
        &mut self,
        id: ApplicationId,
    ) -> Result<Option<Application>, RepositoryError>;

    async fn milestone_for_update(
        &mut self,
        id: MilestoneId,
    ) -> Result<Option<Milestone>, RepositoryError>;

    async fn applications_for_gig(
        &mut self,
        gig_id: GigId,
    ) -> Result<Vec<Application>, RepositoryError>;

    async fn milestones_for_gig(&mut self, gig_id: GigId)
        -> Result<Vec<Milestone>, RepositoryError>;

    async fn insert_gig(&mut self, gig: &Gig) -> Result<(), RepositoryError>;

    async fn insert_milestones(&mut self, milestones: &[Milestone])
        -> Result<(), RepositoryError>;

    /// Fails with [`RepositoryError::Duplicate`] when the `(gig, worker)`
    /// pair already exists.
    async fn insert_application(&mut self, application: &Application)
        -> Result<(), RepositoryError>;

    async fn set_gig_status(&mut self, id: GigId, status: GigStatus)
        -> Result<(), RepositoryError>;

    async fn set_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError>;

    /// Cascade rejection: every `Pending` sibling of `keep` on the gig moves
    /// to `Rejected`. Returns the number of rows changed.
    async fn reject_pending_siblings(
        &mut self,
        gig_id: GigId,
        keep: ApplicationId,
    ) -> Result<u64, RepositoryError>;

    async fn set_milestone_worker_done(
        &mut self,
        id: MilestoneId,
        done: bool,
    ) -> Result<(), RepositoryError>;

    async fn set_milestone_status(
        &mut self,
        id: MilestoneId,
        status: MilestoneStatus,
    ) -> Result<(), RepositoryError>;

    /// Atomically apply every staged mutation.
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
