// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! In-memory repository for development and testing.
//!
//! A unit of work takes an owned lock on the whole store for its lifetime,
//! which gives serializable isolation: concurrent units of work queue up,
//! and each one re-reads state the previous writer committed. Mutations are
//! staged on a copy and only become visible on commit; dropping the unit of
//! work without committing discards the copy.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::geo::haversine_km;
use crate::domain::gig::{Gig, GigId, GigStatus, Milestone, MilestoneId, MilestoneStatus};
use crate::domain::gig_application::{Application, ApplicationId, ApplicationStatus};
use crate::domain::repository::{GigRepository, GigUnitOfWork, RepositoryError};
use crate::domain::search::{GigOrdering, RankedGigQuery, SortOrder};

#[derive(Debug, Clone, Default)]
struct StoreState {
    gigs: HashMap<GigId, Gig>,
    applications: HashMap<ApplicationId, Application>,
    milestones: HashMap<MilestoneId, Milestone>,
}

impl StoreState {
    fn applications_for_gig(&self, gig_id: GigId) -> Vec<Application> {
        let mut apps: Vec<Application> = self
            .applications
            .values()
            .filter(|a| a.gig_id == gig_id)
            .cloned()
            .collect();
        apps.sort_by_key(|a| (a.created_at, a.id.0));
        apps
    }

    fn milestones_for_gig(&self, gig_id: GigId) -> Vec<Milestone> {
        let mut milestones: Vec<Milestone> = self
            .milestones
            .values()
            .filter(|m| m.gig_id == gig_id)
            .cloned()
            .collect();
        milestones.sort_by_key(|m| (m.created_at, m.id.0));
        milestones
    }
}

#[derive(Clone, Default)]
pub struct InMemoryGigRepository {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryGigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn directed(ordering: std::cmp::Ordering, order: SortOrder) -> std::cmp::Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Filter, fully rank, then paginate. Pagination never runs before the
/// complete ordering, and the total reflects the same predicate.
fn run_ranked_query(state: &StoreState, query: &RankedGigQuery) -> (Vec<Gig>, u64) {
    let mut matched: Vec<Gig> = state
        .gigs
        .values()
        .filter(|g| query.filter.matches(g))
        .cloned()
        .collect();

    match query.ordering {
        GigOrdering::Pay(order) => {
            matched.sort_by(|a, b| directed(a.pay.cmp(&b.pay), order).then(a.id.0.cmp(&b.id.0)));
        }
        GigOrdering::Deadline(order) => {
            matched.sort_by(|a, b| {
                directed(a.deadline.cmp(&b.deadline), order).then(a.id.0.cmp(&b.id.0))
            });
        }
        GigOrdering::Distance { origin, order } => {
            let mut keyed: Vec<(f64, Gig)> = matched
                .into_iter()
                .map(|g| (haversine_km(origin, g.location), g))
                .collect();
            keyed.sort_by(|a, b| {
                directed(a.0.total_cmp(&b.0), order).then(a.1.id.0.cmp(&b.1.id.0))
            });
            matched = keyed.into_iter().map(|(_, g)| g).collect();
        }
    }

    let total = matched.len() as u64;
    let page = matched
        .into_iter()
        .skip(query.offset() as usize)
        .take(query.limit() as usize)
        .collect();
    (page, total)
}

#[async_trait]
impl GigRepository for InMemoryGigRepository {
    async fn find_gig(&self, id: GigId) -> Result<Option<Gig>, RepositoryError> {
        Ok(self.state.lock().await.gigs.get(&id).cloned())
    }

    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.state.lock().await.applications.get(&id).cloned())
    }

    async fn applications_for_gig(
        &self,
        gig_id: GigId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.state.lock().await.applications_for_gig(gig_id))
    }

    async fn milestones_for_gig(&self, gig_id: GigId) -> Result<Vec<Milestone>, RepositoryError> {
        Ok(self.state.lock().await.milestones_for_gig(gig_id))
    }

    async fn search(&self, query: &RankedGigQuery) -> Result<(Vec<Gig>, u64), RepositoryError> {
        let state = self.state.lock().await;
        Ok(run_ranked_query(&state, query))
    }

    async fn begin(&self) -> Result<Box<dyn GigUnitOfWork>, RepositoryError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }
}

struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    staged: StoreState,
}

#[async_trait]
impl GigUnitOfWork for MemoryUnitOfWork {
    async fn gig_for_update(&mut self, id: GigId) -> Result<Option<Gig>, RepositoryError> {
        Ok(self.staged.gigs.get(&id).cloned())
    }

    async fn application_for_update(
        &mut self,
        id: ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.staged.applications.get(&id).cloned())
    }

    async fn milestone_for_update(
        &mut self,
        id: MilestoneId,
    ) -> Result<Option<Milestone>, RepositoryError> {
        Ok(self.staged.milestones.get(&id).cloned())
    }

    async fn applications_for_gig(
        &mut self,
        gig_id: GigId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.staged.applications_for_gig(gig_id))
    }

    async fn milestones_for_gig(
        &mut self,
        gig_id: GigId,
    ) -> Result<Vec<Milestone>, RepositoryError> {
        Ok(self.staged.milestones_for_gig(gig_id))
    }

    async fn insert_gig(&mut self, gig: &Gig) -> Result<(), RepositoryError> {
        self.staged.gigs.insert(gig.id, gig.clone());
        Ok(())
    }

    async fn insert_milestones(
        &mut self,
        milestones: &[Milestone],
    ) -> Result<(), RepositoryError> {
        for milestone in milestones {
            self.staged.milestones.insert(milestone.id, milestone.clone());
        }
        Ok(())
    }

    async fn insert_application(
        &mut self,
        application: &Application,
    ) -> Result<(), RepositoryError> {
        let duplicate = self.staged.applications.values().any(|a| {
            a.gig_id == application.gig_id && a.worker_id == application.worker_id
        });
        if duplicate {
            return Err(RepositoryError::Duplicate(
                "application already exists for this gig and worker".to_string(),
            ));
        }
        self.staged
            .applications
            .insert(application.id, application.clone());
        Ok(())
    }

    async fn set_gig_status(
        &mut self,
        id: GigId,
        status: GigStatus,
    ) -> Result<(), RepositoryError> {
        if let Some(gig) = self.staged.gigs.get_mut(&id) {
            gig.status = status;
            gig.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn set_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), RepositoryError> {
        if let Some(application) = self.staged.applications.get_mut(&id) {
            application.status = status;
        }
        Ok(())
    }

    async fn reject_pending_siblings(
        &mut self,
        gig_id: GigId,
        keep: ApplicationId,
    ) -> Result<u64, RepositoryError> {
        let mut changed = 0;
        for application in self.staged.applications.values_mut() {
            if application.gig_id == gig_id
                && application.id != keep
                && application.status == ApplicationStatus::Pending
            {
                application.status = ApplicationStatus::Rejected;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn set_milestone_worker_done(
        &mut self,
        id: MilestoneId,
        done: bool,
    ) -> Result<(), RepositoryError> {
        if let Some(milestone) = self.staged.milestones.get_mut(&id) {
            milestone.completed_by_worker = done;
        }
        Ok(())
    }

    async fn set_milestone_status(
        &mut self,
        id: MilestoneId,
        status: MilestoneStatus,
    ) -> Result<(), RepositoryError> {
        if let Some(milestone) = self.staged.milestones.get_mut(&id) {
            milestone.status = status;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut guard = self.guard;
        *guard = self.staged;
        Ok(())
    }
}
