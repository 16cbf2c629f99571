// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Gig/application lifecycle state machine.
//!
//! Gig: `Open → InProgress → Completed` or `Open → Canceled`; `InProgress`
//! is never revisited. Application: `Pending → Accepted` or
//! `Pending → Rejected`, both terminal.
//!
//! Every multi-row mutation runs inside exactly one repository unit of
//! work, and preconditions are re-validated on the locked rows immediately
//! before mutating. Two concurrent `accept` calls on the same gig therefore
//! cannot both succeed: the loser re-reads the gig after the winner's
//! commit and observes a Conflict.

use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::gig::{Gig, GigId, GigStatus, Milestone, MilestoneId, MilestoneStatus, NewGig};
use crate::domain::gig_application::{Application, ApplicationId, ApplicationStatus};
use crate::domain::identity::{AuthorizationGateway, Identity, RequestContext, Role};
use crate::domain::repository::{GigRepository, GigUnitOfWork};

pub struct ApplicationWorkflow {
    repository: Arc<dyn GigRepository>,
    auth: Arc<dyn AuthorizationGateway>,
}

impl ApplicationWorkflow {
    pub fn new(repository: Arc<dyn GigRepository>, auth: Arc<dyn AuthorizationGateway>) -> Self {
        Self { repository, auth }
    }

    /// Post a new gig. Employer only; the gig starts `Open` and its
    /// milestone set is fixed here (milestones cannot be added once the gig
    /// leaves `Open`, and there is no other creation path).
    pub async fn post_gig(
        &self,
        ctx: &RequestContext,
        input: NewGig,
    ) -> Result<Gig, DomainError> {
        let employer = self.auth.require_role(ctx, Role::Employer).await?;
        let (gig, milestones) = input.into_gig(employer.id)?;

        let mut uow = self.repository.begin().await?;
        uow.insert_gig(&gig).await?;
        uow.insert_milestones(&milestones).await?;
        uow.commit().await?;

        tracing::info!(gig_id = %gig.id, employer_id = %employer.id, "gig posted");
        Ok(gig)
    }

    /// Apply for a gig. Worker only; one application per `(gig, worker)`.
    ///
    /// The gig's `Open` status is re-checked inside the same transaction as
    /// the insert, so an application cannot slip in while a concurrent
    /// accept or cancel closes the gig.
    pub async fn apply(
        &self,
        ctx: &RequestContext,
        gig_id: GigId,
        message: Option<String>,
    ) -> Result<Application, DomainError> {
        let worker = self.auth.require_role(ctx, Role::Worker).await?;

        let mut uow = self.repository.begin().await?;
        let gig = uow
            .gig_for_update(gig_id)
            .await?
            .ok_or_else(|| DomainError::not_found("gig not found"))?;
        if !gig.is_open() {
            return Err(DomainError::conflict("this gig is not open for applications"));
        }

        let application = Application::new(gig_id, worker.id, message);
        uow.insert_application(&application).await.map_err(|err| {
            match DomainError::from(err) {
                DomainError::Conflict(_) => {
                    DomainError::conflict("you have already applied for this gig")
                }
                other => other,
            }
        })?;
        uow.commit().await?;

        tracing::info!(gig_id = %gig_id, worker_id = %worker.id, "application submitted");
        Ok(application)
    }

    /// Accept one application: atomically marks it `Accepted`, rejects every
    /// other `Pending` sibling, and moves the gig to `InProgress`. No
    /// partial effect is observable on failure.
    pub async fn accept(
        &self,
        ctx: &RequestContext,
        application_id: ApplicationId,
    ) -> Result<(), DomainError> {
        let employer = self.auth.require_role(ctx, Role::Employer).await?;

        // An application's gig_id never changes, so it can be read outside
        // the transaction to learn which gig to lock.
        let gig_id = self
            .repository
            .find_application(application_id)
            .await?
            .ok_or_else(|| DomainError::not_found("application not found"))?
            .gig_id;

        // Lock order is gig first, application rows second; cancel takes its
        // locks in the same order.
        let mut uow = self.repository.begin().await?;
        let gig = uow
            .gig_for_update(gig_id)
            .await?
            .ok_or_else(|| DomainError::not_found("gig not found"))?;
        let application = uow
            .application_for_update(application_id)
            .await?
            .ok_or_else(|| DomainError::not_found("application not found"))?;

        if gig.employer_id != employer.id {
            return Err(DomainError::permission("you are not the employer of this gig"));
        }
        if !gig.is_open() {
            return Err(DomainError::conflict("this gig is no longer open"));
        }
        if application.status != ApplicationStatus::Pending {
            return Err(DomainError::conflict("this application has already been decided"));
        }

        uow.set_application_status(application_id, ApplicationStatus::Accepted)
            .await?;
        let rejected = uow
            .reject_pending_siblings(gig.id, application_id)
            .await?;
        uow.set_gig_status(gig.id, GigStatus::InProgress).await?;
        uow.commit().await?;

        tracing::info!(
            gig_id = %gig.id,
            application_id = %application_id,
            rejected_siblings = rejected,
            "application accepted, gig in progress"
        );
        Ok(())
    }

    /// Cancel an `Open` gig. Employer + ownership; blocked once any
    /// application has left `Pending`.
    pub async fn cancel(&self, ctx: &RequestContext, gig_id: GigId) -> Result<Gig, DomainError> {
        let employer = self.auth.require_role(ctx, Role::Employer).await?;

        let mut uow = self.repository.begin().await?;
        let mut gig = uow
            .gig_for_update(gig_id)
            .await?
            .ok_or_else(|| DomainError::not_found("gig not found"))?;

        if gig.employer_id != employer.id {
            return Err(DomainError::permission("you are not the employer of this gig"));
        }
        if !gig.is_open() {
            return Err(DomainError::conflict("only open gigs can be canceled"));
        }
        let applications = uow.applications_for_gig(gig_id).await?;
        if applications.iter().any(|a| a.status.is_terminal()) {
            return Err(DomainError::conflict(
                "cannot cancel a gig with decided applications",
            ));
        }

        uow.set_gig_status(gig_id, GigStatus::Canceled).await?;
        uow.commit().await?;

        gig.status = GigStatus::Canceled;
        tracing::info!(gig_id = %gig_id, "gig canceled");
        Ok(gig)
    }

    /// Worker reports a milestone as done. The gig must be `InProgress` and
    /// the caller must hold its accepted application.
    pub async fn complete_milestone(
        &self,
        ctx: &RequestContext,
        milestone_id: MilestoneId,
    ) -> Result<(), DomainError> {
        let worker = self.auth.require_role(ctx, Role::Worker).await?;

        let mut uow = self.repository.begin().await?;
        let (milestone, gig) = self.milestone_with_gig(&mut uow, milestone_id).await?;

        if gig.status != GigStatus::InProgress {
            return Err(DomainError::conflict("the gig is not in progress"));
        }
        let accepted = uow
            .applications_for_gig(gig.id)
            .await?
            .into_iter()
            .find(|a| a.status == ApplicationStatus::Accepted);
        if accepted.map(|a| a.worker_id) != Some(worker.id) {
            return Err(DomainError::permission("you are not the worker on this gig"));
        }
        if milestone.status == MilestoneStatus::Completed {
            return Err(DomainError::conflict("this milestone is already completed"));
        }

        uow.set_milestone_worker_done(milestone_id, true).await?;
        uow.commit().await?;

        tracing::info!(milestone_id = %milestone_id, gig_id = %gig.id, "milestone reported done");
        Ok(())
    }

    /// Employer approves a worker-reported milestone. Approving the last one
    /// completes the gig (`InProgress → Completed`).
    pub async fn approve_milestone(
        &self,
        ctx: &RequestContext,
        milestone_id: MilestoneId,
    ) -> Result<(), DomainError> {
        let employer = self.auth.require_role(ctx, Role::Employer).await?;

        let mut uow = self.repository.begin().await?;
        let (milestone, gig) = self.milestone_with_gig(&mut uow, milestone_id).await?;

        if gig.employer_id != employer.id {
            return Err(DomainError::permission("you are not the employer of this gig"));
        }
        if gig.status != GigStatus::InProgress {
            return Err(DomainError::conflict("the gig is not in progress"));
        }
        if milestone.status == MilestoneStatus::Completed {
            return Err(DomainError::conflict("this milestone is already completed"));
        }
        if !milestone.completed_by_worker {
            return Err(DomainError::conflict(
                "the worker has not reported this milestone as done",
            ));
        }

        uow.set_milestone_status(milestone_id, MilestoneStatus::Completed)
            .await?;

        let all_done = uow
            .milestones_for_gig(gig.id)
            .await?
            .iter()
            .all(|m| m.id == milestone_id || m.status == MilestoneStatus::Completed);
        if all_done {
            uow.set_gig_status(gig.id, GigStatus::Completed).await?;
        }
        uow.commit().await?;

        tracing::info!(
            milestone_id = %milestone_id,
            gig_id = %gig.id,
            gig_completed = all_done,
            "milestone approved"
        );
        Ok(())
    }

    async fn milestone_with_gig(
        &self,
        uow: &mut Box<dyn GigUnitOfWork>,
        milestone_id: MilestoneId,
    ) -> Result<(Milestone, Gig), DomainError> {
        let milestone = uow
            .milestone_for_update(milestone_id)
            .await?
            .ok_or_else(|| DomainError::not_found("milestone not found"))?;
        let gig = uow
            .gig_for_update(milestone.gig_id)
            .await?
            .ok_or_else(|| DomainError::not_found("gig not found"))?;
        Ok((milestone, gig))
    }

    /// Expose the resolved identity for presentation-layer needs.
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<Identity, DomainError> {
        self.auth.resolve_identity(ctx).await
    }
}
