// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Gig detail view: the gig, its milestones, application counts and a
//! best-effort human-readable address.
//!
//! Reverse geocoding is an external call; its failure is logged and the
//! address is simply omitted, never failing the view.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::geo::ReverseGeocoder;
use crate::domain::gig::{Gig, GigId, Milestone};
use crate::domain::gig_application::ApplicationStatus;
use crate::domain::identity::UserId;
use crate::domain::repository::GigRepository;

#[derive(Debug, Clone, Serialize)]
pub struct GigDetail {
    #[serde(flatten)]
    pub gig: Gig,
    /// Reverse-geocoded address; absent when the geocoder is unavailable.
    pub address: Option<String>,
    pub milestones: Vec<Milestone>,
    pub application_count: usize,
    /// The viewer's own application status, when a worker is viewing.
    pub viewer_application_status: Option<ApplicationStatus>,
}

pub struct GigDetailService {
    repository: Arc<dyn GigRepository>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl GigDetailService {
    pub fn new(repository: Arc<dyn GigRepository>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { repository, geocoder }
    }

    pub async fn detail(
        &self,
        gig_id: GigId,
        viewer: Option<UserId>,
    ) -> Result<GigDetail, DomainError> {
        let gig = self
            .repository
            .find_gig(gig_id)
            .await?
            .ok_or_else(|| DomainError::not_found("gig not found"))?;

        let (applications, milestones) = futures::try_join!(
            self.repository.applications_for_gig(gig_id),
            self.repository.milestones_for_gig(gig_id),
        )?;

        let viewer_application_status = viewer.and_then(|worker_id| {
            applications
                .iter()
                .find(|a| a.worker_id == worker_id)
                .map(|a| a.status)
        });

        let address = self.geocoder.reverse(gig.location).await;

        Ok(GigDetail {
            application_count: applications.len(),
            address,
            milestones,
            viewer_application_status,
            gig,
        })
    }
}
