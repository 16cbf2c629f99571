// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Shared fixtures for the scenario tests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use gigworks::application::workflow::ApplicationWorkflow;
use gigworks::domain::geo::GeoPoint;
use gigworks::domain::gig::{Gig, GigId, GigStatus};
use gigworks::domain::identity::{Identity, RequestContext, Role, UserId};
use gigworks::domain::repository::GigRepository;
use gigworks::infrastructure::auth::StaticAuthGateway;
use gigworks::infrastructure::repositories::memory::InMemoryGigRepository;

pub struct World {
    pub repo: Arc<InMemoryGigRepository>,
    pub workflow: Arc<ApplicationWorkflow>,
    pub employer: Identity,
    pub employer_ctx: RequestContext,
    pub workers: Vec<(Identity, RequestContext)>,
}

/// An employer plus `worker_count` workers, all with resolvable tokens.
pub async fn world(worker_count: usize) -> World {
    let repo = Arc::new(InMemoryGigRepository::new());
    let employer = Identity { id: UserId::new(), role: Role::Employer };
    let mut auth = StaticAuthGateway::new();
    auth.register("employer", employer);

    let mut workers = Vec::new();
    for i in 0..worker_count {
        let identity = Identity { id: UserId::new(), role: Role::Worker };
        let token = format!("worker-{i}");
        auth.register(token.clone(), identity);
        workers.push((identity, RequestContext::bearer(token)));
    }

    let workflow = Arc::new(ApplicationWorkflow::new(
        repo.clone() as Arc<dyn GigRepository>,
        Arc::new(auth),
    ));
    World {
        repo,
        workflow,
        employer,
        employer_ctx: RequestContext::bearer("employer"),
        workers,
    }
}

/// Seed an `Open` gig directly through the repository.
pub async fn seed_gig(repo: &InMemoryGigRepository, employer_id: UserId, pay: i64) -> Gig {
    seed_gig_at(repo, employer_id, pay, 0.0, 0.0, Duration::days(7)).await
}

pub async fn seed_gig_at(
    repo: &InMemoryGigRepository,
    employer_id: UserId,
    pay: i64,
    latitude: f64,
    longitude: f64,
    deadline_in: Duration,
) -> Gig {
    let now = Utc::now();
    let gig = Gig {
        id: GigId::new(),
        title: format!("Gig paying {pay}"),
        description: "A short-term job for the fixtures".into(),
        pay,
        deadline: now + deadline_in,
        status: GigStatus::Open,
        categories: vec!["general".into()],
        location: GeoPoint::new(latitude, longitude).unwrap(),
        employer_id,
        created_at: now,
        updated_at: now,
    };
    let mut uow = repo.begin().await.unwrap();
    uow.insert_gig(&gig).await.unwrap();
    uow.commit().await.unwrap();
    gig
}
