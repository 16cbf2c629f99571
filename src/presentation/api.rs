// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! JSON API over the workflow and search services.
//!
//! Handlers stay thin: build a `RequestContext` from the bearer token,
//! delegate to a service, and wrap the result in the tagged
//! `{success, data?, message}` envelope with a status code per error kind.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::application::detail::GigDetailService;
use crate::application::search::SearchRankingEngine;
use crate::application::workflow::ApplicationWorkflow;
use crate::domain::error::{DomainError, ErrorKind};
use crate::domain::gig::{GigId, MilestoneId, NewGig};
use crate::domain::gig_application::ApplicationId;
use crate::domain::identity::{RequestContext, Role};
use crate::domain::search::GigSearchParams;

pub struct AppState {
    pub workflow: Arc<ApplicationWorkflow>,
    pub search: Arc<SearchRankingEngine>,
    pub detail: Arc<GigDetailService>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/gigs", get(search_gigs).post(post_gig))
        .route("/gigs/{id}", get(gig_detail))
        .route("/gigs/{id}/applications", post(apply))
        .route("/gigs/{id}/cancel", post(cancel))
        .route("/applications/{id}/accept", post(accept))
        .route("/milestones/{id}/complete", post(complete_milestone))
        .route("/milestones/{id}/approve", post(approve_milestone))
        .with_state(state)
}

fn context_from(headers: &HeaderMap) -> RequestContext {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(RequestContext::bearer)
        .unwrap_or_else(RequestContext::anonymous)
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Permission => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: Result<T, DomainError>, message: &str) -> Response {
    match result {
        Ok(data) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": data, "message": message })),
        )
            .into_response(),
        Err(err) => (
            status_for(err.kind()),
            Json(json!({
                "success": false,
                "error": err.kind().as_str(),
                "message": err.to_string(),
            })),
        )
            .into_response(),
    }
}

async fn search_gigs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GigSearchParams>,
) -> Response {
    respond(state.search.search(params).await, "gigs retrieved")
}

async fn gig_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let ctx = context_from(&headers);
    // Anonymous viewers still get the public detail view.
    let viewer = state
        .workflow
        .whoami(&ctx)
        .await
        .ok()
        .filter(|identity| identity.role == Role::Worker)
        .map(|identity| identity.id);
    respond(
        state.detail.detail(GigId(id), viewer).await,
        "gig retrieved",
    )
}

async fn post_gig(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<NewGig>,
) -> Response {
    let ctx = context_from(&headers);
    respond(
        state.workflow.post_gig(&ctx, input).await,
        "gig created successfully",
    )
}

#[derive(serde::Deserialize, Default)]
struct ApplyRequest {
    message: Option<String>,
}

async fn apply(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<ApplyRequest>,
) -> Response {
    let ctx = context_from(&headers);
    respond(
        state.workflow.apply(&ctx, GigId(id), body.message).await,
        "application submitted successfully",
    )
}

async fn accept(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let ctx = context_from(&headers);
    respond(
        state.workflow.accept(&ctx, ApplicationId(id)).await,
        "application accepted successfully",
    )
}

async fn cancel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let ctx = context_from(&headers);
    respond(
        state.workflow.cancel(&ctx, GigId(id)).await,
        "gig canceled successfully",
    )
}

async fn complete_milestone(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let ctx = context_from(&headers);
    respond(
        state.workflow.complete_milestone(&ctx, MilestoneId(id)).await,
        "milestone reported as done",
    )
}

async fn approve_milestone(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let ctx = context_from(&headers);
    respond(
        state.workflow.approve_milestone(&ctx, MilestoneId(id)).await,
        "milestone approved",
    )
}
