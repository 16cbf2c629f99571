// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain layer: aggregates, value objects, ports and pure algorithms.
//!
//! Persistence and authorization contracts are defined here and implemented
//! in `crate::infrastructure`; services in `crate::application` depend only
//! on these traits.

pub mod gig;
pub mod gig_application;
pub mod identity;
pub mod error;
pub mod geo;
pub mod search;
pub mod repository;

pub use error::{DomainError, ErrorKind};
pub use geo::GeoPoint;
pub use gig::{Gig, GigId, GigStatus, Milestone, MilestoneId, MilestoneStatus, NewGig, NewMilestone};
pub use gig_application::{Application, ApplicationId, ApplicationStatus};
pub use identity::{AuthorizationGateway, Identity, RequestContext, Role, UserId};
pub use search::{GigPage, GigSearchParams, SortBy, SortOrder};
