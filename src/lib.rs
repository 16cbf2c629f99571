// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Gigworks core
//!
//! Marketplace engine connecting employers posting short-term jobs ("gigs")
//! with workers applying for them. The crate carries two load-bearing pieces:
//! the gig/application lifecycle state machine and the geo-ranked, filtered,
//! paginated gig search. Everything else is thin glue around them.
//!
//! # Architecture
//!
//! - **domain** — entities, value objects, ports, errors, pure algorithms
//! - **application** — workflow and search services
//! - **infrastructure** — in-memory and PostgreSQL repositories, Nominatim client
//! - **presentation** — axum JSON surface

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
