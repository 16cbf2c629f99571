// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure layer: adapters implementing the domain ports.

pub mod db;
pub mod auth;
pub mod geocoder;
pub mod repositories;

pub use auth::StaticAuthGateway;
pub use db::Database;
pub use geocoder::{NominatimGeocoder, NullGeocoder};
pub use repositories::memory::InMemoryGigRepository;
pub use repositories::postgres::PostgresGigRepository;
