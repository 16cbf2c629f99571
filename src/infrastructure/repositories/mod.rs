// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Repository implementations.
//!
//! `memory` backs development and tests; `postgres` is the production
//! store. Both honor the same contract: ranked queries filter and fully
//! order before paginating, and unit-of-work mutations are atomic.

pub mod memory;
pub mod postgres;
