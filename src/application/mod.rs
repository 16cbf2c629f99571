// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Application layer: services orchestrating the domain over its ports.

pub mod workflow;
pub mod search;
pub mod detail;

pub use detail::{GigDetail, GigDetailService};
pub use search::SearchRankingEngine;
pub use workflow::ApplicationWorkflow;
