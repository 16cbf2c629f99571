// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Presentation layer: thin JSON surface over the application services.

pub mod api;
