// ABOUTME: Fitness data provider integrations for external platforms and offline exports
// ABOUTME: Unifies access to Garmin Connect and JSON fixtures behind one paged contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Streaming iteration over paged activity lists
pub mod activity_iterator;
/// Core provider trait and credential types
pub mod core;
/// Offline provider backed by a JSON export
pub mod fixture_provider;
/// Garmin Connect provider
pub mod garmin_provider;
/// Shared retry and token exchange helpers
pub mod utils;

pub use activity_iterator::{collect_window, create_activity_stream, StreamConfig};
pub use self::core::{ActivityPage, ActivityProvider, Credentials, ProviderFactory};
pub use fixture_provider::FixtureProvider;
pub use garmin_provider::{GarminEndpoints, GarminProvider, GarminProviderFactory};
