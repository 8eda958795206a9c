// ABOUTME: Utility module collection for shared helpers
// ABOUTME: Houses the outbound HTTP client construction used by providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client construction with timeout configuration
pub mod http_client;
