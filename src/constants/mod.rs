// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Provider limits, environment variable names, defaults, and activity type keys

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! large namespace.

pub mod units;

/// Provider identifiers
pub mod oauth_providers {
    /// Garmin Connect
    pub const GARMIN: &str = "garmin";
    /// Local JSON fixture source
    pub const FIXTURE: &str = "fixture";
}

/// Service names for structured logging
pub mod service_names {
    /// Name reported in startup logs
    pub const WEEKLY_REPORT: &str = "weekly-training-report";
}

/// API provider limits
pub mod api_provider_limits {
    /// Garmin-specific limits
    pub mod garmin {
        /// Default activities per page
        pub const DEFAULT_ACTIVITIES_PER_PAGE: usize = 20;
        /// Maximum activities per request
        pub const MAX_ACTIVITIES_PER_REQUEST: usize = 100;
        /// Estimated rate limit block duration reported to users
        pub const ESTIMATED_RATE_LIMIT_BLOCK_DURATION_SECS: u64 = 3600;
        /// Retry attempts on 429
        pub const MAX_RETRIES: u32 = 3;
        /// Initial backoff before the first retry
        pub const INITIAL_BACKOFF_MS: u64 = 1000;
    }
}

/// Default endpoint and pipeline values
pub mod defaults {
    /// Garmin Connect API base URL
    pub const GARMIN_API_BASE_URL: &str = "https://connectapi.garmin.com";
    /// Token endpoint used for username/password exchange
    pub const GARMIN_TOKEN_URL: &str = "https://connectapi.garmin.com/oauth-service/oauth/token";
    /// Activity list endpoint, relative to the API base URL
    pub const ACTIVITY_LIST_PATH: &str = "activitylist-service/activities/search/activities";
    /// Upper bound on pages fetched per report
    pub const MAX_PAGES: usize = 50;
    /// HTTP server port for `serve`
    pub const HTTP_PORT: u16 = 8080;
    /// Request timeout for outbound calls
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout for outbound calls
    pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Environment variable names
pub mod env_vars {
    /// Garmin API base URL override
    pub const GARMIN_API_BASE_URL: &str = "GARMIN_API_BASE_URL";
    /// Garmin token endpoint override
    pub const GARMIN_TOKEN_URL: &str = "GARMIN_TOKEN_URL";
    /// Account username (email)
    pub const GARMIN_USERNAME: &str = "GARMIN_USERNAME";
    /// Account password
    pub const GARMIN_PASSWORD: &str = "GARMIN_PASSWORD";
    /// Pre-issued bearer token
    pub const GARMIN_ACCESS_TOKEN: &str = "GARMIN_ACCESS_TOKEN";
    /// Activities per page
    pub const REPORT_PAGE_SIZE: &str = "REPORT_PAGE_SIZE";
    /// Maximum pages per report
    pub const REPORT_MAX_PAGES: &str = "REPORT_MAX_PAGES";
    /// Offset used to decide what "today" is
    pub const REPORT_UTC_OFFSET_HOURS: &str = "REPORT_UTC_OFFSET_HOURS";
    /// Port for `serve`
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Outbound request timeout
    pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
}

/// Garmin `activityType.typeKey` values grouped by report section
pub mod activity_types {
    /// Keys reported as running
    pub const RUNNING: &[&str] = &[
        "running",
        "street_running",
        "track_running",
        "trail_running",
        "treadmill_running",
        "indoor_running",
        "virtual_run",
    ];
    /// Keys reported as cycling
    pub const CYCLING: &[&str] = &[
        "cycling",
        "road_biking",
        "mountain_biking",
        "gravel_cycling",
        "indoor_cycling",
        "virtual_ride",
    ];
    /// Keys reported as lap swimming
    pub const LAP_SWIMMING: &[&str] = &["lap_swimming"];
}

/// Response envelope headers
pub mod headers {
    /// CORS header name
    pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    /// Content type header name
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// JSON media type
    pub const APPLICATION_JSON: &str = "application/json";
}
