//! Stable application-wide constants.
//!
//! Values here are structural invariants and default fallbacks for
//! env-var-based configuration. Runtime tuning lives in
//! [`PlannerConfig`](crate::config::PlannerConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";
/// Default SQLite database for saved places. `mode=rwc` creates the file.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://findcourse.db?mode=rwc";

// --- Upstream services ---

/// Base URL of the keyword/geocode lookup service.
pub const DEFAULT_KAKAO_LOCAL_BASE_URL: &str = "https://dapi.kakao.com";
/// Base URL of the directions service.
pub const DEFAULT_KAKAO_NAVI_BASE_URL: &str = "https://apis-navi.kakaomobility.com";
/// Per-call timeout for upstream HTTP requests (milliseconds).
pub const DEFAULT_SEGMENT_TIMEOUT_MS: u64 = 10_000;

// --- Geometry ---

/// Mean Earth radius used by the haversine fallback, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// --- Segment cache ---

/// Sentinel for "duration unknown": the leg was measured geometrically.
pub const UNKNOWN_DURATION: i64 = -1;
/// Default TTL of cached segments: 24 hours. Overridden by `SEGMENT_CACHE_TTL`.
pub const DEFAULT_SEGMENT_CACHE_TTL_SECONDS: u64 = 86_400;
/// Key prefix for segments stored in Redis.
pub const SEGMENT_CACHE_KEY_PREFIX: &str = "segment";

// --- Route space limits ---
// Exhaustive enumeration yields C(n,k) * k! candidate routes. Both limits are
// checked before any routing call is made.

/// Largest visit count accepted by the exhaustive strategy.
pub const DEFAULT_MAX_EXHAUSTIVE_VISITS: usize = 8;
/// Largest number of candidate routes a single request may enumerate.
pub const DEFAULT_MAX_CANDIDATE_ROUTES: u64 = 200_000;
/// Default bound on concurrently evaluated routes (0 = unbounded).
pub const DEFAULT_MAX_CONCURRENT_EVALUATIONS: usize = 64;
