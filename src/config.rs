use crate::constants::*;
use std::env;
use std::time::Duration;

/// How a route's total duration is reported when some legs fell back to
/// geometric distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationPolicy {
    /// Sum only the legs the routing service resolved; fallback legs add 0.
    #[default]
    SumResolved,
    /// Report the total as unknown (-1) as soon as any leg fell back.
    SuppressPartial,
}

impl std::str::FromStr for DurationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum_resolved" => Ok(DurationPolicy::SumResolved),
            "suppress_partial" => Ok(DurationPolicy::SuppressPartial),
            _ => Err(format!(
                "Invalid duration policy: {}. Use 'sum_resolved' or 'suppress_partial'",
                s
            )),
        }
    }
}

/// Unit of the `duration` field in directions summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationUnit {
    #[default]
    Milliseconds,
    Seconds,
}

impl DurationUnit {
    /// Convert a raw summary duration to whole seconds (truncating).
    pub fn to_seconds(self, raw: i64) -> i64 {
        match self {
            DurationUnit::Milliseconds => raw / 1000,
            DurationUnit::Seconds => raw,
        }
    }
}

impl std::str::FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ms" | "milliseconds" => Ok(DurationUnit::Milliseconds),
            "s" | "seconds" => Ok(DurationUnit::Seconds),
            _ => Err(format!(
                "Invalid duration unit: {}. Use 'milliseconds' or 'seconds'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub redis_url: Option<String>,
    pub kakao_api_key: String,
    pub kakao_local_base_url: String,
    pub kakao_navi_base_url: String,
    pub segment_cache_ttl: u64,
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Largest visit count the exhaustive strategy accepts
    pub max_exhaustive_visits: usize,

    /// Upper bound on C(n,k) * k! for a single request
    pub max_candidate_routes: u64,

    /// Routes evaluated at once; 0 means one task per route with no bound
    pub max_concurrent_evaluations: usize,

    /// Timeout applied to every routing-service call
    pub segment_timeout_ms: u64,

    /// Aggregation of total duration when some legs fell back
    pub duration_policy: DurationPolicy,

    /// Decimal places coordinates are rounded to before keying the segment
    /// cache. `None` keys on exact coordinates.
    pub segment_key_precision: Option<u32>,

    /// Unit of the directions summary duration
    pub duration_unit: DurationUnit,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_exhaustive_visits: DEFAULT_MAX_EXHAUSTIVE_VISITS,
            max_candidate_routes: DEFAULT_MAX_CANDIDATE_ROUTES,
            max_concurrent_evaluations: DEFAULT_MAX_CONCURRENT_EVALUATIONS,
            segment_timeout_ms: DEFAULT_SEGMENT_TIMEOUT_MS,
            duration_policy: DurationPolicy::default(),
            segment_key_precision: None,
            duration_unit: DurationUnit::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let segment_key_precision = match env::var("SEGMENT_KEY_PRECISION") {
            Ok(v) if !v.trim().is_empty() => {
                let places: u32 = v
                    .trim()
                    .parse()
                    .map_err(|_| "Invalid SEGMENT_KEY_PRECISION")?;
                if places > 12 {
                    return Err("SEGMENT_KEY_PRECISION must be between 0 and 12".to_string());
                }
                Some(places)
            }
            _ => None,
        };

        let segment_timeout_ms: u64 = env::var("PLANNER_SEGMENT_TIMEOUT_MS")
            .unwrap_or_else(|_| defaults.segment_timeout_ms.to_string())
            .parse()
            .map_err(|_| "Invalid PLANNER_SEGMENT_TIMEOUT_MS")?;

        if segment_timeout_ms == 0 {
            return Err("PLANNER_SEGMENT_TIMEOUT_MS must be greater than 0".to_string());
        }

        Ok(Self {
            max_exhaustive_visits: env::var("PLANNER_MAX_EXHAUSTIVE_VISITS")
                .unwrap_or_else(|_| defaults.max_exhaustive_visits.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_MAX_EXHAUSTIVE_VISITS")?,

            max_candidate_routes: env::var("PLANNER_MAX_CANDIDATE_ROUTES")
                .unwrap_or_else(|_| defaults.max_candidate_routes.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_MAX_CANDIDATE_ROUTES")?,

            max_concurrent_evaluations: env::var("PLANNER_MAX_CONCURRENT_EVALUATIONS")
                .unwrap_or_else(|_| defaults.max_concurrent_evaluations.to_string())
                .parse()
                .map_err(|_| "Invalid PLANNER_MAX_CONCURRENT_EVALUATIONS")?,

            segment_timeout_ms,

            duration_policy: env::var("PLANNER_DURATION_POLICY")
                .unwrap_or_else(|_| "sum_resolved".to_string())
                .parse()?,

            segment_key_precision,

            duration_unit: env::var("ROUTING_DURATION_UNIT")
                .unwrap_or_else(|_| "milliseconds".to_string())
                .parse()?,
        })
    }

    pub fn segment_timeout(&self) -> Duration {
        Duration::from_millis(self.segment_timeout_ms)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let segment_cache_ttl: u64 = env::var("SEGMENT_CACHE_TTL")
            .unwrap_or_else(|_| DEFAULT_SEGMENT_CACHE_TTL_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid SEGMENT_CACHE_TTL")?;

        if segment_cache_ttl == 0 {
            return Err("SEGMENT_CACHE_TTL must be greater than 0".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").ok(),
            kakao_api_key: env::var("KAKAO_API_KEY").map_err(|_| "KAKAO_API_KEY must be set")?,
            kakao_local_base_url: env::var("KAKAO_LOCAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_KAKAO_LOCAL_BASE_URL.to_string()),
            kakao_navi_base_url: env::var("KAKAO_NAVI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_KAKAO_NAVI_BASE_URL.to_string()),
            segment_cache_ttl,
            planner: PlannerConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
