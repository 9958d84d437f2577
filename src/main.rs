use axum::Router;
use findcourse::cache::{MemorySegmentCache, RedisSegmentCache, SegmentCache};
use findcourse::config::Config;
use findcourse::db::{PlaceRepository, SqlitePlaceRepository};
use findcourse::services::keyword_search::{KakaoLocalClient, KeywordSearch};
use findcourse::services::planner::RoutePlanner;
use findcourse::services::routing::{KakaoNaviClient, RoutingService};
use findcourse::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "findcourse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting FindCourse API server");
    tracing::info!(
        max_exhaustive_visits = config.planner.max_exhaustive_visits,
        max_candidate_routes = config.planner.max_candidate_routes,
        segment_timeout_ms = config.planner.segment_timeout_ms,
        "Configuration loaded successfully"
    );

    // Open the place store
    tracing::info!("Connecting to database...");
    let db_pool = findcourse::db::create_pool(&config.database_url).await?;
    SqlitePlaceRepository::create_schema(&db_pool).await?;
    tracing::info!("Database ready");

    // Segment cache: try Redis, fall back to in-memory
    let cache: Arc<dyn SegmentCache> = if let Some(ref redis_url) = config.redis_url {
        tracing::info!("Connecting to Redis cache...");
        match RedisSegmentCache::new(redis_url, config.segment_cache_ttl).await {
            Ok(redis_cache) => Arc::new(redis_cache),
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Falling back to in-memory cache.",
                    e
                );
                Arc::new(MemorySegmentCache::with_ttl(config.segment_cache_ttl))
            }
        }
    } else {
        tracing::info!("Redis URL not configured. Using in-memory cache.");
        Arc::new(MemorySegmentCache::with_ttl(config.segment_cache_ttl))
    };

    // Initialize services
    let timeout = config.planner.segment_timeout();
    let place_repo: Arc<dyn PlaceRepository> =
        Arc::new(SqlitePlaceRepository::new(db_pool.clone()));
    let keyword_search: Arc<dyn KeywordSearch> = Arc::new(KakaoLocalClient::with_base_url(
        config.kakao_api_key.clone(),
        config.kakao_local_base_url.clone(),
        timeout,
    )?);
    let routing: Arc<dyn RoutingService> = Arc::new(KakaoNaviClient::with_config(
        config.kakao_api_key.clone(),
        config.kakao_navi_base_url.clone(),
        config.planner.duration_unit,
        timeout,
    )?);
    let planner = RoutePlanner::new(
        place_repo.clone(),
        keyword_search.clone(),
        routing,
        cache.clone(),
        config.planner.clone(),
    );

    // Create application state
    let state = Arc::new(AppState {
        db_pool,
        place_repo,
        keyword_search,
        planner,
        cache,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", findcourse::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
