use axum::http::StatusCode;
use findcourse::db::PlaceRepository;
use findcourse::models::{Coordinates, PlaceCandidate, Segment};
use findcourse::services::test_support::{StubKeywordSearch, StubRoutingService};
use serde_json::json;
use std::sync::Arc;

mod common;

use common::{city_hall, create_test_place, send, setup_test_app};

fn city_hall_search() -> Arc<StubKeywordSearch> {
    Arc::new(StubKeywordSearch::at("Seoul City Hall", city_hall()))
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = setup_test_app(city_hall_search(), StubRoutingService::failing()).await;

    let (status, json) = send(&app.router, "GET", "/debug/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["database"], "ok");
    assert_eq!(json["checks"]["place_count"], 0);
    assert_eq!(json["checks"]["segment_cache"]["backend"], "memory");
}

#[tokio::test]
async fn test_place_crud() {
    let app = setup_test_app(city_hall_search(), StubRoutingService::failing()).await;

    let (status, created) = send(
        &app.router,
        "POST",
        "/places",
        Some(json!({
            "display_name": "Gyeongbokgung",
            "address": "161 Sajik-ro",
            "location": {"lat": 37.5796, "lng": 126.9770}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["display_name"], "Gyeongbokgung");
    let id = created["id"].as_str().unwrap().to_string();

    send(
        &app.router,
        "POST",
        "/places",
        Some(json!({
            "display_name": "Insadong",
            "location": {"lat": 37.5740, "lng": 126.9850}
        })),
    )
    .await;

    let (status, listed) = send(&app.router, "GET", "/places", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["display_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Gyeongbokgung", "Insadong"]);

    let (status, _) = send(&app.router, "DELETE", &format!("/places/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app.router, "DELETE", &format!("/places/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app.router, "DELETE", "/places", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);
    assert_eq!(app.place_repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_place_validation() {
    let app = setup_test_app(city_hall_search(), StubRoutingService::failing()).await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/places",
        Some(json!({
            "display_name": "Nowhere",
            "location": {"lat": 123.0, "lng": 126.9770}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid latitude: 123 (must be between -90 and 90)");
}

#[tokio::test]
async fn test_place_search_endpoint() {
    let search = Arc::new(StubKeywordSearch::with_results(vec![PlaceCandidate {
        place_name: "N Seoul Tower".to_string(),
        address: "Yongsan-gu".to_string(),
        road_address: Some("105 Namsangongwon-gil".to_string()),
        location: Coordinates::new(37.5512, 126.9882).unwrap(),
    }]));
    let app = setup_test_app(search, StubRoutingService::failing()).await;

    let (status, body) = send(&app.router, "GET", "/places/search?query=tower", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["place_name"], "N Seoul Tower");

    let (status, _) = send(&app.router, "GET", "/places/search?query=%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_search_result() {
    let app = setup_test_app(city_hall_search(), StubRoutingService::failing()).await;

    let (status, saved) = send(
        &app.router,
        "POST",
        "/places/from-search",
        Some(json!({
            "place_name": "Gyeongbokgung",
            "address": "Sejong-ro 1-1",
            "road_address": "161 Sajik-ro",
            "location": {"lat": 37.5796, "lng": 126.9770}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["display_name"], "Gyeongbokgung");
    assert_eq!(saved["address"], "161 Sajik-ro");

    let places = app.place_repo.list_all().await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].address, "161 Sajik-ro");

    let (status, _) = send(
        &app.router,
        "POST",
        "/places/from-search",
        Some(json!({
            "place_name": "Nowhere",
            "address": "",
            "location": {"lat": 37.5, "lng": 200.0}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.place_repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_place_search_upstream_failure() {
    let app = setup_test_app(
        Arc::new(StubKeywordSearch::failing()),
        StubRoutingService::failing(),
    )
    .await;

    let (status, body) = send(&app.router, "GET", "/places/search?query=tower", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Place search service error");
}

#[tokio::test]
async fn test_plan_endpoint() {
    let app = setup_test_app(
        city_hall_search(),
        StubRoutingService::fixed(Segment::new(1000.0, 60)),
    )
    .await;
    for place in [
        create_test_place("Gyeongbokgung", 37.5796, 126.9770),
        create_test_place("Insadong", 37.5740, 126.9850),
        create_test_place("Myeongdong", 37.5636, 126.9827),
    ] {
        app.place_repo.insert(&place).await.unwrap();
    }

    let (status, body) = send(
        &app.router,
        "POST",
        "/routes/plan",
        Some(json!({"start_keyword": "Seoul City Hall", "visit_count": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"], "exhaustive");
    assert_eq!(body["evaluated_routes"], 6);
    assert_eq!(body["route"]["total_distance_meters"], 2000.0);
    assert_eq!(body["route"]["total_duration_minutes"], 2);
    assert_eq!(body["route"]["places"].as_array().unwrap().len(), 2);
    assert!(body.get("advisory").is_none());
}

#[tokio::test]
async fn test_plan_endpoint_reports_advisory() {
    let app = setup_test_app(city_hall_search(), StubRoutingService::failing()).await;
    app.place_repo
        .insert(&create_test_place("Gyeongbokgung", 37.5796, 126.9770))
        .await
        .unwrap();

    let (status, body) = send(
        &app.router,
        "POST",
        "/routes/plan",
        Some(json!({"start_keyword": "Seoul City Hall", "visit_count": 1, "strategy": "greedy"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["advisory"]["kind"], "segment_unavailable");
    assert_eq!(body["advisory"]["fallback_legs"], 1);
    assert_eq!(body["route"]["per_leg_duration"][0], -1);
    assert_eq!(body["route"]["duration_complete"], false);
}

#[tokio::test]
async fn test_plan_endpoint_error_statuses() {
    // No saved places
    let app = setup_test_app(city_hall_search(), StubRoutingService::failing()).await;
    let (status, _) = send(
        &app.router,
        "POST",
        "/routes/plan",
        Some(json!({"start_keyword": "Seoul City Hall", "visit_count": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Origin not found
    let app = setup_test_app(Arc::new(StubKeywordSearch::empty()), StubRoutingService::failing()).await;
    app.place_repo
        .insert(&create_test_place("Gyeongbokgung", 37.5796, 126.9770))
        .await
        .unwrap();
    let (status, body) = send(
        &app.router,
        "POST",
        "/routes/plan",
        Some(json!({"start_keyword": "Atlantis", "visit_count": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Start location 'Atlantis' could not be found"
    );

    // Too many visits for the saved places
    let (status, _) = send(
        &app.router,
        "POST",
        "/routes/plan",
        Some(json!({"start_point": {"lat": 37.5663, "lng": 126.9779}, "visit_count": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Invalid request
    let (status, _) = send(
        &app.router,
        "POST",
        "/routes/plan",
        Some(json!({"start_point": {"lat": 37.5663, "lng": 126.9779}, "visit_count": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plan_endpoint_route_space_too_large() {
    let app = setup_test_app(city_hall_search(), StubRoutingService::failing()).await;
    for i in 0..10 {
        app.place_repo
            .insert(&create_test_place(
                &format!("Stop {}", i),
                37.57 + i as f64 * 0.001,
                126.98,
            ))
            .await
            .unwrap();
    }

    let (status, _) = send(
        &app.router,
        "POST",
        "/routes/plan",
        Some(json!({"start_keyword": "Seoul City Hall", "visit_count": 9})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.routing.call_count(), 0);
}
