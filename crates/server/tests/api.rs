use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use db::DBService;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use server::{AppState, app};
use services::services::identity::{IdentityClaims, IdentityService};
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

async fn test_app() -> Router {
    let db = DBService::new_in_memory().await.unwrap();
    app(AppState::new(db, IdentityService::new(SECRET, None)))
}

fn bearer(sub: &str, email: &str) -> String {
    let claims = IdentityClaims {
        sub: sub.to_string(),
        email: Some(email.to_string()),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

async fn send(app: &Router, method: Method, uri: &str, auth: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_plant(app: &Router, auth: &str, name: &str, water_frequency: i64) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/plants",
        Some(auth),
        Some(json!({
            "name": name,
            "species": null,
            "image_url": null,
            "water_frequency": water_frequency,
            "light_needs": "bright-indirect",
            "care_notes": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/plants", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, Method::GET, "/api/reminders", Some("Bearer nonsense"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/auth/me", Some("Basic abc"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_provisions_user_from_token() {
    let app = test_app().await;
    let auth = bearer("provider-sub-1", "rosa@example.com");

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "rosa");
    assert_eq!(body["data"]["auth_id"], "provider-sub-1");
}

#[tokio::test]
async fn plant_lifecycle_with_watering() {
    let app = test_app().await;
    let auth = bearer("sub-ann", "ann@example.com");

    let plant = create_plant(&app, &auth, "Monstera", 7).await;
    let plant_id = plant["id"].as_str().unwrap().to_string();

    let (_, upcoming) = send(&app, Method::GET, "/api/reminders/upcoming", Some(&auth), None).await;
    assert_eq!(upcoming["data"].as_array().unwrap().len(), 1);
    assert_eq!(upcoming["data"][0]["reminder_type"], "watering");

    let (status, listed) = send(&app, Method::GET, "/api/plants", Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"][0]["watering_status"], "unknown");

    let (status, log) = send(
        &app,
        Method::POST,
        "/api/care-logs",
        Some(&auth),
        Some(json!({ "plant_id": plant_id, "activity_type": "watering", "notes": "deep soak" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(log["data"]["activity_type"], "watering");

    let (_, fetched) = send(&app, Method::GET, &format!("/api/plants/{plant_id}"), Some(&auth), None).await;
    assert_eq!(fetched["data"]["watering_status"], "ok");
    assert!(fetched["data"]["last_watered"].is_string());

    let (_, logs) = send(
        &app,
        Method::GET,
        &format!("/api/plants/{plant_id}/care-logs"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(logs["data"].as_array().unwrap().len(), 1);

    let (_, reminders) = send(&app, Method::GET, "/api/reminders", Some(&auth), None).await;
    assert_eq!(reminders["data"].as_array().unwrap().len(), 2);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/plants/{plant_id}"),
        Some(&auth),
        Some(json!({ "water_frequency": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["water_frequency"], 9);
    assert_eq!(updated["data"]["name"], "Monstera");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/plants/{plant_id}"), Some(&auth), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/plants/{plant_id}"), Some(&auth), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let app = test_app().await;
    let auth = bearer("sub-ann", "ann@example.com");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/plants",
        Some(&auth),
        Some(json!({
            "name": "Cactus",
            "species": null,
            "image_url": null,
            "water_frequency": 0,
            "light_needs": "full-sun",
            "care_notes": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Water frequency"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/plants",
        Some(&auth),
        Some(json!({
            "name": "Cactus",
            "species": null,
            "image_url": null,
            "water_frequency": 14,
            "light_needs": "sunny",
            "care_notes": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Bad request"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/care-logs",
        Some(&auth),
        Some(json!({ "activity_type": "watering" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, Method::GET, "/api/plants/not-a-uuid", Some(&auth), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/reminders/calendar?days=many",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn other_users_plants_are_forbidden() {
    let app = test_app().await;
    let ann = bearer("sub-ann", "ann@example.com");
    let bob = bearer("sub-bob", "bob@example.com");

    let plant = create_plant(&app, &ann, "Pothos", 10).await;
    let plant_id = plant["id"].as_str().unwrap();

    let (status, _) = send(&app, Method::GET, &format!("/api/plants/{plant_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/care-logs",
        Some(&bob),
        Some(json!({ "plant_id": plant_id, "activity_type": "misting", "notes": null })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, bobs_plants) = send(&app, Method::GET, "/api/plants", Some(&bob), None).await;
    assert!(bobs_plants["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn suggest_frequency_and_care_instructions() {
    let app = test_app().await;
    let auth = bearer("sub-ann", "ann@example.com");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/plants/suggest-frequency?name=Snake%20Plant",
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["water_frequency"], 21);

    let plant = create_plant(&app, &auth, "Snake Plant", 21).await;
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/plants/{}/care-instructions", plant["id"].as_str().unwrap()),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["instructions"].as_str().unwrap().contains("## Watering"));
}

#[tokio::test]
async fn reminders_complete_and_calendar() {
    let app = test_app().await;
    let auth = bearer("sub-ann", "ann@example.com");
    let plant = create_plant(&app, &auth, "Fern", 3).await;

    let due = Utc::now() + Duration::days(1);
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/reminders",
        Some(&auth),
        Some(json!({
            "plant_id": plant["id"],
            "reminder_type": "fertilizing",
            "due_date": due.to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reminder_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, done) = send(
        &app,
        Method::POST,
        &format!("/api/reminders/{reminder_id}/complete"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["data"]["completed"], true);

    let start = Utc::now().date_naive();
    let (status, calendar) = send(
        &app,
        Method::GET,
        &format!("/api/reminders/calendar?start={start}&days=5"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let days = calendar["data"].as_array().unwrap();
    assert_eq!(days.len(), 5);
    assert_eq!(days[1]["has_fertilizing"], true);
    assert_eq!(days[3]["has_watering"], true);
}

#[tokio::test]
async fn recommendations_generate_list_and_read() {
    let app = test_app().await;
    let auth = bearer("sub-ann", "ann@example.com");

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/ai-recommendations/generate",
        Some(&auth),
        Some(json!({
            "plant_id": null,
            "plant_name": "Orchid",
            "plant_species": null,
            "care_issue": "drooping flowers",
            "plant_description": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["title"], "Orchid: Drooping flowers");
    assert_eq!(created["data"]["tags"][0], "watering");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (_, listed) = send(&app, Method::GET, "/api/ai-recommendations", Some(&auth), None).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let other = bearer("sub-bob", "bob@example.com");
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/ai-recommendations/{id}/read"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, read) = send(
        &app,
        Method::POST,
        &format!("/api/ai-recommendations/{id}/read"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["data"]["read"], true);
}
