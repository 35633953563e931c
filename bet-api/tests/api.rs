use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bet_api::{build_router, config::Config, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let config = Config {
        admin_user_ids: vec!["admin".to_string()],
        ..Config::default()
    };
    build_router(Arc::new(AppState::new(config)))
}

/// Send a request and return (status, parsed JSON body).
async fn send(app: &Router, method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let raw = body.map(|b| b.to_string()).unwrap_or_default();
    send_raw(app, method, uri, user, raw).await
}

async fn send_raw(app: &Router, method: &str, uri: &str, user: Option<&str>, body: String) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let resp = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn single(date: &str, attributed_to: &str) -> Value {
    json!({
        "type": "single",
        "amount": 50,
        "date": date,
        "sport": "NFL",
        "teams": "Chiefs vs Bills",
        "betType": "spread",
        "selection": "Chiefs -3.5",
        "odds": -110,
        "attributedTo": attributed_to
    })
}

fn parlay() -> Value {
    json!({
        "type": "parlay",
        "amount": 25,
        "date": "2025-01-15",
        "attributedTo": "Alice",
        "legs": [
            {"id": "leg-alice", "sport": "NBA", "teams": "Lakers vs Celtics",
             "selection": "Lakers -4.5", "odds": -110, "attributedTo": "Alice"},
            {"id": "leg-bob", "sport": "MLB", "teams": "Yankees vs Red Sox",
             "selection": "Yankees ML", "odds": -120, "attributedTo": "Bob"}
        ]
    })
}

async fn grant(app: &Router, user: &str, flags: Value, aliases: Value) {
    let (status, _) = send(
        app,
        "PUT",
        "/users/profile",
        Some("admin"),
        Some(json!({"userId": user, "featureFlags": flags, "aliases": aliases})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_open() {
    let resp = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_without_caller_are_unauthorized() {
    let (status, body) = send(&app(), "GET", "/bets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn owners_and_aliases_see_created_bets() {
    let app = app();
    let (status, body) = send(&app, "POST", "/bets", Some("alice"), Some(single("2025-01-15", "Alice"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["potentialPayout"], 95.45);
    assert_eq!(body["data"]["userId"], "alice");

    // The owner sees it without any alias
    let (_, body) = send(&app, "GET", "/bets", Some("alice"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Another default user needs the alias before the bet shows up
    let (_, body) = send(&app, "GET", "/bets", Some("bob"), None).await;
    assert_eq!(body["data"], json!([]));

    grant(&app, "bob", json!({}), json!(["Alice"])).await;
    let (_, body) = send(&app, "GET", "/bets", Some("bob"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/bets", Some("admin"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_reports_body_problems() {
    let app = app();
    let (status, body) = send_raw(&app, "POST", "/bets", Some("alice"), "{oops".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_JSON");
    assert_eq!(body["error"]["message"], "Invalid JSON in request body");

    let mut bet = single("2025-01-15", "Alice");
    bet["odds"] = json!(0);
    let (status, body) = send(&app, "POST", "/bets", Some("alice"), Some(bet)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Odds cannot be zero");
}

#[tokio::test]
async fn leg_edits_follow_leg_attribution() {
    let app = app();
    let (_, body) = send(&app, "POST", "/bets", Some("admin"), Some(parlay())).await;
    let bet_id = body["data"]["betId"].as_str().unwrap().to_string();
    let uri = format!("/bets/{}", bet_id);

    grant(&app, "alice", json!({"canEditBetsOwn": true}), json!(["Alice"])).await;

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some("alice"),
        Some(json!({"legs": [{"id": "leg-bob", "selection": "Red Sox ML"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some("alice"),
        Some(json!({"legs": [
            {"id": "leg-bob", "selection": "Yankees ML"},
            {"id": "leg-alice", "odds": 100}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["legs"][0]["odds"], 100.0);
    // 25 * 2.0 * 1.8333
    assert_eq!(body["data"]["potentialPayout"], 91.67);

    let (status, _) = send(&app, "PUT", &uri, Some("alice"), Some(json!({"status": "won"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", "/bets/missing", Some("admin"), Some(json!({"amount": 5}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_hides_bets_the_caller_cannot_reach() {
    let app = app();
    let (_, body) = send(&app, "POST", "/bets", Some("admin"), Some(single("2025-01-15", "Secret"))).await;
    let bet_id = body["data"]["betId"].as_str().unwrap().to_string();
    let updated_at = body["data"]["updatedAt"].clone();
    let uri = format!("/bets/{}", bet_id);

    let (_, body) = send(&app, "GET", "/bets", Some("mallory"), None).await;
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(&app, "PUT", &uri, Some("mallory"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Bet not found");
    assert!(body.get("data").is_none());

    // An empty update from someone who can reach the bet changes nothing
    let (status, body) = send(&app, "PUT", &uri, Some("admin"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updatedAt"], updated_at);

    // Own-scope edit rights reach the bet even without a view flag
    grant(&app, "sam", json!({"canViewBetsOwn": false, "canEditBetsOwn": true}), json!(["Secret"])).await;
    let (status, body) = send(&app, "PUT", &uri, Some("sam"), Some(json!({"amount": 60}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 60.0);
}

#[tokio::test]
async fn delete_requires_flag() {
    let app = app();
    let (_, body) = send(&app, "POST", "/bets", Some("alice"), Some(single("2025-01-15", "Alice"))).await;
    let uri = format!("/bets/{}", body["data"]["betId"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Delete rights alone do not reach bets the caller neither owns nor sees
    grant(&app, "dave", json!({"canDeleteBets": true}), json!([])).await;
    let (status, body) = send(&app, "DELETE", &uri, Some("dave"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    let (_, body) = send(&app, "GET", "/bets", Some("admin"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, _) = send(&app, "DELETE", &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_week_removes_only_current_week_bets_of_caller() {
    let app = app();
    let today = chrono::Utc::now().date_naive().to_string();
    send(&app, "POST", "/bets", Some("admin"), Some(single(&today, "Alice"))).await;
    send(&app, "POST", "/bets", Some("admin"), Some(single("2020-01-15", "Alice"))).await;

    let (status, body) = send(&app, "DELETE", "/bets/week/clear", Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedCount"], 1);

    let (_, body) = send(&app, "GET", "/bets", Some("admin"), None).await;
    assert_eq!(body["data"][0]["date"], "2020-01-15");

    let (status, _) = send(&app, "DELETE", "/bets/week/clear", Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_applies_filters() {
    let app = app();
    send(&app, "POST", "/bets", Some("admin"), Some(single("2025-01-10", "Alice"))).await;
    send(&app, "POST", "/bets", Some("admin"), Some(parlay())).await;

    let (_, body) = send(&app, "GET", "/bets?type=parlay", Some("admin"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/bets?startDate=2025-01-12&endDate=2025-01-31", Some("admin"), None).await;
    assert_eq!(body["data"][0]["type"], "parlay");

    let (status, body) = send(&app, "GET", "/bets?status=void", Some("admin"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn betslip_import_returns_drafts_and_warnings() {
    let app = app();
    let model_output = json!({
        "bets": [
            single("2025-01-15", "Alice"),
            {"type": "single", "amount": 10, "date": "2025-01-15"}
        ]
    })
    .to_string();

    let (status, _) = send(&app, "POST", "/betslip/process", Some("alice"), Some(json!({"modelOutput": model_output}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "POST", "/betslip/process", Some("admin"), Some(json!({"modelOutput": model_output}))).await;
    assert_eq!(status, StatusCode::OK);
    let bets = body["data"]["bets"].as_array().unwrap();
    assert_eq!(bets.len(), 2);
    assert_eq!(bets[0]["potentialPayout"], 95.45);
    assert!(bets[0].get("_validationError").is_none());
    assert_eq!(bets[1]["_validationError"], "Missing required field: sport");
    assert_eq!(body["data"]["warnings"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "POST", "/betslip/process", Some("admin"), Some(json!({"modelOutput": "not json"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "PARSER_ERROR");
    assert_eq!(body["error"]["message"], "Could not confidently parse this bet slip");
}

#[tokio::test]
async fn profile_updates_are_admin_only() {
    let app = app();
    let (status, body) = send(&app, "GET", "/users/profile", Some("carol"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["featureFlags"]["canCreateBets"], true);
    assert_eq!(body["data"]["featureFlags"]["canEditBets"], false);

    let (status, _) = send(&app, "PUT", "/users/profile", Some("carol"), Some(json!({"aliases": ["Carol"]}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        "/users/profile",
        Some("admin"),
        Some(json!({"userId": "carol", "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["featureFlags"]["canEditBets"], true);

    let (status, body) = send(&app, "PUT", "/users/profile", Some("admin"), Some(json!({"aliases": [""]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "All aliases must be non-empty strings");
}
