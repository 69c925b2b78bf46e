//! HTTP-level integration tests for the activity history endpoints.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{body_json, delete_auth, get_auth, post_json_auth};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Recording an event stamps the caller's IP and user agent server-side.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_record_stamps_ip_and_user_agent(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "kind": "article_read",
        "location": "Lisbon, PT",
        "platform": "web"
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/activity")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::USER_AGENT, "gazette-test/1.0")
        .header("x-forwarded-for", "9.9.9.9")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "article_read");
    assert_eq!(json["data"]["ip"], "9.9.9.9");
    assert_eq!(json["data"]["user_agent"], "gazette-test/1.0");
    assert_eq!(json["data"]["location"], "Lisbon, PT");
    assert_eq!(json["data"]["user_id"], user_id.to_string());
    assert!(json["data"]["id"].is_number());
}

/// Overlong context fields are rejected with a validation error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_record_rejects_overlong_field(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "kind": "search",
        "location": "x".repeat(101),
    });
    let response = post_json_auth(app, "/api/v1/activity", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// An unknown event kind fails deserialization.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_record_rejects_unknown_kind(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "kind": "teleport" });
    let response = post_json_auth(app, "/api/v1/activity", body, &token).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Recording requires authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_record_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "kind": "search" });
    let response = common::post_json(app, "/api/v1/activity", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// History comes back newest first with a total count for pagination.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_newest_first_with_total(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);
    let t = Utc::now();

    for (kind, mins) in [("login", 30), ("search", 20), ("article_read", 10)] {
        common::insert_event(&pool, user_id, kind, Some("1.1.1.1"), None, t - Duration::minutes(mins))
            .await;
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/activity?limit=2", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["kind"], "article_read");
    assert_eq!(items[1]["kind"], "search");
    assert_eq!(json["data"]["total"], 3);
}

/// Offset pagination skips from the newest end.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_pagination_offset(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);
    let t = Utc::now();

    for (kind, mins) in [("login", 30), ("search", 20), ("article_read", 10)] {
        common::insert_event(&pool, user_id, kind, Some("1.1.1.1"), None, t - Duration::minutes(mins))
            .await;
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/activity?limit=2&offset=2", &token).await;

    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "login");
}

/// Listing is scoped to the caller.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_scoped_to_user(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let other = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);

    common::insert_event(&pool, other, "search", None, None, Utc::now()).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/activity", &token).await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["total"], 0);
}

// ---------------------------------------------------------------------------
// Clearing
// ---------------------------------------------------------------------------

/// Clearing erases history and re-closes sessions that were open, so the
/// sessions view cannot resurrect them.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_clear_erases_history_and_closes_sessions(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);
    let t = Utc::now();

    common::insert_event(
        &pool,
        user_id,
        "login",
        Some("1.1.1.1"),
        Some("desktop"),
        t - Duration::minutes(10),
    )
    .await;
    common::insert_event(&pool, user_id, "article_read", Some("1.1.1.1"), None, t).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/activity", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["removed"], 2);

    // What remains is exactly the synthetic logout for the open session.
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_events WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 1);
    let logout_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM activity_events WHERE user_id = $1 AND kind = 'logout'",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(logout_count, 1);

    // The sessions view is empty after the wipe.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/sessions", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

/// Clearing history never revokes the caller's token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_clear_keeps_caller_authenticated(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);

    common::insert_event(&pool, user_id, "search", None, None, Utc::now()).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/activity", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Clearing an empty history is a no-op that reports zero removals.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_clear_empty_history(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = common::mint_token(user_id, 0);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, "/api/v1/activity", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["removed"], 0);
}
