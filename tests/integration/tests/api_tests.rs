//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Toggle Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_destroy() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = seed_user(&server.pool, 1, false).await.unwrap();
    let actor = seed_user(&server.pool, 1, false).await.unwrap();
    let post = seed_post(&server.pool, owner).await.unwrap();
    let token = server.token_for(actor).unwrap();
    let path = format!("/api/v1/actionable/{post}");

    let response = server.post_auth(&path, &token).await.unwrap();
    let created: ToggleResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(created.success);
    assert!(created.acted);
    assert_eq!(created.actionable_count, 1);
    assert!(created.can_undo_actionable);
    assert_eq!(quota_today(&server.pool, actor).await.unwrap(), 1);

    let response = server.delete_auth(&path, &token).await.unwrap();
    let destroyed: ToggleResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!destroyed.acted);
    assert_eq!(destroyed.actionable_count, 0);
    assert_eq!(quota_today(&server.pool, actor).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_twice_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = seed_user(&server.pool, 1, false).await.unwrap();
    let actor = seed_user(&server.pool, 1, false).await.unwrap();
    let post = seed_post(&server.pool, owner).await.unwrap();
    let token = server.token_for(actor).unwrap();
    let path = format!("/api/v1/actionable/{post}");

    server.post_auth(&path, &token).await.unwrap();
    let response = server.post_auth(&path, &token).await.unwrap();
    let failure: ToggleFailure = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert!(!failure.success);
    assert_eq!(failure.errors, vec!["already active".to_string()]);
    assert_eq!(quota_today(&server.pool, actor).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_on_one_post() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = seed_user(&server.pool, 1, false).await.unwrap();
    let actor = seed_user(&server.pool, 1, false).await.unwrap();
    let post = seed_post(&server.pool, owner).await.unwrap();
    let token = server.token_for(actor).unwrap();
    let path = format!("/api/v1/actionable/{post}");

    let requests = (0..8).map(|_| server.post_auth(&path, &token));
    let mut successes = 0;
    for response in join_all(requests).await {
        if response.unwrap().status() == StatusCode::OK {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(quota_today(&server.pool, actor).await.unwrap(), 1);
}

#[tokio::test]
async fn test_anonymous_create_is_forbidden() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = seed_user(&server.pool, 1, false).await.unwrap();
    let post = seed_post(&server.pool, owner).await.unwrap();

    let response = server
        .post(&format!("/api/v1/actionable/{post}"))
        .await
        .unwrap();
    let failure: ToggleFailure = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(failure.errors, vec!["not authenticated".to_string()]);
}

// ============================================================================
// Read Tests
// ============================================================================

#[tokio::test]
async fn test_state_and_summary() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = seed_user(&server.pool, 1, false).await.unwrap();
    let actor = seed_user(&server.pool, 1, false).await.unwrap();
    let post = seed_post(&server.pool, owner).await.unwrap();
    let token = server.token_for(actor).unwrap();

    server
        .post_auth(&format!("/api/v1/actionable/{post}"), &token)
        .await
        .unwrap();

    let response = server
        .get_auth(&format!("/api/v1/actionable/{post}"), &token)
        .await
        .unwrap();
    let state: StateResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(state.actionable_count, 1);
    assert!(state.actioned);
    assert!(state.can_undo_actionable);

    let response = server
        .get(&format!("/api/v1/actionable/users/{owner}/summary"))
        .await
        .unwrap();
    let summary: SummaryResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary.user_id, owner.into_inner());
    assert_eq!(summary.actionable_received, 1);
}
