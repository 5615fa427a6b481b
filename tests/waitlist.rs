//! Waitlist integration tests.
//!
//! These tests verify signup, idempotent re-joining, validation, and the
//! early-spots counter. The testing config has the email provider disabled,
//! so no mail leaves the building.

mod common;

use common::TestApp;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn join_waitlist_returns_201_for_new_email() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();

    // Act
    let response = app.post_public("/api/waitlist", json!({ "email": email })).await;

    // Assert
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"].as_str().unwrap(), email);
    assert!(!body["already_joined"].as_bool().unwrap());
}

#[tokio::test]
#[serial]
async fn join_waitlist_is_idempotent() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();

    let response = app.post_public("/api/waitlist", json!({ "email": email })).await;
    assert_eq!(response.status().as_u16(), 201);

    // Act
    let response = app.post_public("/api/waitlist", json!({ "email": email })).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["already_joined"].as_bool().unwrap());
}

#[tokio::test]
#[serial]
async fn join_waitlist_normalizes_email_case() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = TestApp::unique_email();

    let response = app.post_public("/api/waitlist", json!({ "email": email })).await;
    assert_eq!(response.status().as_u16(), 201);

    // Act: same address, different case.
    let response = app
        .post_public("/api/waitlist", json!({ "email": email.to_uppercase() }))
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
#[serial]
async fn join_waitlist_returns_400_for_invalid_email() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app
        .post_public("/api/waitlist", json!({ "email": "not-an-email" }))
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"].as_str().unwrap(), "INVALID_EMAIL");
}

#[tokio::test]
#[serial]
async fn join_waitlist_returns_400_for_missing_email() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.post_public("/api/waitlist", json!({})).await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[serial]
async fn joining_decrements_the_early_spots_counter() {
    // Arrange
    let app = TestApp::spawn().await;

    let response = app.get_public("/api/waitlist/spots").await;
    assert_eq!(response.status().as_u16(), 200);
    let before: serde_json::Value = response.json().await.expect("Failed to parse response");
    let before = before["remaining"].as_i64().unwrap();

    // Act
    let response = app
        .post_public("/api/waitlist", json!({ "email": TestApp::unique_email() }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    // Assert
    let response = app.get_public("/api/waitlist/spots").await;
    let after: serde_json::Value = response.json().await.expect("Failed to parse response");
    let after = after["remaining"].as_i64().unwrap();

    if before > 0 {
        assert_eq!(after, before - 1);
    } else {
        // Counter is already exhausted and clamps at zero.
        assert_eq!(after, 0);
    }
}

#[tokio::test]
#[serial]
async fn landing_page_reports_early_spots() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app.get_public("/").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["early_spots_remaining"].as_i64().unwrap() >= 0);
}
