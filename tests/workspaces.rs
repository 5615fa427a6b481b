//! Workspace API integration tests.
//!
//! These tests verify workspace creation, the owner-membership invariant,
//! uniqueness conflicts, and the member-scoped listing.

mod common;

use common::TestApp;
use diesel::prelude::*;
use serde_json::json;
use serial_test::serial;
use uuid::Uuid;

use anteroom::schema::workspace_members;

#[tokio::test]
#[serial]
async fn create_workspace_returns_201_for_valid_data() {
    // Arrange
    let app = TestApp::spawn().await;
    let user = app.seed_user(Some("Workspace Creator"));
    let slug = TestApp::unique_slug();

    // Act
    let response = app.create_workspace(&user, "Acme Inc", &slug).await;

    // Assert
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"].as_str().unwrap(), "Acme Inc");
    assert_eq!(body["slug"].as_str().unwrap(), slug);
}

#[tokio::test]
#[serial]
async fn create_workspace_creates_exactly_one_owner_membership() {
    // Arrange
    let app = TestApp::spawn().await;
    let user = app.seed_user(Some("Owner Invariant"));
    let slug = TestApp::unique_slug();

    // Act
    let response = app.create_workspace(&user, "Owned Workspace", &slug).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let workspace_id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();

    // Assert: one member row, role OWNER, for the creator.
    let mut conn = app.db_pool.get().expect("Failed to get connection");
    let members: Vec<(Uuid, String)> = workspace_members::table
        .filter(workspace_members::workspace_id.eq(workspace_id))
        .select((workspace_members::user_id, workspace_members::role))
        .load(&mut conn)
        .expect("Failed to load members");

    assert_eq!(members.len(), 1);
    assert_eq!(members[0].0, user.id);
    assert_eq!(members[0].1, "OWNER");
}

#[tokio::test]
#[serial]
async fn create_workspace_returns_400_for_missing_fields() {
    // Arrange
    let app = TestApp::spawn().await;
    let user = app.seed_user(None);

    // Act
    let response = app
        .post(
            "/api/workspaces",
            &user.session_token,
            json!({ "name": "No Slug Here" }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"].as_str().unwrap(), "MISSING_FIELDS");
}

#[tokio::test]
#[serial]
async fn create_workspace_returns_400_for_blank_fields() {
    // Arrange
    let app = TestApp::spawn().await;
    let user = app.seed_user(None);

    // Act
    let response = app
        .post(
            "/api/workspaces",
            &user.session_token,
            json!({ "name": "   ", "slug": "" }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
#[serial]
async fn create_workspace_returns_401_without_session() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let response = app
        .post_public(
            "/api/workspaces",
            json!({ "name": "Acme", "slug": TestApp::unique_slug() }),
        )
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
#[serial]
async fn create_workspace_returns_409_for_taken_slug() {
    // Arrange
    let app = TestApp::spawn().await;
    let first = app.seed_user(Some("First"));
    let second = app.seed_user(Some("Second"));
    let slug = TestApp::unique_slug();

    let response = app.create_workspace(&first, "First Workspace", &slug).await;
    assert_eq!(response.status().as_u16(), 201);

    // Act
    let response = app
        .create_workspace(&second, "Second Workspace", &slug)
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 409);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"].as_str().unwrap(), "SLUG_TAKEN");
}

#[tokio::test]
#[serial]
async fn list_workspaces_returns_role_and_counts() {
    // Arrange
    let app = TestApp::spawn().await;
    let user = app.seed_user(Some("Lister"));
    let slug = TestApp::unique_slug();

    let response = app.create_workspace(&user, "Counted Workspace", &slug).await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app
        .create_project(&user, &slug, "Site", &TestApp::unique_domain())
        .await;
    assert_eq!(response.status().as_u16(), 201);

    // Act
    let response = app.get("/api/workspaces", &user.session_token).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let workspaces = body.as_array().unwrap();
    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0]["slug"].as_str().unwrap(), slug);
    assert_eq!(workspaces[0]["role"].as_str().unwrap(), "OWNER");
    assert_eq!(workspaces[0]["project_count"].as_i64().unwrap(), 1);
    assert_eq!(workspaces[0]["member_count"].as_i64().unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn list_workspaces_only_shows_memberships() {
    // Arrange
    let app = TestApp::spawn().await;
    let owner = app.seed_user(Some("Owner"));
    let outsider = app.seed_user(Some("Outsider"));
    let slug = TestApp::unique_slug();

    let response = app.create_workspace(&owner, "Private Workspace", &slug).await;
    assert_eq!(response.status().as_u16(), 201);

    // Act
    let response = app.get("/api/workspaces", &outsider.session_token).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body.as_array().unwrap().is_empty());
}
