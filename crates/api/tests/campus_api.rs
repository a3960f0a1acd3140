//! HTTP-level integration tests for campus and user administration.

mod common;

use autoriza_core::roles::Role;
use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth, user_with_token,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Campuses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn campus_list_is_public_and_ordered(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_campus(&pool, "Norte").await;
    common::create_campus(&pool, "Centro").await;

    let response = get(app.router(), "/api/v1/campuses").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Centro", "Norte"]);

    let response = get(app.router(), "/api/v1/campuses?limit=1&offset=1").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["name"], "Norte");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_and_renames_campus(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, admin) = user_with_token(&app, "admin@example.com", Role::Admin, None).await;

    let response = post_json_auth(
        app.router(),
        "/api/v1/campuses",
        &admin,
        serde_json::json!({ "name": "  Campus Sul " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Campus Sul");
    let id = json["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.router(),
        &format!("/api/v1/campuses/{id}"),
        &admin,
        serde_json::json!({ "name": "Campus Leste" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Campus Leste");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_campus_name_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::create_campus(&pool, "Centro").await;
    let (_, admin) = user_with_token(&app, "admin@example.com", Role::Admin, None).await;

    let response = post_json_auth(
        app.router(),
        "/api/v1/campuses",
        &admin,
        serde_json::json!({ "name": "Centro" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn professor_cannot_manage_campuses(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, prof) = user_with_token(&app, "prof@example.com", Role::Professor, None).await;

    let response = post_json_auth(
        app.router(),
        "/api/v1/campuses",
        &prof,
        serde_json::json!({ "name": "Centro" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn referenced_campus_cannot_be_deleted(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let used = common::create_campus(&pool, "Centro").await;
    let unused = common::create_campus(&pool, "Norte").await;
    let (_, admin) = user_with_token(&app, "admin@example.com", Role::Admin, Some(used)).await;

    let response = delete_auth(app.router(), &format!("/api/v1/campuses/{used}"), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_auth(app.router(), &format!("/api/v1/campuses/{unused}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app.router(), &format!("/api/v1/campuses/{unused}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_active_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let campus = common::create_campus(&pool, "Centro").await;
    let (_, admin) = user_with_token(&app, "admin@example.com", Role::Admin, None).await;

    let response = post_json_auth(
        app.router(),
        "/api/v1/users",
        &admin,
        serde_json::json!({
            "name": "Secretaria Centro",
            "email": "secretaria@example.com",
            "password": "institution-pass",
            "role": "institution",
            "campus_id": campus,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "institution");
    assert_eq!(json["data"]["is_active"], true);

    let response = common::post_json(
        app.router(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "secretaria@example.com", "password": "institution-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.router(), "/api/v1/users", &admin).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn professor_cannot_list_users(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, prof) = user_with_token(&app, "prof@example.com", Role::Professor, None).await;

    let response = get_auth(app.router(), "/api/v1/users", &prof).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
