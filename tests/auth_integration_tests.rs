mod common;

use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use common::{InMemoryRepo, TEST_USER_ID, build_state, create_token, seeded_store, test_user};
use devsage::{auth::AuthUser, config::Env};
use uuid::Uuid;

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}

fn with_user_id(parts: &mut Parts, id: Uuid) {
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&id.to_string()).unwrap(),
    );
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let app_state = build_state(
        Env::Production,
        InMemoryRepo::with_user(test_user()),
        seeded_store(),
    );

    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());
    with_bearer(&mut parts, &create_token(TEST_USER_ID, 3600));

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.id, TEST_USER_ID);
    assert_eq!(user.role, "member");
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = build_state(Env::Production, InMemoryRepo::default(), seeded_store());

    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    let app_state = build_state(
        Env::Production,
        InMemoryRepo::with_user(test_user()),
        seeded_store(),
    );

    // Well past the default 60s leeway.
    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());
    with_bearer(&mut parts, &create_token(TEST_USER_ID, -3600));

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_wrong_secret() {
    let mut app_state = build_state(
        Env::Production,
        InMemoryRepo::with_user(test_user()),
        seeded_store(),
    );
    app_state.config.jwt_secret = "a-different-secret".to_string();

    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());
    with_bearer(&mut parts, &create_token(TEST_USER_ID, 3600));

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_when_profile_deleted() {
    let app_state = build_state(Env::Production, InMemoryRepo::default(), seeded_store());

    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());
    with_bearer(&mut parts, &create_token(TEST_USER_ID, 3600));

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_success() {
    let app_state = build_state(
        Env::Local,
        InMemoryRepo::with_user(test_user()),
        seeded_store(),
    );

    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());
    with_user_id(&mut parts, TEST_USER_ID);

    let user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(user.id, TEST_USER_ID);
}

#[tokio::test]
async fn test_local_bypass_unknown_user_rejected() {
    let app_state = build_state(
        Env::Local,
        InMemoryRepo::with_user(test_user()),
        seeded_store(),
    );

    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());
    with_user_id(&mut parts, Uuid::new_v4());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let app_state = build_state(
        Env::Production,
        InMemoryRepo::with_user(test_user()),
        seeded_store(),
    );

    // Only the bypass header, no token.
    let mut parts = get_request_parts(Method::GET, "/profile".parse().unwrap());
    with_user_id(&mut parts, TEST_USER_ID);

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;
    assert_eq!(auth_user.unwrap_err(), StatusCode::UNAUTHORIZED);
}
