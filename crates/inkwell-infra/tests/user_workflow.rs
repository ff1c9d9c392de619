mod common;

use common::{TestApp, register_request};
use inkwell_core::DomainError;
use inkwell_shared::dto::{LoginRequest, UpdateUserRequest};
use uuid::Uuid;

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new();
    let user = app.register("alice01").await;
    assert_eq!(user.email, "alice01@example.com");

    let auth = app
        .users
        .login(login("alice01@example.com", "hunter22"))
        .await
        .unwrap();
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, 72 * 3600);
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn register_rejects_short_username() {
    let app = TestApp::new();

    let result = app.users.register(register_request("abc")).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn register_rejects_taken_email() {
    let app = TestApp::new();
    app.register("alice01").await;

    let mut request = register_request("alice02");
    request.email = "alice01@example.com".to_string();

    let result = app.users.register(request).await;
    assert!(matches!(result, Err(DomainError::Storage(_))));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_fail_alike() {
    let app = TestApp::new();
    app.register("alice01").await;

    let wrong = app
        .users
        .login(login("alice01@example.com", "nope"))
        .await
        .unwrap_err();
    let unknown = app
        .users
        .login(login("ghost@example.com", "hunter22"))
        .await
        .unwrap_err();

    assert!(matches!(wrong, DomainError::Unauthorized));
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let app = TestApp::new();
    let user = app.register("alice01").await;
    let id = Uuid::parse_str(&user.id).unwrap();

    let updated = app
        .users
        .update(
            id,
            UpdateUserRequest {
                name: Some("Ada".to_string()),
                password: Some("new-secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.email, user.email);
    assert!(updated.updated_at >= user.updated_at);

    app.users
        .login(login("alice01@example.com", "new-secret"))
        .await
        .unwrap();
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let app = TestApp::new();

    let result = app
        .users
        .update(Uuid::new_v4(), UpdateUserRequest::default())
        .await;
    assert!(matches!(
        result,
        Err(DomainError::NotFound { entity_type: "user" })
    ));
}

#[tokio::test]
async fn delete_hides_user_from_login() {
    let app = TestApp::new();
    let user = app.register("alice01").await;

    app.users.delete(&user.id).await.unwrap();

    let result = app.users.login(login("alice01@example.com", "hunter22")).await;
    assert!(matches!(result, Err(DomainError::Unauthorized)));

    let again = app.users.delete(&user.id).await;
    assert!(matches!(again, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn delete_rejects_malformed_id() {
    let app = TestApp::new();

    for id in ["not-a-uuid", "00000000-0000-0000-0000-000000000000"] {
        let result = app.users.delete(id).await;
        assert!(matches!(result, Err(DomainError::Validation(_))), "{id}");
    }
}
