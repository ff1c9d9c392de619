//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;

use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            // Authenticated user routes
            .service(
                web::scope("/users")
                    .route("", web::patch().to(users::update))
                    .route("/{user_id}", web::delete().to(users::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{username}", web::get().to(posts::list_by_user)),
            )
            .route("/post/{slug}", web::get().to(posts::get_by_slug)),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use inkwell_core::ports::TokenService;
    use inkwell_infra::{Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService};
    use serde_json::{Value, json};

    use super::configure_routes;
    use crate::state::{AppState, Storage};

    fn state() -> AppState {
        AppState::build(
            Arc::new(InMemoryDatabase::new()),
            Storage::InMemory,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(JwtConfig::default())),
        )
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn register_body(username: &str) -> Value {
        json!({
            "name": "Test User",
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "hunter22",
        })
    }

    #[actix_web::test]
    async fn test_health_reports_in_memory_storage() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["storage"], "in-memory");
    }

    #[actix_web::test]
    async fn test_register_login_create_and_read_post() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body("alice01"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["username"], "alice01");
        assert!(body["data"].get("password").is_none());

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "alice01@example.com", "password": "hunter22"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["token_type"], "Bearer");
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "title": "Hello World!",
                "content": "First post",
                "tags": [{"name": "Rust"}, {"name": "Web"}],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["slug"], "hello-world");
        assert_eq!(body["data"]["tags"][0]["slug"], "rust");

        let req = test::TestRequest::get()
            .uri("/api/post/hello-world")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["user"]["username"], "alice01");

        let req = test::TestRequest::get()
            .uri("/api/posts?tags=web,go&page=1&size=5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["paging"]["total_item"], 1);
        assert_eq!(body["paging"]["size"], 5);

        let req = test::TestRequest::get()
            .uri("/api/posts/someone-else")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["paging"]["total_item"], 0);
    }

    #[actix_web::test]
    async fn test_create_post_requires_token() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": "Nope", "content": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", "Bearer garbage"))
            .set_json(json!({"title": "Nope", "content": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_login_failure_does_not_reveal_account() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body("alice01"))
            .to_request();
        test::call_service(&app, req).await;

        let mut bodies = Vec::new();
        for email in ["alice01@example.com", "ghost@example.com"] {
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": email, "password": "wrong-pass"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            bodies.push(test::read_body(resp).await);
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[actix_web::test]
    async fn test_validation_and_not_found_status() {
        let state = state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body("abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/posts?page=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/post/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Not Found");
    }

    #[actix_web::test]
    async fn test_delete_is_limited_to_self_or_admin() {
        let state = state();
        let app = app!(state);

        let mut ids = Vec::new();
        for username in ["alice01", "bobby01"] {
            let req = test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(register_body(username))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            ids.push(body["data"]["id"].as_str().unwrap().to_string());
        }

        let alice = uuid::Uuid::parse_str(&ids[0]).unwrap();
        let user_token = state
            .tokens
            .generate_token(alice, "alice01@example.com", vec!["user".to_string()])
            .unwrap();
        let admin_token = state
            .tokens
            .generate_token(uuid::Uuid::new_v4(), "root@example.com", vec!["admin".to_string()])
            .unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", ids[1]))
            .insert_header(("Authorization", format!("Bearer {user_token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", ids[1]))
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::patch()
            .uri("/api/users")
            .insert_header(("Authorization", format!("Bearer {user_token}")))
            .set_json(json!({"name": "Alice"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "Alice");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", ids[0]))
            .insert_header(("Authorization", format!("Bearer {user_token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
