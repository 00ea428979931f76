use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use scribe_core::domain::NewUser;
use scribe_core::ports::{PasswordService, TokenService};
use scribe_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use super::{configure_routes, not_found};
use crate::middleware::negotiation::FormatNegotiation;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

struct Fixture {
    state: AppState,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl Fixture {
    fn new() -> Self {
        let config = JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        };
        Self {
            state: AppState::in_memory(),
            tokens: Arc::new(JwtTokenService::new(config)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    /// Create an account directly in the store and return its bearer header.
    async fn user(&self, username: &str) -> String {
        let user = self
            .state
            .repos
            .users
            .insert(NewUser::new(
                username.to_string(),
                format!("{username}@example.com"),
                "unused".to_string(),
            ))
            .await
            .unwrap();
        let token = self.tokens.generate_token(user.id, &user.username).unwrap();
        format!("Bearer {token}")
    }
}

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .wrap(FormatNegotiation)
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($fixture.state.clone()))
                .app_data(web::Data::new($fixture.tokens.clone()))
                .app_data(web::Data::new($fixture.passwords.clone()))
                .configure(configure_routes)
                .default_service(web::to(not_found)),
        )
        .await
    };
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri)
}

fn authed(req: test::TestRequest, auth: &str) -> test::TestRequest {
    req.insert_header(("Authorization", auth.to_string()))
}

#[actix_rt::test]
async fn test_create_stamps_owner_and_non_owner_is_forbidden() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "Hello", "body": "World"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Hello");
    assert_eq!(body["body"], "World");
    assert_eq!(body["owner"], "alice");
    assert!(body["created"].is_string());

    let req = authed(test::TestRequest::put().uri("/posts/1/"), &bob)
        .set_json(json!({"title": "Mine now", "body": ""}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Still readable by the non-owner, and unchanged
    let res = test::call_service(&app, authed(get("/posts/1/"), &bob).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["title"], "Hello");
}

#[actix_rt::test]
async fn test_owner_in_payload_is_ignored() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "t", "owner": "bob"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["owner"], "alice");

    let req = authed(test::TestRequest::post().uri("/comments/"), &alice)
        .set_json(json!({"body": "first", "post": 1, "owner": 2}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["owner"], "alice");
    assert_eq!(body["post"], 1);
}

#[actix_rt::test]
async fn test_anonymous_can_read_but_not_write() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "t"}))
        .to_request();
    test::call_service(&app, req).await;

    for uri in [
        "/posts/",
        "/posts/1/",
        "/comments/",
        "/categories/",
        "/users-list/",
        "/users-detail/1/",
    ] {
        let res = test::call_service(&app, get(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "GET {uri}");
    }

    let writes = [
        test::TestRequest::post().uri("/posts/"),
        test::TestRequest::put().uri("/posts/1/"),
        test::TestRequest::patch().uri("/posts/1/"),
        test::TestRequest::delete().uri("/posts/1/"),
        test::TestRequest::post().uri("/comments/"),
        test::TestRequest::post().uri("/categories/"),
        test::TestRequest::delete().uri("/categories/1/"),
    ];
    for req in writes {
        let res = test::call_service(&app, req.set_json(json!({})).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    let res = test::call_service(&app, get("/posts/1/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_owner_can_update_and_delete() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "Draft", "body": "text"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = authed(test::TestRequest::put().uri("/posts/1/"), &alice)
        .set_json(json!({"title": "Final", "body": "edited"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Final");

    // PATCH leaves omitted fields alone
    let req = authed(test::TestRequest::patch().uri("/posts/1/"), &alice)
        .set_json(json!({"body": "patched"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Final");
    assert_eq!(body["body"], "patched");

    let body: Value = test::call_and_read_body_json(&app, get("/posts/1/").to_request()).await;
    assert_eq!(body["body"], "patched");

    let req = authed(test::TestRequest::delete().uri("/posts/1/"), &alice).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(&app, get("/posts/1/").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_non_owner_delete_is_forbidden() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/categories/"), &alice)
        .set_json(json!({"name": "rust"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = authed(test::TestRequest::delete().uri("/categories/1/"), &bob).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = test::call_service(&app, get("/categories/1/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_missing_resource_is_not_found_before_ownership() {
    let fx = Fixture::new();
    let bob = fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::put().uri("/posts/99/"), &bob)
        .set_json(json!({"title": "x"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(&app, get("/comments/abc/").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(&app, get("/nowhere/").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_lists_are_oldest_first() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let app = init_app!(fx);

    for title in ["one", "two", "three"] {
        let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
            .set_json(json!({"title": title}))
            .to_request();
        test::call_service(&app, req).await;
    }

    let body: Value = test::call_and_read_body_json(&app, get("/posts/").to_request()).await;
    let posts = body.as_array().unwrap();
    let titles: Vec<&str> = posts.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);

    let created: Vec<&str> = posts.iter().map(|p| p["created"].as_str().unwrap()).collect();
    let stamps: Vec<chrono::DateTime<chrono::Utc>> =
        created.iter().map(|c| c.parse().unwrap()).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[actix_rt::test]
async fn test_validation_failures() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let app = init_app!(fx);

    // Empty post is fine, both fields default to empty
    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["title"], "");
    assert_eq!(body["body"], "");

    let req = authed(test::TestRequest::post().uri("/comments/"), &alice)
        .set_json(json!({"body": "", "post": 1}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["body"].is_array());

    let req = authed(test::TestRequest::post().uri("/comments/"), &alice)
        .set_json(json!({"body": "hi", "post": 42}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["post"].is_array());

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "x".repeat(101)}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = authed(test::TestRequest::post().uri("/categories/"), &alice)
        .set_json(json!({"posts": [1]}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["name"].is_array());

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Explicit null is not the same as omitting the field
    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": null}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = authed(test::TestRequest::patch().uri("/posts/1/"), &alice)
        .set_json(json!({"body": null}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::call_and_read_body_json(&app, get("/posts/1/").to_request()).await;
    assert_eq!(body["body"], "");
}

#[actix_rt::test]
async fn test_comment_updates_check_ownership_before_payload() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "t"}))
        .to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/comments/"), &alice)
        .set_json(json!({"body": "first", "post": 1}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let writes = [
        test::TestRequest::put()
            .uri("/comments/1/")
            .set_json(json!({"body": "mine", "post": 1})),
        test::TestRequest::patch()
            .uri("/comments/1/")
            .set_json(json!({"body": "mine"})),
        // Invalid payload from a non-owner is still a 403
        test::TestRequest::patch()
            .uri("/comments/1/")
            .set_json(json!({"body": ""})),
        test::TestRequest::put()
            .uri("/comments/1/")
            .set_json(json!({"body": "no post"})),
    ];
    for req in writes {
        let res = test::call_service(&app, authed(req, &bob).to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    let req = authed(test::TestRequest::patch().uri("/comments/1/"), &alice)
        .set_json(json!({"body": ""}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["body"].is_array());

    let req = authed(test::TestRequest::put().uri("/comments/1/"), &alice)
        .set_json(json!({"body": "edited"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["post"].is_array());

    let body: Value = test::call_and_read_body_json(&app, get("/comments/1/").to_request()).await;
    assert_eq!(body["body"], "first");
    assert_eq!(body["owner"], "alice");
}

#[actix_rt::test]
async fn test_category_replace_requires_name() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/categories/"), &alice)
        .set_json(json!({"name": "rust"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = authed(test::TestRequest::put().uri("/categories/1/"), &bob)
        .set_json(json!({"posts": []}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let req = authed(test::TestRequest::put().uri("/categories/1/"), &alice)
        .set_json(json!({"posts": []}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["name"].is_array());

    // PATCH may omit it
    let req = authed(test::TestRequest::patch().uri("/categories/1/"), &alice)
        .set_json(json!({"posts": []}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "rust");
}

#[actix_rt::test]
async fn test_deleting_post_cascades() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let app = init_app!(fx);

    for title in ["kept", "doomed"] {
        let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
            .set_json(json!({"title": title}))
            .to_request();
        test::call_service(&app, req).await;
    }
    let req = authed(test::TestRequest::post().uri("/comments/"), &bob)
        .set_json(json!({"body": "nice", "post": 2}))
        .to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/categories/"), &bob)
        .set_json(json!({"name": "mixed", "posts": [2, 1]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"], json!([1, 2]));

    let req = authed(test::TestRequest::delete().uri("/posts/2/"), &alice).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let body: Value = test::call_and_read_body_json(&app, get("/comments/").to_request()).await;
    assert_eq!(body, json!([]));
    let body: Value =
        test::call_and_read_body_json(&app, get("/categories/1/").to_request()).await;
    assert_eq!(body["posts"], json!([1]));
}

#[actix_rt::test]
async fn test_deleting_account_cascades() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "alice's"}))
        .to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/posts/"), &bob)
        .set_json(json!({"title": "bob's"}))
        .to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/comments/"), &bob)
        .set_json(json!({"body": "on alice's post", "post": 1}))
        .to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/categories/"), &alice)
        .set_json(json!({"name": "alice's", "posts": [1, 2]}))
        .to_request();
    test::call_service(&app, req).await;

    let req = authed(test::TestRequest::delete().uri("/api/v1/auth/me"), &alice).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let posts: Value = test::call_and_read_body_json(&app, get("/posts/").to_request()).await;
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["owner"], "bob");
    let comments: Value =
        test::call_and_read_body_json(&app, get("/comments/").to_request()).await;
    assert_eq!(comments, json!([]));
    let categories: Value =
        test::call_and_read_body_json(&app, get("/categories/").to_request()).await;
    assert_eq!(categories, json!([]));

    // The old token no longer resolves to an account
    let res = test::call_service(&app, authed(get("/posts/"), &alice).to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_invalid_token_is_rejected_on_reads() {
    let fx = Fixture::new();
    let app = init_app!(fx);

    let req = authed(get("/posts/"), "Bearer not-a-token").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = authed(get("/posts/"), "Basic YWxpY2U6cHc=").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_user_projection_lists_owned_ids() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    fx.user("bob").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "t"}))
        .to_request();
    test::call_service(&app, req).await;
    let req = authed(test::TestRequest::post().uri("/comments/"), &alice)
        .set_json(json!({"body": "c", "post": 1}))
        .to_request();
    test::call_service(&app, req).await;

    let body: Value = test::call_and_read_body_json(&app, get("/users-list/").to_request()).await;
    assert_eq!(
        body,
        json!([
            {"id": 1, "username": "alice", "posts": [1], "comments": [1], "categories": []},
            {"id": 2, "username": "bob", "posts": [], "comments": [], "categories": []},
        ])
    );

    let res = test::call_service(&app, get("/users-detail/3/").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_format_negotiation() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let app = init_app!(fx);

    let req = authed(test::TestRequest::post().uri("/posts/"), &alice)
        .set_json(json!({"title": "t"}))
        .to_request();
    test::call_service(&app, req).await;

    let res = test::call_service(&app, get("/posts.json").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = test::call_service(&app, get("/posts/1.json").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = test::call_service(&app, get("/posts/?format=json").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(&app, get("/posts/?format=xml").to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Decoded values, empty values and a trailing slash after the suffix
    for uri in ["/posts/?format=%6Ason", "/posts/?format=", "/posts/1.json/"] {
        let res = test::call_service(&app, get(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "GET {uri}");
    }

    let req = get("/posts/").insert_header(("Accept", "text/html")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);

    let req = get("/posts/").insert_header(("Accept", "text/html, */*;q=0.1")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_error_body_carries_request_id() {
    let fx = Fixture::new();
    let app = init_app!(fx);

    let req = get("/posts/7/").insert_header(("X-Request-ID", "req-42")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers().get("x-request-id").unwrap(), "req-42");

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["request_id"], "req-42");
    assert_eq!(body["detail"], "Post with id 7 not found");
}

#[actix_rt::test]
async fn test_register_login_refresh_and_me() {
    let fx = Fixture::new();
    let app = init_app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "carol", "email": "carol@example.com", "password": "s3cret-pass"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["token_type"], "Bearer");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": "carol", "password": "another-pass"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["username"].is_array());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({"username": "carol", "password": "wrong-pass"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/token")
        .set_json(json!({"username": "carol", "password": "s3cret-pass"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let bearer = format!("Bearer {}", body["access_token"].as_str().unwrap());

    let req = authed(test::TestRequest::post().uri("/api/v1/auth/token/refresh"), &bearer)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = authed(get("/api/v1/auth/me"), &bearer).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "carol");
    assert_eq!(body["posts"], json!([]));

    let res = test::call_service(&app, get("/api/v1/auth/me").to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_health_reports_memory_store() {
    let fx = Fixture::new();
    let app = init_app!(fx);

    let body: Value = test::call_and_read_body_json(&app, get("/health").to_request()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}
