//! Handler tests for the scheduling domain
//!
//! These drive `handlers::router` with `oneshot` requests:
//! - bearer token handling and the login form
//! - status codes for visibility and ownership rules
//! - JSON shapes of pages and error envelopes

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{JwtAuth, JwtConfig};
use domain_scheduling::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "handler-test-secret-that-is-long-enough";

struct TestApp {
    // Keeps the container alive for the duration of the test
    _db: TestDatabase,
    app: Router,
    services: SchedulingServices,
    jwt: JwtAuth,
    builder: TestDataBuilder,
}

impl TestApp {
    async fn new(test_name: &str) -> Self {
        let db = TestDatabase::new().await;
        let services = SchedulingServices::new(Repositories::postgres(db.connection()));
        let jwt = JwtAuth::new(&JwtConfig::new(SECRET).unwrap());

        Self {
            app: handlers::router(services.clone(), jwt.clone()),
            _db: db,
            services,
            jwt,
            builder: TestDataBuilder::from_test_name(test_name),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn call(&self, method: &str, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Registers through the API and returns (user id, token)
    async fn signup(&self, label: &str) -> (i64, String) {
        let email = self.builder.email(label);
        let (status, user) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "email": email, "password": self.builder.password() }).to_string(),
                    ))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        (user["id"].as_i64().unwrap(), self.login(&email).await)
    }

    async fn login(&self, email: &str) -> String {
        let form = format!(
            "username={}&password={}",
            email.replace('@', "%40"),
            self.builder.password()
        );
        let (status, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/auth/jwt/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");

        body["access_token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        let email = self.builder.email("admin");
        self.services
            .users
            .ensure_superuser(&email, &self.builder.password())
            .await
            .unwrap();
        self.login(&email).await
    }

    async fn create_schedule(&self, token: &str, name: &str, schedule_type: &str) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                "/me/schedules",
                token,
                Some(json!({ "name": name, "schedule_type": schedule_type })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let t = TestApp::new("handler_no_token").await;

    let (status, body) = t
        .send(Request::builder().uri("/me/schedules").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = t.call("GET", "/me/schedules", "not-a-jwt", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_duplicate_is_conflict() {
    let t = TestApp::new("handler_register").await;
    t.signup("ana").await;

    let (status, body) = t
        .send(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": t.builder.email("ana"), "password": t.builder.password() })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let t = TestApp::new("handler_register_invalid").await;

    let (status, body) = t
        .send(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": "not-an-email", "password": "long-enough" }).to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_bad_request() {
    let t = TestApp::new("handler_bad_login").await;
    t.signup("ana").await;

    let (status, _) = t
        .send(
            Request::builder()
                .method("POST")
                .uri("/auth/jwt/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={}&password=wrong-password",
                    t.builder.email("ana").replace('@', "%40")
                )))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule_visibility() {
    let t = TestApp::new("handler_visibility").await;
    let (_, ana) = t.signup("ana").await;
    let (_, bob) = t.signup("bob").await;

    let private = t.create_schedule(&ana, "Diary", "private").await;
    let public = t.create_schedule(&ana, "Gym", "public").await;

    let (status, body) = t
        .call("GET", &format!("/schedules/{}", private), &bob, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = t
        .call("GET", &format!("/schedules/{}", public), &bob, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Gym");
    assert_eq!(body["owner"]["email"], t.builder.email("ana"));

    let (status, _) = t.call("GET", "/schedules/999999", &bob, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t.call("GET", "/schedules/abc", &bob, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_gym_schedule_with_follower() {
    let t = TestApp::new("handler_gym").await;
    let (ana_id, ana) = t.signup("ana").await;
    let (bob_id, bob) = t.signup("bob").await;
    let admin = t.admin_token().await;

    let (status, gym) = t
        .call(
            "POST",
            "/schedules/",
            &admin,
            Some(json!({ "name": "Gym", "schedule_type": "public", "owner_id": ana_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(gym["owner_id"], ana_id);
    let gym = gym["id"].as_i64().unwrap();

    let (status, event) = t
        .call(
            "POST",
            "/events/",
            &ana,
            Some(json!({
                "name": "Leg day",
                "day_of_week": "monday",
                "start_time": "07:00:00",
                "end_time": "08:30:00",
                "schedule_id": gym,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["day_of_week"], "monday");

    let (status, link) = t
        .call(
            "POST",
            &format!("/me/subscriptions/add_as_follower/{}", gym),
            &bob,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(link["subscription_type"], "follower");

    let (status, page) = t
        .call(
            "GET",
            &format!("/schedules/{}/subscribers?page=0&size=10", gym),
            &ana,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 2);
    assert_eq!(page["totalPages"], 1);
    let mut ids: Vec<i64> = page["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["subscriber"]["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![ana_id.min(bob_id), ana_id.max(bob_id)]);

    // Followers cannot see who else follows
    let (status, _) = t
        .call("GET", &format!("/schedules/{}/subscribers", gym), &bob, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // But they can read the events of a public schedule
    let (status, events) = t
        .call("GET", &format!("/schedules/{}/events", gym), &bob, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events["count"], 1);

    let (status, followed) = t
        .call("GET", "/me/subscriptions/as_follower", &bob, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(followed["count"], 1);
    assert_eq!(followed["result"][0]["schedule"]["id"], gym);

    let (status, _) = t
        .call(
            "POST",
            &format!("/me/subscriptions/add_as_follower/{}", gym),
            &bob,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_follow_rules() {
    let t = TestApp::new("handler_follow_rules").await;
    let (_, ana) = t.signup("ana").await;
    let (_, bob) = t.signup("bob").await;
    let diary = t.create_schedule(&ana, "Diary", "private").await;
    let gym = t.create_schedule(&ana, "Gym", "public").await;

    let follow = |id: i64| format!("/me/subscriptions/add_as_follower/{}", id);

    let (status, _) = t.call("POST", &follow(diary), &bob, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.call("POST", &follow(gym), &ana, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.call("POST", &follow(999_999), &bob, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unfollow_and_owner_link_protection() {
    let t = TestApp::new("handler_unfollow").await;
    let (_, ana) = t.signup("ana").await;
    let (_, bob) = t.signup("bob").await;
    let gym = t.create_schedule(&ana, "Gym", "public").await;

    let (_, link) = t
        .call(
            "POST",
            &format!("/me/subscriptions/add_as_follower/{}", gym),
            &bob,
            None,
        )
        .await;
    let link_id = link["id"].as_i64().unwrap();

    let (_, owned) = t.call("GET", "/me/subscriptions/as_owner", &ana, None).await;
    let owner_link = owned["result"][0]["id"].as_i64().unwrap();

    let (status, _) = t
        .call("DELETE", &format!("/me/subscriptions/{}", owner_link), &ana, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .call("DELETE", &format!("/me/subscriptions/{}", link_id), &ana, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t
        .call("DELETE", &format!("/me/subscriptions/{}", link_id), &bob, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = t
        .call("DELETE", &format!("/me/subscriptions/{}", link_id), &bob, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_listings_require_superuser() {
    let t = TestApp::new("handler_admin").await;
    let (_, ana) = t.signup("ana").await;
    t.create_schedule(&ana, "Gym", "public").await;
    let admin = t.admin_token().await;

    for uri in ["/events/", "/schedules/", "/subscriptions/", "/users/"] {
        let (status, _) = t.call("GET", uri, &ana, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} as regular user", uri);

        let (status, _) = t.call("GET", uri, &admin, None).await;
        assert_eq!(status, StatusCode::OK, "{} as superuser", uri);
    }

    let (_, users) = t.call("GET", "/users/?page=0&size=1", &admin, None).await;
    assert_eq!(users["count"], 2);
    assert_eq!(users["size"], 1);
    assert_eq!(users["totalPages"], 2);
    assert_eq!(users["result"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_create_schedule_for_missing_owner_is_not_found() {
    let t = TestApp::new("handler_admin_missing_owner").await;
    let admin = t.admin_token().await;

    let (status, _) = t
        .call(
            "POST",
            "/schedules/",
            &admin,
            Some(json!({ "name": "Orphan", "owner_id": 999_999 })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_time_range_is_validated() {
    let t = TestApp::new("handler_event_times").await;
    let (_, ana) = t.signup("ana").await;
    let gym = t.create_schedule(&ana, "Gym", "public").await;

    let (status, body) = t
        .call(
            "POST",
            "/events/",
            &ana,
            Some(json!({
                "name": "Backwards",
                "day_of_week": "friday",
                "start_time": "10:00:00",
                "end_time": "09:00:00",
                "schedule_id": gym,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_user_routes_are_self_or_superuser() {
    let t = TestApp::new("handler_users").await;
    let (ana_id, ana) = t.signup("ana").await;
    let (bob_id, bob) = t.signup("bob").await;

    let (status, me) = t.call("GET", &format!("/users/{}", ana_id), &ana, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(me.get("hashed_password").is_none());

    let (status, _) = t.call("GET", &format!("/users/{}", ana_id), &bob, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .call("GET", &format!("/users/{}/schedules", ana_id), &bob, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .call("DELETE", &format!("/users/{}", bob_id), &bob, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_tokens_from_another_issuer_are_rejected() {
    let t = TestApp::new("handler_foreign_token").await;
    let (ana_id, _) = t.signup("ana").await;

    let other = JwtAuth::new(&JwtConfig::new("a-completely-different-secret-value!!").unwrap());
    let forged = other
        .create_access_token(&ana_id.to_string(), "ana@example.com", &["superuser".into()])
        .unwrap();

    let (status, _) = t.call("GET", "/users/", &forged, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let genuine = t
        .jwt
        .create_access_token(&ana_id.to_string(), "ana@example.com", &[])
        .unwrap();
    let (status, _) = t.call("GET", "/users/", &genuine, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_of_deleted_superuser_is_rejected() {
    let t = TestApp::new("handler_deleted_admin").await;
    let admin = t.admin_token().await;

    let (_, me) = t.call("GET", "/users/?page=0&size=1", &admin, None).await;
    let admin_id = me["result"][0]["id"].as_i64().unwrap();

    let (status, _) = t
        .call("DELETE", &format!("/users/{}", admin_id), &admin, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = t.call("GET", "/users/", &admin, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_superuser_role_comes_from_stored_user() {
    let t = TestApp::new("handler_stale_role").await;
    let (ana_id, _) = t.signup("ana").await;

    let claims_superuser = t
        .jwt
        .create_access_token(&ana_id.to_string(), "ana@example.com", &["superuser".into()])
        .unwrap();

    let (status, _) = t.call("GET", "/users/", &claims_superuser, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_page_beyond_last_row_is_empty() {
    let t = TestApp::new("handler_huge_page").await;
    let admin = t.admin_token().await;

    let (status, body) = t
        .call("GET", "/users/?page=100000000000000000&size=100", &admin, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["page"], 100_000_000_000_000_000u64);
    assert!(body["result"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_page_query_uses_error_envelope() {
    let t = TestApp::new("handler_bad_query").await;
    let (_, ana) = t.signup("ana").await;

    let (status, body) = t.call("GET", "/me/schedules?page=abc", &ana, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("query string"));
}
