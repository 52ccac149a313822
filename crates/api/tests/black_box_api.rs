use branchdesk_api::AppConfig;
use branchdesk_auth::JwtClaims;
use branchdesk_core::UserId;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    async fn spawn_with(config: AppConfig) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = branchdesk_api::app::build_app(&config)
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, client: &reqwest::Client, email: &str, password: &str) -> String {
        let res = client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "login failed for {email}");
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn get(&self, client: &reqwest::Client, token: &str, path: &str) -> (StatusCode, Value) {
        let res = client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        let status = res.status();
        let body = res.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: JWT_SECRET.to_string(),
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

fn mint_jwt(secret: &str, claims: &JwtClaims) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn login_returns_token_and_sanitized_profile() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/login"))
        .json(&json!({ "email": "  SUPERVISOR@g.com ", "password": "Super1230" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "supervisor@g.com");
    assert_eq!(body["user"]["role"], "supervisor");
    assert_eq!(body["user"]["branch"], "tuwaiq");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_failures_do_not_reveal_which_part_was_wrong() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut bodies = Vec::new();
    for (email, password) in [
        ("supervisor@g.com", "wrong-password"),
        ("nobody@g.com", "Super1230"),
    ] {
        let res = client
            .post(srv.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        bodies.push(res.json::<Value>().await.unwrap());
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["success"], false);
    assert_eq!(bodies[0]["error"], "InvalidCredentials");
}

#[tokio::test]
async fn malformed_login_body_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/api/me", "/api/test-branch?branch_id=laban", "/api/revenues"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Unauthenticated");
    }

    let (status, _) = srv.get(&client, "not-a-jwt", "/api/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_expired_and_orphaned_tokens_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let now = Utc::now();

    // Valid session, to learn the admin's account id.
    let token = srv.login(&client, "Admin@g.com", "Admin1230").await;
    let (_, me) = srv.get(&client, &token, "/api/me").await;
    let admin_id: UserId = me["id"].as_str().unwrap().parse().unwrap();

    let forged = mint_jwt(
        "some-other-secret",
        &JwtClaims {
            sub: "admin@g.com".to_string(),
            uid: admin_id,
            issued_at: now,
            expires_at: None,
        },
    );
    let expired = mint_jwt(
        JWT_SECRET,
        &JwtClaims {
            sub: "admin@g.com".to_string(),
            uid: admin_id,
            issued_at: now - ChronoDuration::hours(2),
            expires_at: Some(now - ChronoDuration::hours(1)),
        },
    );
    let unknown_account = mint_jwt(
        JWT_SECRET,
        &JwtClaims {
            sub: "ghost@g.com".to_string(),
            uid: UserId::new(),
            issued_at: now,
            expires_at: None,
        },
    );
    let wrong_id = mint_jwt(
        JWT_SECRET,
        &JwtClaims {
            sub: "admin@g.com".to_string(),
            uid: UserId::new(),
            issued_at: now,
            expires_at: None,
        },
    );

    for bad in [forged, expired, unknown_account, wrong_id] {
        let (status, body) = srv.get(&client, &bad, "/api/me").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthenticated");
    }
}

#[tokio::test]
async fn branch_check_runs_before_permission_check() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let admin = srv.login(&client, "Admin@g.com", "Admin1230").await;
    for branch in ["laban", "tuwaiq"] {
        let (status, body) = srv
            .get(&client, &admin, &format!("/api/test-branch?branch_id={branch}"))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allowed"], true);
        assert_eq!(body["branch"], branch);
    }

    let supervisor = srv.login(&client, "supervisor@g.com", "Super1230").await;
    let (status, _) = srv
        .get(&client, &supervisor, "/api/test-branch?branch_id=tuwaiq")
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = srv
        .get(&client, &supervisor, "/api/test-branch?branch_id=laban")
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "BranchMismatch");

    // Employee lacks view-reports, but the branch is checked first.
    let employee = srv.login(&client, "employee@g.com", "Employee1230").await;
    let (status, body) = srv
        .get(&client, &employee, "/api/test-branch?branch_id=tuwaiq")
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "BranchMismatch");

    let (status, body) = srv.get(&client, &admin, "/api/test-branch").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let (status, _) = srv
        .get(&client, &admin, "/api/test-branch?branch_id=mars")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn revenue_permissions_follow_role_profiles() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supervisor = srv.login(&client, "supervisor@g.com", "Super1230").await;
    for path in ["/api/test-revenue-create", "/api/test-revenue-edit"] {
        let (status, body) = srv.get(&client, &supervisor, path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["branch"], "tuwaiq");
    }

    let employee = srv.login(&client, "employee@g.com", "Employee1230").await;
    let (status, body) = srv.get(&client, &employee, "/api/test-revenue-create").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "PermissionDenied");

    let partner = srv.login(&client, "partner@g.com", "Partner1230").await;
    let (status, body) = srv.get(&client, &partner, "/api/test-revenue-edit").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "PermissionDenied");

    let admin = srv.login(&client, "Admin@g.com", "Admin1230").await;
    let (status, body) = srv
        .get(&client, &admin, "/api/test-revenue-edit?branch_id=laban")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "edit-revenue");
}

#[tokio::test]
async fn explain_reports_the_failing_rule() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supervisor = srv.login(&client, "supervisor@g.com", "Super1230").await;
    let (status, body) = srv
        .get(&client, &supervisor, "/api/explain?action=create-revenue&branch_id=laban")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"]["granted"], false);
    assert_eq!(body["explanation"]["denial"], "BranchMismatch");

    let (status, body) = srv
        .get(&client, &supervisor, "/api/explain?action=manage-users")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"]["denial"], "PermissionDenied");

    let (status, _) = srv.get(&client, &supervisor, "/api/explain").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn diagnostics_can_be_disabled() {
    let srv = TestServer::spawn_with(AppConfig {
        diagnostics: false,
        ..test_config()
    })
    .await;
    let client = reqwest::Client::new();

    let admin = srv.login(&client, "Admin@g.com", "Admin1230").await;
    let (status, _) = srv
        .get(&client, &admin, "/api/test-branch?branch_id=laban")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = srv.get(&client, &admin, "/api/me").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn preflight_and_cors_headers() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, srv.url("/api/test-branch"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let headers = res.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(
        headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .contains("Authorization")
    );
    assert!(
        headers["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("OPTIONS")
    );

    // Errors carry the headers too.
    let res = client.get(srv.url("/api/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "NotFound");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn revenue_lifecycle_create_list_amend() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supervisor = srv.login(&client, "supervisor@g.com", "Super1230").await;

    let res = client
        .post(srv.url("/api/revenues"))
        .bearer_auth(&supervisor)
        .json(&json!({ "amount": 1500, "description": "  catering  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["branch"], "tuwaiq");
    assert_eq!(created["description"], "catering");
    let id = created["id"].as_str().unwrap().to_string();

    let res = client
        .put(srv.url(&format!("/api/revenues/{id}")))
        .bearer_auth(&supervisor)
        .json(&json!({ "amount": 1750 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let amended: Value = res.json().await.unwrap();
    assert_eq!(amended["amount"], 1750);

    let (status, list) = srv.get(&client, &supervisor, "/api/revenues").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["branch"], "tuwaiq");
    assert_eq!(list["total"], 1750);
    assert_eq!(list["entries"].as_array().unwrap().len(), 1);

    // Headquarters sees every branch when it names none.
    let partner = srv.login(&client, "partner@g.com", "Partner1230").await;
    let (status, list) = srv.get(&client, &partner, "/api/revenues").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["branch"], Value::Null);
    assert_eq!(list["total"], 1750);

    let res = client
        .post(srv.url("/api/revenues"))
        .bearer_auth(&supervisor)
        .json(&json!({ "amount": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn business_endpoints_deny_opaquely() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let supervisor = srv.login(&client, "supervisor@g.com", "Super1230").await;
    let (status, body) = srv
        .get(&client, &supervisor, "/api/revenues?branch_id=laban")
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let employee = srv.login(&client, "employee@g.com", "Employee1230").await;
    let res = client
        .post(srv.url("/api/expenses"))
        .bearer_auth(&employee)
        .json(&json!({ "amount": 40, "description": "milk" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Forbidden");

    let (status, body) = srv.get(&client, &supervisor, "/api/users").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn admin_lists_users_per_branch() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let admin = srv.login(&client, "Admin@g.com", "Admin1230").await;
    let (status, body) = srv.get(&client, &admin, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 4);

    let (status, body) = srv.get(&client, &admin, "/api/users?branch_id=laban").await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "employee@g.com");
}

#[tokio::test]
async fn huge_amounts_cannot_break_a_branch_listing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let supervisor = srv.login(&client, "supervisor@g.com", "Super1230").await;

    let res = client
        .post(srv.url("/api/revenues"))
        .bearer_auth(&supervisor)
        .json(&json!({ "amount": i64::MAX, "description": "overflow" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let max = branchdesk_infra::MAX_ENTRY_AMOUNT;
    for _ in 0..2 {
        let res = client
            .post(srv.url("/api/revenues"))
            .bearer_auth(&supervisor)
            .json(&json!({ "amount": max, "description": "big sale" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let (status, list) = srv.get(&client, &supervisor, "/api/revenues").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2 * max);
    assert_eq!(list["entries"].as_array().unwrap().len(), 2);
}
