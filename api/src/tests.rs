use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;

use abi::config::{ServerConfig, TokenConfig};
use abi::errors::Result;
use db::DbRepo;

use crate::mail::Mailer;
use crate::{routes, AppState};

const PUBLIC_URL: &str = "http://api.test";
const CLIENT_URL: &str = "http://client.test";

/// keeps the links instead of mailing them
#[derive(Debug, Default)]
struct RecordingMailer {
    links: Mutex<Vec<String>>,
}

impl RecordingMailer {
    fn last_path(&self) -> String {
        let links = self.links.lock().unwrap();
        let link = links.last().expect("no mail sent");
        link.strip_prefix(PUBLIC_URL).unwrap().to_string()
    }

    fn sent(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, _to: &str, _name: &str, link: &str) -> Result<()> {
        self.links.lock().unwrap().push(link.to_string());
        Ok(())
    }

    async fn send_password_reset(&self, _to: &str, link: &str) -> Result<()> {
        self.links.lock().unwrap().push(link.to_string());
        Ok(())
    }
}

struct TestApp {
    router: Router,
    mailer: Arc<RecordingMailer>,
}

struct Response {
    status: StatusCode,
    body: Value,
    location: Option<String>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_tokens(TokenConfig::default())
    }

    fn with_tokens(tokens: TokenConfig) -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            client_url: CLIENT_URL.to_string(),
            public_url: PUBLIC_URL.to_string(),
        };
        let state = AppState::with_parts(
            DbRepo::memory(tokens),
            mailer.clone(),
            &server,
        );
        Self {
            router: routes::app_routes(state),
            mailer,
        }
    }

    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Response {
            status,
            body,
            location,
        }
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> Response {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    /// register, follow the verification link and log in; returns (user id, bearer token)
    async fn signup(&self, name: &str) -> (String, String) {
        let email = format!("{}@example.com", name.to_lowercase());
        let resp = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "firstName": name,
                    "lastName": "Test",
                    "email": email,
                    "password": "password",
                })),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        let id = resp.body["data"]["_id"].as_str().unwrap().to_string();

        let resp = self
            .call(Method::GET, &self.mailer.last_path(), None, None)
            .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);

        let token = self.login(&email, "password").await;
        (id, token)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let resp = self
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
        resp.body["data"]["token"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn register_verify_and_login() {
    let app = TestApp::new();
    let resp = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "analytical",
            })),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert!(resp.body["data"].get("password").is_none());
    assert!(app.mailer.last_path().starts_with("/users/verify/"));

    let resp = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "analytical"})),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.body["success"], false);

    let resp = app
        .call(Method::GET, &app.mailer.last_path(), None, None)
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let location = resp.location.unwrap();
    assert!(location.starts_with("http://client.test/verify-email?status=success"));

    let token = app.login("ada@example.com", "analytical").await;
    let resp = app
        .call(Method::POST, "/users/get-user", Some(&token), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["email"], "ada@example.com");
    assert_eq!(resp.body["data"]["verified"], true);

    let resp = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ada@example.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn bad_verification_link_redirects_with_error() {
    let app = TestApp::new();
    let resp = app
        .call(Method::GET, "/users/verify/nobody/token", None, None)
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let location = Url::parse(&resp.location.unwrap()).unwrap();
    assert_eq!(location.path(), "/verify-email");
    let params: Vec<(String, String)> = location.query_pairs().into_owned().collect();
    assert_eq!(
        params,
        vec![
            ("status".to_string(), "error".to_string()),
            (
                "message".to_string(),
                "Invalid verification link. Try again later.".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn protected_routes_need_a_valid_bearer() {
    let app = TestApp::new();
    let resp = app
        .call(Method::POST, "/users/suggested-friends", None, None)
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.body,
        json!({"success": false, "message": "Authentication failed"})
    );

    let resp = app
        .call(Method::POST, "/users/suggested-friends", Some("garbage"), None)
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn friendship_over_http() {
    let app = TestApp::new();
    let (alice, alice_token) = app.signup("Alice").await;
    let (bob, bob_token) = app.signup("Bob").await;
    let (carol, _) = app.signup("Carol").await;

    let resp = app
        .post("/users/friend-request", &alice_token, json!({"requestTo": bob}))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["message"], "Friend Request sent successfully");

    let resp = app
        .post("/users/friend-request", &bob_token, json!({"requestTo": alice}))
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.body["message"], "Friend Request already sent.");

    let resp = app
        .call(Method::POST, "/users/get-friend-request", Some(&bob_token), None)
        .await;
    let requests = resp.body["data"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["requestFrom"]["_id"], alice.as_str());
    let rid = requests[0]["_id"].as_str().unwrap().to_string();

    let resp = app
        .post(
            "/users/accept-request",
            &bob_token,
            json!({"rid": rid, "status": "Accepted"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Friend Request Accepted");

    let resp = app
        .call(Method::POST, "/users/get-user", Some(&alice_token), None)
        .await;
    assert_eq!(resp.body["data"]["friends"][0]["_id"], bob.as_str());

    let resp = app
        .call(Method::POST, "/users/suggested-friends", Some(&alice_token), None)
        .await;
    let suggested: Vec<&str> = resp.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["_id"].as_str().unwrap())
        .collect();
    assert_eq!(suggested, vec![carol.as_str()]);

    let resp = app
        .post("/users/unfriend", &alice_token, json!({"friendId": bob}))
        .await;
    assert_eq!(resp.body["message"], "Unfriended successfully");
    for token in [&alice_token, &bob_token] {
        let resp = app
            .call(Method::POST, "/users/get-user", Some(token), None)
            .await;
        assert_eq!(resp.body["data"]["friends"], json!([]));
    }

    let resp = app
        .post("/users/profile-view", &alice_token, json!({"id": carol}))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
}

#[tokio::test]
async fn password_reset_over_http() {
    let app = TestApp::new();
    let (alice, _) = app.signup("Alice").await;

    let resp = app
        .call(
            Method::POST,
            "/users/request-passwordreset",
            None,
            Some(json!({"email": "alice@example.com"})),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["status"], "PENDING");
    assert_eq!(
        resp.body["message"],
        "Reset Password Link has been sent to your account."
    );
    let link = app.mailer.last_path();
    let sent = app.mailer.sent();

    let resp = app
        .call(
            Method::POST,
            "/users/request-passwordreset",
            None,
            Some(json!({"email": "alice@example.com"})),
        )
        .await;
    assert_eq!(
        resp.body["message"],
        "Reset password link has already been sent to your email."
    );
    assert_eq!(app.mailer.sent(), sent);

    let resp = app.call(Method::GET, &link, None, None).await;
    let location = Url::parse(&resp.location.unwrap()).unwrap();
    assert_eq!(location.path(), "/new-password");
    let query: std::collections::HashMap<String, String> =
        location.query_pairs().into_owned().collect();
    assert_eq!(query["uid"], alice);
    let token = query["token"].clone();

    let validate = format!("/users/validate-reset?uid={}&token={}", alice, token);
    let resp = app.call(Method::GET, &validate, None, None).await;
    assert_eq!(resp.body, json!({"valid": true}));

    let resp = app
        .call(Method::GET, "/users/validate-reset?uid=x", None, None)
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"valid": false, "message": "missing_params"}));

    let resp = app
        .call(
            Method::POST,
            "/users/reset-password",
            None,
            Some(json!({"uid": alice, "token": token, "password": "brand-new"})),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["ok"], true);

    let resp = app.call(Method::GET, &validate, None, None).await;
    assert_eq!(resp.body, json!({"valid": false, "message": "invalid_token"}));

    app.login("alice@example.com", "brand-new").await;

    let resp = app
        .call(
            Method::POST,
            "/users/request-passwordreset",
            None,
            Some(json!({"email": "nobody@example.com"})),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["message"], "Email address not found.");
}

#[tokio::test]
async fn expired_reset_link_validates_as_expired_once() {
    let app = TestApp::with_tokens(TokenConfig {
        reset_ttl: -1,
        ..TokenConfig::default()
    });
    let (alice, _) = app.signup("Alice").await;

    let resp = app
        .call(
            Method::POST,
            "/users/request-passwordreset",
            None,
            Some(json!({"email": "alice@example.com"})),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let link = app.mailer.last_path();
    let token = link.rsplit('/').next().unwrap().to_string();

    let resp = app.call(Method::GET, &link, None, None).await;
    let location = Url::parse(&resp.location.unwrap()).unwrap();
    assert_eq!(location.path(), "/new-password");
    let query: std::collections::HashMap<String, String> =
        location.query_pairs().into_owned().collect();
    assert_eq!(query["status"], "error");
    assert_eq!(
        query["message"],
        "Reset Password link has expired. Please try again"
    );

    let validate = format!("/users/validate-reset?uid={}&token={}", alice, token);
    let resp = app.call(Method::GET, &validate, None, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"valid": false, "message": "expired"}));

    let resp = app.call(Method::GET, &validate, None, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"valid": false, "message": "invalid_token"}));
}

#[tokio::test]
async fn posts_over_http() {
    let app = TestApp::new();
    let (alice, alice_token) = app.signup("Alice").await;
    let (_, bob_token) = app.signup("Bob").await;

    let resp = app
        .post(
            "/posts/create-post",
            &alice_token,
            json!({"description": "First light", "image": "https://cdn.test/a.png"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let post_id = resp.body["data"]["_id"].as_str().unwrap().to_string();

    let resp = app
        .call(Method::POST, "/posts", Some(&bob_token), None)
        .await;
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 1);
    let resp = app
        .post("/posts", &bob_token, json!({"search": "nothing like it"}))
        .await;
    assert_eq!(resp.body["data"], json!([]));

    let like = format!("/posts/like/{}", post_id);
    let resp = app.call(Method::POST, &like, Some(&bob_token), None).await;
    assert_eq!(resp.body["data"]["likes"].as_array().unwrap().len(), 1);
    let resp = app.call(Method::POST, &like, Some(&bob_token), None).await;
    assert_eq!(resp.body["data"]["likes"], json!([]));

    let resp = app
        .post(
            &format!("/posts/comment/{}", post_id),
            &bob_token,
            json!({"comment": "Nice", "from": "Bob Test"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let comment_id = resp.body["data"]["_id"].as_str().unwrap().to_string();

    let resp = app
        .post(
            &format!("/posts/reply-comment/{}", comment_id),
            &alice_token,
            json!({"comment": "Thanks", "from": "Alice Test", "replyAt": "Bob Test"}),
        )
        .await;
    let reply_id = resp.body["data"]["replies"][0]["_id"]
        .as_str()
        .unwrap()
        .to_string();
    let resp = app
        .call(
            Method::POST,
            &format!("/posts/like-comment/{}/{}", comment_id, reply_id),
            Some(&bob_token),
            None,
        )
        .await;
    assert_eq!(resp.body["data"]["replies"][0]["likes"].as_array().unwrap().len(), 1);

    let resp = app
        .call(Method::GET, &format!("/posts/comments/{}", post_id), None, None)
        .await;
    assert_eq!(resp.body["data"][0]["_id"], comment_id.as_str());

    let resp = app
        .call(
            Method::POST,
            &format!("/posts/get-user-post/{}", alice),
            Some(&bob_token),
            None,
        )
        .await;
    assert_eq!(resp.body["data"][0]["_id"], post_id.as_str());

    let post_path = format!("/posts/{}", post_id);
    let resp = app
        .call(Method::DELETE, &post_path, Some(&bob_token), None)
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    let resp = app
        .call(Method::DELETE, &post_path, Some(&alice_token), None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let resp = app
        .call(Method::POST, &post_path, Some(&alice_token), None)
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
