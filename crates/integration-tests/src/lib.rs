//! End-to-end HTTP tests for the food delivery API.
//!
//! Each [`TestContext`] starts the full router on an ephemeral local port,
//! backed by the in-memory store and a throwaway upload directory, and talks
//! to it over real HTTP with `reqwest`.
//!
//! ```bash
//! cargo test -p food-delivery-integration-tests
//! ```

use std::path::PathBuf;

use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};

use food_delivery_server::AppState;
use food_delivery_server::config::{AuthConfig, ServerConfig};
use food_delivery_server::db::Stores;

/// A running server plus a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub upload_dir: PathBuf,
}

impl TestContext {
    /// Start a fresh server with empty stores.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn new() -> Self {
        let upload_dir =
            std::env::temp_dir().join(format!("food-it-{}", uuid::Uuid::new_v4()));

        let config = ServerConfig {
            database_url: None,
            host: [127, 0, 0, 1].into(),
            port: 0,
            auth: AuthConfig {
                jwt_secret: SecretString::from("dGVzdC1zaWduaW5nLWtleS1Gb29kRGVsaXZlcnkyMDI2".to_owned()),
                token_ttl_hours: 1,
            },
            upload_dir: upload_dir.clone(),
            frontend_url: "http://localhost:5173".to_owned(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config, Stores::memory());
        state
            .uploads()
            .ensure()
            .await
            .expect("Failed to create upload directory");
        let app = food_delivery_server::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            upload_dir,
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a JSON body, optionally with a bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, token: Option<&str>, body: &Value) -> Response {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Request failed")
    }

    /// GET a path, optionally with a bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Request failed")
    }

    /// Register a user with a unique email and return its token.
    ///
    /// # Panics
    ///
    /// Panics if registration does not succeed.
    pub async fn register(&self, name: &str) -> String {
        let email = format!("{}-{}@example.com", name.to_lowercase(), uuid::Uuid::new_v4());
        let resp = self
            .post(
                "/api/user/register",
                None,
                &json!({ "name": name, "email": email, "password": "correct-horse-battery" }),
            )
            .await;
        let (status, body) = read(resp).await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("register returned no token")
            .to_owned()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Split a response into its status and JSON envelope.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn read(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let body = resp.json::<Value>().await.expect("Body is not JSON");
    (status, body)
}

/// A delivery address accepted by the order endpoints.
#[must_use]
pub fn address() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+44 20 7946 0000",
        "address": "12 St James's Square, London"
    })
}
