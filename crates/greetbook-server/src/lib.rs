//! HTTP server for greetbook.
//!
//! Mounts the JSON API from `greetbook-api` under `/api`, guarding the
//! moderation routes with HTTP Basic auth, and adds a liveness probe and
//! request tracing.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use greetbook_core::store::GreetingStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_moderator};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GREETBOOK_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                    String,
  #[serde(default = "default_port")]
  pub port:                    u16,
  pub store_path:              PathBuf,
  /// The person every greeting is addressed to.
  pub recipient:               String,
  pub moderator_username:      String,
  pub moderator_password_hash: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs, built once at startup.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      config: self.config.clone(),
      auth:   self.auth.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the greetbook server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GreetingStore + 'static,
{
  let moderation = greetbook_api::moderation_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.auth.clone(), require_moderator),
  );
  let api = greetbook_api::public_router(
    state.store.clone(),
    state.config.recipient.clone(),
  )
  .merge(moderation);

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use greetbook_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::Value;
  use tower::ServiceExt as _;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store: Arc::new(store),
      config: Arc::new(ServerConfig {
        host:                    "127.0.0.1".to_string(),
        port:                    8080,
        store_path:              PathBuf::from(":memory:"),
        recipient:               "Fer".to_string(),
        moderator_username:      "moderator".to_string(),
        moderator_password_hash: hash.clone(),
      }),
      auth: Arc::new(AuthConfig {
        username:      "moderator".to_string(),
        password_hash: hash,
      }),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── Public routes ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_is_ok() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/health", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn gallery_needs_no_credentials() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/api/gallery", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, serde_json::json!([]));
  }

  #[tokio::test]
  async fn submission_is_addressed_to_configured_recipient() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(
      state,
      "POST",
      "/api/greetings",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"message":"Feliz cumple","from":"Ana","email":"a@x.com"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["to"], "Fer");
    assert_eq!(body["status"], "pending");
  }

  // ── Moderation routes ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn moderation_without_credentials_is_401() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/api/moderation/greetings", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let challenge = resp.headers().get(header::WWW_AUTHENTICATE).unwrap();
    assert_eq!(challenge, "Basic realm=\"greetbook\"");
  }

  #[tokio::test]
  async fn moderation_with_wrong_password_is_401() {
    let state = make_state("secret").await;
    let auth  = auth_header("moderator", "nope");
    let resp  = oneshot_raw(
      state,
      "GET",
      "/api/moderation/greetings",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn moderator_can_approve_a_submission() {
    let state = make_state("secret").await;
    let auth  = auth_header("moderator", "secret");

    let created = oneshot_raw(
      state.clone(),
      "POST",
      "/api/greetings",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"message":"hola","from":"Luis","email":"l@x.com"}"#,
    ).await;
    let id = json_body(created).await["id"].as_str().unwrap().to_string();

    let resp = oneshot_raw(
      state.clone(),
      "GET",
      "/api/moderation/greetings?status=pending",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);

    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      &format!("/api/moderation/greetings/{id}/status"),
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      r#"{"status":"approved"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp    = oneshot_raw(state, "GET", "/api/gallery", vec![], "").await;
    let gallery = json_body(resp).await;
    assert_eq!(gallery.as_array().unwrap().len(), 1);
    assert_eq!(gallery[0]["id"], id.as_str());
  }
}
