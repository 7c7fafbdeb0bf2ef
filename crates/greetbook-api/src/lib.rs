//! JSON REST API for greetbook.
//!
//! Exposes axum [`Router`]s backed by any [`GreetingStore`]. The public
//! routes take submissions and serve the gallery; the moderation routes list
//! and re-status greetings. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest(
//!   "/api",
//!   greetbook_api::public_router(store.clone(), "Fer")
//!     .merge(greetbook_api::moderation_router(store).layer(auth)),
//! )
//! ```

pub mod error;
pub mod moderation;
pub mod public;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use greetbook_core::store::GreetingStore;

pub use error::ApiError;
pub use public::PublicState;

/// Build the router for the unauthenticated routes.
///
/// Every greeting submitted through it is addressed to `recipient`.
pub fn public_router<S>(store: Arc<S>, recipient: impl Into<String>) -> Router<()>
where
  S: GreetingStore + 'static,
{
  let state = PublicState {
    store,
    recipient: Arc::from(recipient.into()),
  };
  Router::new()
    .route("/gallery", get(public::gallery::<S>))
    .route("/greetings", post(public::submit::<S>))
    .with_state(state)
}

/// Build the router for the moderation routes.
///
/// The returned `Router<()>` can have an auth layer applied and be merged
/// into any parent router regardless of its own state type.
pub fn moderation_router<S>(store: Arc<S>) -> Router<()>
where
  S: GreetingStore + 'static,
{
  Router::new()
    .route("/moderation/greetings", get(moderation::list::<S>))
    .route("/moderation/greetings/{id}", get(moderation::get_one::<S>))
    .route(
      "/moderation/greetings/{id}/status",
      put(moderation::set_status::<S>),
    )
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use greetbook_core::greeting::{DEFAULT_AVATAR_URL, GreetingStatus, NewGreeting};
  use greetbook_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  fn app(store: Arc<SqliteStore>) -> Router {
    public_router(store.clone(), "Fer").merge(moderation_router(store))
  }

  async fn send(
    store:  Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let resp = app(store)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
  }

  async fn seed(store: &SqliteStore, from: &str, status: GreetingStatus) -> Uuid {
    use greetbook_core::store::GreetingStore as _;
    let created = store
      .create_greeting(NewGreeting {
        message: format!("hola de {from}"),
        from:    from.into(),
        to:      "Fer".into(),
        email:   "x@example.com".into(),
        photo:   DEFAULT_AVATAR_URL.into(),
      })
      .await
      .unwrap();
    store.update_status(created.id, status).await.unwrap();
    created.id
  }

  // ── Submission ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_creates_pending_greeting_for_configured_recipient() {
    let store = make_store().await;
    let (status, body) = send(
      store.clone(),
      "POST",
      "/greetings",
      Some(json!({"message": "Feliz cumple", "from": "Ana", "email": "a@x.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["from"], "Ana");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["message"], "Feliz cumple");
    assert_eq!(body["to"], "Fer");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["photo"], DEFAULT_AVATAR_URL);
  }

  #[tokio::test]
  async fn submit_ignores_client_supplied_recipient() {
    let store = make_store().await;
    let (status, body) = send(
      store,
      "POST",
      "/greetings",
      Some(json!({
        "message": "hola", "from": "Ana", "email": "a@x.com", "to": "Someone else"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["to"], "Fer");
  }

  #[tokio::test]
  async fn submit_with_blank_email_is_rejected_without_a_record() {
    let store = make_store().await;
    let (status, body) = send(
      store.clone(),
      "POST",
      "/greetings",
      Some(json!({"message": "hola", "from": "Ana", "email": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let (_, all) = send(store, "GET", "/moderation/greetings", None).await;
    assert_eq!(all.as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn submit_trims_name_and_email() {
    let store = make_store().await;
    let (status, body) = send(
      store,
      "POST",
      "/greetings",
      Some(json!({"message": "hola", "from": "  Ana ", "email": " a@x.com\n"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["from"], "Ana");
    assert_eq!(body["email"], "a@x.com");
  }

  #[tokio::test]
  async fn submit_with_malformed_body_is_a_json_400() {
    let store = make_store().await;
    let (status, body) = send(
      store,
      "POST",
      "/greetings",
      Some(json!({"message": "hola"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  // ── Gallery ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn gallery_lists_only_approved() {
    let store = make_store().await;
    let approved = seed(&store, "Ana", GreetingStatus::Approved).await;
    seed(&store, "Luis", GreetingStatus::Pending).await;

    let (status, body) = send(store, "GET", "/gallery", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], approved.to_string());
  }

  // ── Moderation ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn moderation_list_filters_by_status() {
    let store = make_store().await;
    seed(&store, "Ana", GreetingStatus::Approved).await;
    let pending = seed(&store, "Luis", GreetingStatus::Pending).await;

    let (_, all) = send(store.clone(), "GET", "/moderation/greetings", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, body) =
      send(store, "GET", "/moderation/greetings?status=pending", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], pending.to_string());
  }

  #[tokio::test]
  async fn get_unknown_greeting_returns_404() {
    let store = make_store().await;
    let (status, body) = send(
      store,
      "GET",
      &format!("/moderation/greetings/{}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn set_status_round_trips() {
    let store = make_store().await;
    let id = seed(&store, "Luis", GreetingStatus::Pending).await;
    let uri = format!("/moderation/greetings/{id}/status");

    let (status, body) =
      send(store.clone(), "PUT", &uri, Some(json!({"status": "approved"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (_, gallery) = send(store.clone(), "GET", "/gallery", None).await;
    assert_eq!(gallery.as_array().unwrap().len(), 1);

    let (_, body) = send(store, "PUT", &uri, Some(json!({"status": "pending"}))).await;
    assert_eq!(body["status"], "pending");
  }

  #[tokio::test]
  async fn set_status_rejects_an_unknown_status_value() {
    let store = make_store().await;
    let id = seed(&store, "Luis", GreetingStatus::Pending).await;
    let (status, body) = send(
      store.clone(),
      "PUT",
      &format!("/moderation/greetings/{id}/status"),
      Some(json!({"status": "rejected"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, pending) =
      send(store, "GET", "/moderation/greetings?status=pending", None).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn set_status_unknown_id_returns_404() {
    let store = make_store().await;
    let (status, _) = send(
      store,
      "PUT",
      &format!("/moderation/greetings/{}/status", Uuid::new_v4()),
      Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
