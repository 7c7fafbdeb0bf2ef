//! Handlers for the unauthenticated endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/gallery` | Approved greetings only |
//! | `POST` | `/greetings` | Body: `{"message":…,"from":…,"email":…,"photo":…}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use greetbook_core::{
  greeting::{DEFAULT_AVATAR_URL, Greeting, GreetingStatus, NewGreeting},
  store::GreetingStore,
};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;

/// State of the public routes: the store plus the deployment's recipient.
pub struct PublicState<S> {
  pub store:     Arc<S>,
  pub recipient: Arc<str>,
}

impl<S> Clone for PublicState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     self.store.clone(),
      recipient: self.recipient.clone(),
    }
  }
}

// ─── Gallery ──────────────────────────────────────────────────────────────────

/// `GET /gallery`
pub async fn gallery<S>(
  State(state): State<PublicState<S>>,
) -> Result<Json<Vec<Greeting>>, ApiError>
where
  S: GreetingStore,
{
  let mut greetings = state
    .store
    .list_greetings(Some(GreetingStatus::Approved))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  greetings.retain(|g| g.status == GreetingStatus::Approved);
  Ok(Json(greetings))
}

// ─── Submit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub message: String,
  pub from:    String,
  pub email:   String,
  #[serde(default)]
  pub photo:   Option<String>,
}

/// `POST /greetings`
///
/// The recipient is always the configured one. Name and email are trimmed;
/// a blank name, email or message is rejected with 400 before the store is
/// touched.
pub async fn submit<S>(
  State(state): State<PublicState<S>>,
  body: Result<Json<SubmitBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GreetingStore,
{
  let Json(body) = body?;
  let input = NewGreeting {
    message: body.message,
    from:    body.from.trim().to_owned(),
    to:      state.recipient.to_string(),
    email:   body.email.trim().to_owned(),
    photo:   body
      .photo
      .filter(|p| !p.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_owned()),
  };
  input.validate()?;

  let greeting = state
    .store
    .create_greeting(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  info!(id = %greeting.id, from = %greeting.from, "greeting submitted");
  Ok((StatusCode::CREATED, Json(greeting)))
}
