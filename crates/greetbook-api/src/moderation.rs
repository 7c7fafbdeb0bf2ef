//! Handlers for `/moderation/greetings` endpoints.
//!
//! Authentication is applied by whoever mounts these routes.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/moderation/greetings` | Optional `?status=pending\|approved` |
//! | `GET`  | `/moderation/greetings/:id` | 404 if not found |
//! | `PUT`  | `/moderation/greetings/:id/status` | Body: `{"status":"approved"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
};
use greetbook_core::{
  greeting::{Greeting, GreetingStatus},
  store::GreetingStore,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<GreetingStatus>,
}

/// `GET /moderation/greetings[?status=<status>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Greeting>>, ApiError>
where
  S: GreetingStore,
{
  let greetings = store
    .list_greetings(params.status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(greetings))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /moderation/greetings/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Greeting>, ApiError>
where
  S: GreetingStore,
{
  let greeting = store
    .get_greeting(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("greeting {id} not found")))?;
  Ok(Json(greeting))
}

// ─── Set status ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: GreetingStatus,
}

/// `PUT /moderation/greetings/:id/status`
pub async fn set_status<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Greeting>, ApiError>
where
  S: GreetingStore,
{
  let Json(body) = body?;
  // Resolve the id first so an unknown greeting is a 404 whatever error type
  // the backend reports it with.
  store
    .get_greeting(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("greeting {id} not found")))?;

  let updated = store
    .update_status(id, body.status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  info!(%id, status = %updated.status, "greeting status changed");
  Ok(Json(updated))
}
