//! Async HTTP client wrapping the greetbook JSON API.
//!
//! [`ApiClient`] implements [`GreetingStore`], so the core flows run against
//! a remote server exactly as they would against a local store.

use std::time::Duration;

use greetbook_core::{
  greeting::{Greeting, GreetingStatus, NewGreeting, RawGreeting, decode_listing},
  store::GreetingStore,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Connection settings for the greetbook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{method} {path} → {status}: {message}")]
  Status {
    method:  &'static str,
    path:    String,
    status:  StatusCode,
    message: String,
  },

  #[error(transparent)]
  Decode(#[from] greetbook_core::Error),
}

/// Body of an API error response.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Serialize)]
struct StatusBody {
  status: GreetingStatus,
}

/// Async HTTP client for the greetbook JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Pass a successful response through; turn anything else into
  /// [`ClientError::Status`] carrying the server's error message.
  async fn check(
    method: &'static str,
    path: &str,
    resp: Response,
  ) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = match resp.json::<ErrorBody>().await {
      Ok(body) => body.error,
      Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };
    Err(ClientError::Status {
      method,
      path: path.to_string(),
      status,
      message,
    })
  }

  async fn decode_one(resp: Response) -> Result<Greeting, ClientError> {
    let raw: RawGreeting = resp.json().await?;
    Ok(raw.decode()?)
  }

  async fn decode_many(resp: Response) -> Result<Vec<Greeting>, ClientError> {
    let raw: Vec<RawGreeting> = resp.json().await?;
    Ok(decode_listing(raw, None))
  }
}

impl GreetingStore for ApiClient {
  type Error = ClientError;

  /// `POST /api/greetings`
  async fn create_greeting(&self, input: NewGreeting) -> Result<Greeting, ClientError> {
    let path = "/greetings";
    let resp = self.client.post(self.url(path)).json(&input).send().await?;
    let resp = Self::check("POST", path, resp).await?;
    Self::decode_one(resp).await
  }

  /// `GET /api/gallery` for approved greetings, otherwise
  /// `GET /api/moderation/greetings[?status=pending]`.
  async fn list_greetings(
    &self,
    status: Option<GreetingStatus>,
  ) -> Result<Vec<Greeting>, ClientError> {
    let (path, req) = match status {
      Some(GreetingStatus::Approved) => {
        ("/gallery", self.client.get(self.url("/gallery")))
      }
      Some(status) => (
        "/moderation/greetings",
        self
          .auth(self.client.get(self.url("/moderation/greetings")))
          .query(&[("status", status.as_str())]),
      ),
      None => (
        "/moderation/greetings",
        self.auth(self.client.get(self.url("/moderation/greetings"))),
      ),
    };
    let resp = Self::check("GET", path, req.send().await?).await?;
    let greetings = Self::decode_many(resp).await?;
    debug!(count = greetings.len(), path, "fetched greetings");
    Ok(greetings)
  }

  /// `GET /api/moderation/greetings/:id`
  async fn get_greeting(&self, id: Uuid) -> Result<Option<Greeting>, ClientError> {
    let path = format!("/moderation/greetings/{id}");
    let resp = self.auth(self.client.get(self.url(&path))).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let resp = Self::check("GET", &path, resp).await?;
    Self::decode_one(resp).await.map(Some)
  }

  /// `PUT /api/moderation/greetings/:id/status`
  async fn update_status(
    &self,
    id: Uuid,
    status: GreetingStatus,
  ) -> Result<Greeting, ClientError> {
    let path = format!("/moderation/greetings/{id}/status");
    let resp = self
      .auth(self.client.put(self.url(&path)))
      .json(&StatusBody { status })
      .send()
      .await?;
    let resp = Self::check("PUT", &path, resp).await?;
    Self::decode_one(resp).await
  }
}
