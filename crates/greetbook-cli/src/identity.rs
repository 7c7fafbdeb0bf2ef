//! Google sign-in through the OpenID Connect userinfo endpoint.
//!
//! The terminal client cannot run a browser popup, so it takes an OAuth
//! access token obtained elsewhere (`--google-token`). Signing in reads the
//! profile behind that token; signing out revokes it.

use std::time::Duration;

use greetbook_core::{identity::IdentityProvider, visitor::FederatedProfile};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
pub const REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

#[derive(Debug, Error)]
pub enum GoogleError {
  #[error("google sign-in is not configured (pass --google-token)")]
  NotConfigured,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("google rejected the request: {0}")]
  Rejected(StatusCode),
}

/// The userinfo fields we read. Everything else in the response is ignored.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
  #[serde(default)]
  name:    String,
  #[serde(default)]
  email:   String,
  picture: Option<String>,
}

impl From<GoogleUserInfo> for FederatedProfile {
  fn from(info: GoogleUserInfo) -> Self {
    Self {
      name:  info.name,
      email: info.email,
      photo: info.picture,
    }
  }
}

/// [`IdentityProvider`] backed by a Google OAuth access token.
pub struct GoogleIdentity {
  client:       Client,
  token:        Option<String>,
  userinfo_url: String,
  revoke_url:   String,
}

impl GoogleIdentity {
  pub fn new(token: Option<String>) -> Result<Self, GoogleError> {
    let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
    Ok(Self {
      client,
      token: token.filter(|t| !t.trim().is_empty()),
      userinfo_url: USERINFO_URL.to_string(),
      revoke_url: REVOKE_URL.to_string(),
    })
  }

  /// Point the provider at other endpoints.
  pub fn with_endpoints(
    mut self,
    userinfo_url: impl Into<String>,
    revoke_url: impl Into<String>,
  ) -> Self {
    self.userinfo_url = userinfo_url.into();
    self.revoke_url = revoke_url.into();
    self
  }

  pub fn is_configured(&self) -> bool { self.token.is_some() }

  fn token(&self) -> Result<&str, GoogleError> {
    self.token.as_deref().ok_or(GoogleError::NotConfigured)
  }
}

impl IdentityProvider for GoogleIdentity {
  type Error = GoogleError;

  async fn sign_in(&self) -> Result<FederatedProfile, GoogleError> {
    let token = self.token()?;
    let resp = self
      .client
      .get(&self.userinfo_url)
      .bearer_auth(token)
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(GoogleError::Rejected(resp.status()));
    }
    let info: GoogleUserInfo = resp.json().await?;
    debug!(email = %info.email, "fetched google userinfo");
    Ok(info.into())
  }

  async fn sign_out(&self) -> Result<(), GoogleError> {
    let token = self.token()?;
    let resp = self
      .client
      .post(&self.revoke_url)
      .form(&[("token", token)])
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(GoogleError::Rejected(resp.status()));
    }
    info!("google token revoked");
    Ok(())
  }
}
