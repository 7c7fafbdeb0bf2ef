//! Error types for `greetbook-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("federated profile has no {0}")]
  IncompleteProfile(&'static str),

  #[error("unknown greeting status: {0:?}")]
  UnknownStatus(String),

  #[error("greeting not found: {0}")]
  GreetingNotFound(Uuid),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
