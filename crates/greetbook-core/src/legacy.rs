//! The deprecated `messages` record shape.
//!
//! An earlier revision stored greetings in a `messages` collection with the
//! fields `text`, `sender` and `createdAt`. Those records are not compatible
//! with [`Greeting`](crate::greeting::Greeting) and are never read as one;
//! they can only be converted once, on import.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Result, greeting::RawGreeting};

/// Creation time as found in a legacy export: either an RFC 3339 string or a
/// `{seconds, nanoseconds}` timestamp object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegacyTimestamp {
  Rfc3339(DateTime<Utc>),
  Epoch {
    seconds:     i64,
    #[serde(default)]
    nanoseconds: u32,
  },
}

impl LegacyTimestamp {
  pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::Rfc3339(dt) => Some(*dt),
      Self::Epoch {
        seconds,
        nanoseconds,
      } => DateTime::from_timestamp(*seconds, *nanoseconds),
    }
  }
}

/// One record of the legacy `messages` collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LegacyMessage {
  #[serde(default)]
  pub text:       String,
  #[serde(default)]
  pub sender:     String,
  #[serde(rename = "createdAt")]
  pub created_at: LegacyTimestamp,
}

impl LegacyMessage {
  /// Convert into a raw greeting addressed to `to`.
  ///
  /// The original creation time is kept. `photo` and `status` are left
  /// absent so they decode to their defaults. Returns `None` for records
  /// with no text, no sender, or an out-of-range timestamp.
  pub fn into_raw(self, id: Uuid, to: &str) -> Option<RawGreeting> {
    if self.text.trim().is_empty() || self.sender.trim().is_empty() {
      return None;
    }
    let date = self.created_at.to_datetime()?;
    Some(RawGreeting {
      id,
      message: self.text,
      from: self.sender,
      to: to.to_owned(),
      email: String::new(),
      photo: None,
      date,
      status: None,
    })
  }
}

/// Parse a JSON array export of the legacy collection.
pub fn parse_export(json: &str) -> Result<Vec<LegacyMessage>> {
  Ok(serde_json::from_str(json)?)
}
