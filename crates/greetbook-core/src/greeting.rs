//! Greeting types: the single persisted entity of the store.
//!
//! Records cross the store and HTTP boundaries as [`RawGreeting`], whose
//! later-added fields are optional. [`RawGreeting::decode`] is the only place
//! where missing fields are filled in; everything past it works with a fully
//! populated [`Greeting`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{Error, Result, visitor::Visitor};

/// Avatar used when the visitor has no photo of their own.
pub const DEFAULT_AVATAR_URL: &str =
  "https://cdn.pixabay.com/photo/2016/08/08/09/17/avatar-1577909_960_720.png";

// ─── Status ──────────────────────────────────────────────────────────────────

/// Moderation status of a greeting.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GreetingStatus {
  /// Unreviewed. Also the status of records written before moderation
  /// existed.
  #[default]
  Pending,
  /// Cleared for the public gallery.
  Approved,
}

impl GreetingStatus {
  /// The string stored in the `status` column and sent over the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Approved => "approved",
    }
  }

  /// The other status; moderation only ever flips between the two.
  pub fn toggled(self) -> Self {
    match self {
      Self::Pending => Self::Approved,
      Self::Approved => Self::Pending,
    }
  }
}

impl FromStr for GreetingStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "pending" => Ok(Self::Pending),
      "approved" => Ok(Self::Approved),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl fmt::Display for GreetingStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Greeting ────────────────────────────────────────────────────────────────

/// A persisted greeting. Only `status` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greeting {
  pub id:      Uuid,
  pub message: String,
  /// Display name of the visitor at submission time.
  pub from:    String,
  /// Fixed recipient label of the deployment.
  pub to:      String,
  /// Contact email of the visitor at submission time. Empty for greetings
  /// imported from the legacy `messages` collection.
  pub email:   String,
  pub photo:   String,
  /// Store-assigned creation time; never changes.
  pub date:    DateTime<Utc>,
  pub status:  GreetingStatus,
}

// ─── RawGreeting ─────────────────────────────────────────────────────────────

/// A greeting as stored or transported, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGreeting {
  pub id:      Uuid,
  pub message: String,
  pub from:    String,
  pub to:      String,
  #[serde(default)]
  pub email:   String,
  #[serde(default)]
  pub photo:   Option<String>,
  pub date:    DateTime<Utc>,
  /// Absent on records created before moderation was introduced.
  #[serde(default)]
  pub status:  Option<String>,
}

impl RawGreeting {
  /// Normalise a raw record into a [`Greeting`].
  ///
  /// A missing status reads as [`GreetingStatus::Pending`] and a missing or
  /// empty photo as [`DEFAULT_AVATAR_URL`]. Nothing is written back.
  pub fn decode(self) -> Result<Greeting> {
    let status = self
      .status
      .as_deref()
      .map(str::parse::<GreetingStatus>)
      .transpose()?
      .unwrap_or_default();

    let photo = self
      .photo
      .filter(|p| !p.is_empty())
      .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_owned());

    Ok(Greeting {
      id: self.id,
      message: self.message,
      from: self.from,
      to: self.to,
      email: self.email,
      photo,
      date: self.date,
      status,
    })
  }
}

/// Decode a listing record by record, keeping those with `status` when a
/// filter is given.
///
/// A record that fails to decode is logged and left out; the rest of the
/// listing is still returned.
pub fn decode_listing(
  records: impl IntoIterator<Item = RawGreeting>,
  status: Option<GreetingStatus>,
) -> Vec<Greeting> {
  records
    .into_iter()
    .filter_map(|raw| {
      let id = raw.id;
      raw
        .decode()
        .inspect_err(|e| warn!(%id, error = %e, "skipping undecodable greeting"))
        .ok()
    })
    .filter(|g| status.is_none_or(|s| g.status == s))
    .collect()
}

// ─── NewGreeting ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::GreetingStore::create_greeting`].
///
/// `id`, `date` and `status` are always set by the store; they are not
/// accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGreeting {
  pub message: String,
  pub from:    String,
  pub to:      String,
  pub email:   String,
  pub photo:   String,
}

impl NewGreeting {
  /// Bind `message` to `visitor`, addressed to `to`.
  ///
  /// Fails without side effects when the visitor's name or email, or the
  /// message itself, is blank.
  pub fn compose(visitor: &Visitor, message: &str, to: &str) -> Result<Self> {
    let greeting = Self {
      message: message.to_owned(),
      from:    visitor.name.clone(),
      to:      to.to_owned(),
      email:   visitor.email.clone(),
      photo:   visitor
        .photo
        .clone()
        .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_owned()),
    };
    greeting.validate()?;
    Ok(greeting)
  }

  /// Check the submission preconditions.
  pub fn validate(&self) -> Result<()> {
    if self.from.trim().is_empty() {
      return Err(Error::EmptyField("name"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::EmptyField("email"));
    }
    if self.message.trim().is_empty() {
      return Err(Error::EmptyField("message"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::visitor::AuthMethod;

  fn raw(status: Option<&str>, photo: Option<&str>) -> RawGreeting {
    RawGreeting {
      id:      Uuid::new_v4(),
      message: "Feliz cumple".into(),
      from:    "Ana".into(),
      to:      "Fer".into(),
      email:   "a@x.com".into(),
      photo:   photo.map(str::to_owned),
      date:    Utc::now(),
      status:  status.map(str::to_owned),
    }
  }

  #[test]
  fn missing_status_decodes_as_pending() {
    let g = raw(None, None).decode().unwrap();
    assert_eq!(g.status, GreetingStatus::Pending);
  }

  #[test]
  fn explicit_status_is_kept() {
    let g = raw(Some("approved"), None).decode().unwrap();
    assert_eq!(g.status, GreetingStatus::Approved);
  }

  #[test]
  fn unknown_status_is_rejected() {
    let err = raw(Some("rejected"), None).decode().unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(s) if s == "rejected"));
  }

  #[test]
  fn missing_or_empty_photo_falls_back_to_default_avatar() {
    assert_eq!(raw(None, None).decode().unwrap().photo, DEFAULT_AVATAR_URL);
    assert_eq!(raw(None, Some("")).decode().unwrap().photo, DEFAULT_AVATAR_URL);
    assert_eq!(
      raw(None, Some("https://example.com/me.png"))
        .decode()
        .unwrap()
        .photo,
      "https://example.com/me.png"
    );
  }

  #[test]
  fn raw_json_without_status_field_parses() {
    let json = serde_json::json!({
      "id": Uuid::new_v4(),
      "message": "hola",
      "from": "Ana",
      "to": "Fer",
      "email": "a@x.com",
      "date": "2025-02-20T10:00:00Z",
    });
    let raw: RawGreeting = serde_json::from_value(json).unwrap();
    assert!(raw.status.is_none());
    assert_eq!(raw.decode().unwrap().status, GreetingStatus::Pending);
  }

  #[test]
  fn listing_skips_undecodable_records_and_filters() {
    let records = vec![
      raw(Some("approved"), None),
      raw(Some("rejected"), None),
      raw(None, None),
    ];
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

    let all = decode_listing(records.clone(), None);
    assert_eq!(all.iter().map(|g| g.id).collect::<Vec<_>>(), [ids[0], ids[2]]);

    let approved = decode_listing(records.clone(), Some(GreetingStatus::Approved));
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, ids[0]);

    let pending = decode_listing(records, Some(GreetingStatus::Pending));
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, ids[2]);
  }

  #[test]
  fn toggled_flips_between_the_two_states() {
    assert_eq!(GreetingStatus::Pending.toggled(), GreetingStatus::Approved);
    assert_eq!(GreetingStatus::Approved.toggled(), GreetingStatus::Pending);
  }

  fn visitor(name: &str, email: &str, photo: Option<&str>) -> Visitor {
    Visitor {
      name:        name.into(),
      email:       email.into(),
      photo:       photo.map(str::to_owned),
      auth_method: AuthMethod::Email,
    }
  }

  #[test]
  fn compose_copies_visitor_fields() {
    let v = visitor("Ana", "a@x.com", Some("https://example.com/ana.png"));
    let g = NewGreeting::compose(&v, "Feliz cumple", "Fer").unwrap();
    assert_eq!(g.from, "Ana");
    assert_eq!(g.email, "a@x.com");
    assert_eq!(g.photo, "https://example.com/ana.png");
    assert_eq!(g.to, "Fer");
    assert_eq!(g.message, "Feliz cumple");
  }

  #[test]
  fn compose_without_photo_uses_default_avatar() {
    let g =
      NewGreeting::compose(&visitor("Ana", "a@x.com", None), "hola", "Fer")
        .unwrap();
    assert_eq!(g.photo, DEFAULT_AVATAR_URL);
  }

  #[test]
  fn compose_rejects_blank_fields() {
    let err = NewGreeting::compose(&visitor("", "a@x.com", None), "hola", "Fer")
      .unwrap_err();
    assert!(matches!(err, Error::EmptyField("name")));

    let err = NewGreeting::compose(&visitor("Ana", "  ", None), "hola", "Fer")
      .unwrap_err();
    assert!(matches!(err, Error::EmptyField("email")));

    let err = NewGreeting::compose(&visitor("Ana", "a@x.com", None), "\n", "Fer")
      .unwrap_err();
    assert!(matches!(err, Error::EmptyField("message")));
  }
}
