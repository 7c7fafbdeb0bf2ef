//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings. Defaults for missing columns are not applied here;
//! rows are handed to [`RawGreeting::decode`] for that.

use chrono::{DateTime, Utc};
use greetbook_core::greeting::{Greeting, RawGreeting};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawRow::from_row`], for `SELECT` statements.
pub const COLUMNS: &str =
  "greeting_id, message, sender, recipient, email, photo, created_at, status";

/// Raw strings read directly from a `greetings` row.
pub struct RawRow {
  pub greeting_id: String,
  pub message:     String,
  pub sender:      String,
  pub recipient:   String,
  pub email:       String,
  pub photo:       Option<String>,
  pub created_at:  String,
  pub status:      Option<String>,
}

impl RawRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      greeting_id: row.get(0)?,
      message:     row.get(1)?,
      sender:      row.get(2)?,
      recipient:   row.get(3)?,
      email:       row.get(4)?,
      photo:       row.get(5)?,
      created_at:  row.get(6)?,
      status:      row.get(7)?,
    })
  }

  pub fn into_raw(self) -> Result<RawGreeting> {
    Ok(RawGreeting {
      id:      decode_uuid(&self.greeting_id)?,
      message: self.message,
      from:    self.sender,
      to:      self.recipient,
      email:   self.email,
      photo:   self.photo,
      date:    decode_dt(&self.created_at)?,
      status:  self.status,
    })
  }

  pub fn into_greeting(self) -> Result<Greeting> {
    Ok(self.into_raw()?.decode()?)
  }
}
