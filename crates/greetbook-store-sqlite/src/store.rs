//! [`SqliteStore`]: the SQLite implementation of [`GreetingStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::warn;
use uuid::Uuid;

use greetbook_core::{
  greeting::{Greeting, GreetingStatus, NewGreeting, RawGreeting, decode_listing},
  legacy::LegacyMessage,
  store::GreetingStore,
};

use crate::{
  Error, Result,
  encode::{COLUMNS, RawRow, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A greetbook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a raw record as-is. Absent `photo` and `status` stay NULL.
  async fn insert_raw(&self, raw: &RawGreeting) -> Result<()> {
    let raw = raw.clone();
    self
      .conn
      .call(move |conn| {
        insert_row(conn, &raw)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Import records from the legacy `messages` collection.
  ///
  /// Each usable record becomes one greeting addressed to `recipient`, with
  /// its original creation time and no stored status. The batch is written
  /// in one transaction, and records already present (same sender, message
  /// and creation time) are not written again, so an interrupted or repeated
  /// import leaves no partial or duplicate rows. Returns the number of
  /// greetings written.
  pub async fn import_legacy(
    &self,
    messages: Vec<LegacyMessage>,
    recipient: &str,
  ) -> Result<usize> {
    let raws: Vec<RawGreeting> = messages
      .into_iter()
      .filter_map(|m| m.into_raw(Uuid::new_v4(), recipient))
      .collect();

    let imported = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut imported = 0;
        for raw in &raws {
          let exists: bool = tx.query_row(
            "SELECT EXISTS (
               SELECT 1 FROM greetings
               WHERE sender = ?1 AND message = ?2 AND created_at = ?3
             )",
            rusqlite::params![raw.from, raw.message, encode_dt(raw.date)],
            |r| r.get(0),
          )?;
          if exists {
            continue;
          }
          insert_row(&tx, raw)?;
          imported += 1;
        }
        tx.commit()?;
        Ok(imported)
      })
      .await?;
    Ok(imported)
  }
}

fn insert_row(
  conn: &rusqlite::Connection,
  raw: &RawGreeting,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO greetings (
       greeting_id, message, sender, recipient, email, photo,
       created_at, status
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    rusqlite::params![
      encode_uuid(raw.id),
      raw.message,
      raw.from,
      raw.to,
      raw.email,
      raw.photo,
      encode_dt(raw.date),
      raw.status,
    ],
  )?;
  Ok(())
}

// ─── GreetingStore impl ──────────────────────────────────────────────────────

impl GreetingStore for SqliteStore {
  type Error = Error;

  async fn create_greeting(&self, input: NewGreeting) -> Result<Greeting> {
    let raw = RawGreeting {
      id:      Uuid::new_v4(),
      message: input.message,
      from:    input.from,
      to:      input.to,
      email:   input.email,
      photo:   Some(input.photo),
      date:    Utc::now(),
      status:  Some(GreetingStatus::Pending.as_str().to_owned()),
    };

    self.insert_raw(&raw).await?;
    Ok(raw.decode()?)
  }

  async fn list_greetings(
    &self,
    status: Option<GreetingStatus>,
  ) -> Result<Vec<Greeting>> {
    let rows: Vec<RawRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM greetings ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map([], RawRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Filter after decoding so rows without a stored status are judged by
    // their decoded default.
    let raws = rows.into_iter().filter_map(|row| {
      let id = row.greeting_id.clone();
      row
        .into_raw()
        .inspect_err(|e| warn!(%id, error = %e, "skipping unreadable row"))
        .ok()
    });
    Ok(decode_listing(raws, status))
  }

  async fn get_greeting(&self, id: Uuid) -> Result<Option<Greeting>> {
    let id_str = encode_uuid(id);

    let row: Option<RawRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM greetings WHERE greeting_id = ?1"),
              rusqlite::params![id_str],
              RawRow::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    row.map(RawRow::into_greeting).transpose()
  }

  async fn update_status(
    &self,
    id: Uuid,
    status: GreetingStatus,
  ) -> Result<Greeting> {
    let id_str     = encode_uuid(id);
    let status_str = status.as_str();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE greetings SET status = ?1 WHERE greeting_id = ?2",
          rusqlite::params![status_str, id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::GreetingNotFound(id));
    }

    self
      .get_greeting(id)
      .await?
      .ok_or(Error::GreetingNotFound(id))
  }
}
