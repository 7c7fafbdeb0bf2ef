//! In-memory [`GreetingStore`] used by the flow tests.
//!
//! Records are kept in their raw form so tests can seed legacy rows without
//! a status, and reads go through [`RawGreeting::decode`] like a real
//! backend.

use std::sync::{
  Mutex,
  atomic::{AtomicBool, AtomicUsize, Ordering},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  greeting::{Greeting, GreetingStatus, NewGreeting, RawGreeting, decode_listing},
  store::GreetingStore,
};

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
  #[error("store unavailable")]
  Unavailable,
  #[error("greeting not found: {0}")]
  NotFound(Uuid),
  #[error(transparent)]
  Decode(#[from] crate::Error),
}

#[derive(Default)]
pub struct MemoryStore {
  records:         Mutex<Vec<RawGreeting>>,
  pub fail_reads:  AtomicBool,
  pub fail_writes: AtomicBool,
  pub writes:      AtomicUsize,
}

impl MemoryStore {
  pub fn seed(&self, id: Uuid, status: Option<&str>) {
    self.records.lock().unwrap().push(RawGreeting {
      id,
      message: format!("greeting {id}"),
      from: "Seeded".into(),
      to: "Fer".into(),
      email: "seeded@example.com".into(),
      photo: None,
      date: Utc::now(),
      status: status.map(str::to_owned),
    });
  }

  pub fn raw(&self) -> Vec<RawGreeting> { self.records.lock().unwrap().clone() }

  pub fn stored_status(&self, id: Uuid) -> Option<GreetingStatus> {
    self
      .raw()
      .into_iter()
      .find(|r| r.id == id)
      .map(|r| r.decode().unwrap().status)
  }

  fn check_write(&self) -> Result<(), MemoryError> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryError::Unavailable);
    }
    Ok(())
  }
}

impl GreetingStore for MemoryStore {
  type Error = MemoryError;

  async fn create_greeting(
    &self,
    input: NewGreeting,
  ) -> Result<Greeting, MemoryError> {
    self.check_write()?;
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
    self.records.lock().unwrap().push(raw.clone());
    Ok(raw.decode()?)
  }

  async fn list_greetings(
    &self,
    status: Option<GreetingStatus>,
  ) -> Result<Vec<Greeting>, MemoryError> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(MemoryError::Unavailable);
    }
    Ok(decode_listing(self.raw(), status))
  }

  async fn get_greeting(&self, id: Uuid) -> Result<Option<Greeting>, MemoryError> {
    self
      .raw()
      .into_iter()
      .find(|r| r.id == id)
      .map(RawGreeting::decode)
      .transpose()
      .map_err(MemoryError::from)
  }

  async fn update_status(
    &self,
    id: Uuid,
    status: GreetingStatus,
  ) -> Result<Greeting, MemoryError> {
    self.check_write()?;
    let mut records = self.records.lock().unwrap();
    let record = records
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or(MemoryError::NotFound(id))?;
    record.status = Some(status.as_str().to_owned());
    Ok(record.clone().decode()?)
  }
}
