//! Public gallery: approved greetings only, plus a decorative rotation.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
  flow::{FlowError, LoadState},
  greeting::{Greeting, GreetingStatus},
  store::GreetingStore,
};

/// Decorations cycled by the gallery banner.
pub const DECORATIONS: &[&str] = &["🎈", "🎂", "🎁", "🎉", "💖"];

/// Time each decoration stays up.
pub const ROTATION_INTERVAL_SECS: i64 = 3;

// ─── Rotation ────────────────────────────────────────────────────────────────

/// A fixed set of frames cycled on a fixed interval.
///
/// The current frame is computed from the elapsed time, so there is no
/// timer to cancel when the view goes away.
#[derive(Debug, Clone)]
pub struct Rotation {
  frames:     Vec<String>,
  interval:   TimeDelta,
  started_at: DateTime<Utc>,
}

impl Rotation {
  pub fn new(
    frames: impl IntoIterator<Item = impl Into<String>>,
    interval: TimeDelta,
    started_at: DateTime<Utc>,
  ) -> Self {
    Self {
      frames: frames.into_iter().map(Into::into).collect(),
      interval,
      started_at,
    }
  }

  /// The gallery's default rotation over [`DECORATIONS`].
  pub fn decorations(started_at: DateTime<Utc>) -> Self {
    Self::new(
      DECORATIONS.iter().copied(),
      TimeDelta::seconds(ROTATION_INTERVAL_SECS),
      started_at,
    )
  }

  /// Index of the frame showing at `now`, or `None` with no frames.
  pub fn frame_index(&self, now: DateTime<Utc>) -> Option<usize> {
    if self.frames.is_empty() {
      return None;
    }
    let interval_ms = self.interval.num_milliseconds();
    let elapsed_ms = (now - self.started_at).num_milliseconds().max(0);
    if interval_ms <= 0 {
      return Some(0);
    }
    let ticks = (elapsed_ms / interval_ms) as usize;
    Some(ticks % self.frames.len())
  }

  pub fn current(&self, now: DateTime<Utc>) -> Option<&str> {
    self.frame_index(now).map(|i| self.frames[i].as_str())
  }
}

// ─── DisplayFlow ─────────────────────────────────────────────────────────────

/// Read-only view over the approved greetings.
pub struct DisplayFlow<S> {
  store:      Arc<S>,
  greetings:  Vec<Greeting>,
  selected:   Option<Uuid>,
  load_state: LoadState,
  rotation:   Rotation,
}

impl<S: GreetingStore> DisplayFlow<S> {
  pub fn new(store: Arc<S>, rotation: Rotation) -> Self {
    Self {
      store,
      greetings: Vec::new(),
      selected: None,
      load_state: LoadState::NotLoaded,
      rotation,
    }
  }

  /// Fetch the collection and keep only approved greetings.
  ///
  /// The store is asked for approved greetings, and the result is filtered
  /// again here so nothing else can reach the gallery whatever the backend
  /// returns.
  pub async fn load(&mut self) -> Result<(), FlowError<S::Error>> {
    self.load_state = LoadState::Loading;
    match self.store.list_greetings(Some(GreetingStatus::Approved)).await {
      Ok(mut greetings) => {
        greetings.retain(|g| g.status == GreetingStatus::Approved);
        debug!(count = greetings.len(), "loaded gallery");
        self.greetings = greetings;
        self.selected = None;
        self.load_state = LoadState::Ready;
        Ok(())
      }
      Err(e) => {
        error!(error = %e, "failed to load gallery");
        self.load_state = LoadState::Failed(e.to_string());
        Err(FlowError::Remote(e))
      }
    }
  }

  pub fn load_state(&self) -> &LoadState { &self.load_state }

  /// The approved greetings, in load order.
  pub fn visible(&self) -> &[Greeting] { &self.greetings }

  pub fn rotation(&self) -> &Rotation { &self.rotation }

  pub fn select(&mut self, id: Uuid) -> Option<&Greeting> {
    let greeting = self.greetings.iter().find(|g| g.id == id)?;
    self.selected = Some(id);
    Some(greeting)
  }

  pub fn selected(&self) -> Option<&Greeting> {
    let id = self.selected?;
    self.greetings.iter().find(|g| g.id == id)
  }

  pub fn close_detail(&mut self) { self.selected = None; }
}
