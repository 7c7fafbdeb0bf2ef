//! Greeting moderation: load everything once, filter locally, flip statuses.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
  Error,
  flow::{FlowError, LoadState},
  greeting::{Greeting, GreetingStatus},
  store::GreetingStore,
};

/// The three partitions offered by the moderation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Approved,
  Pending,
}

impl StatusFilter {
  pub fn matches(self, status: GreetingStatus) -> bool {
    match self {
      Self::All => true,
      Self::Approved => status == GreetingStatus::Approved,
      Self::Pending => status == GreetingStatus::Pending,
    }
  }

  /// Next filter in `All → Approved → Pending → All` order.
  pub fn next(self) -> Self {
    match self {
      Self::All => Self::Approved,
      Self::Approved => Self::Pending,
      Self::Pending => Self::All,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Approved => "approved",
      Self::Pending => "pending",
    }
  }
}

/// The moderator's working copy of the collection.
pub struct ModerationFlow<S> {
  store:      Arc<S>,
  greetings:  Vec<Greeting>,
  filter:     StatusFilter,
  selected:   Option<Uuid>,
  load_state: LoadState,
}

impl<S: GreetingStore> ModerationFlow<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      greetings: Vec::new(),
      filter: StatusFilter::default(),
      selected: None,
      load_state: LoadState::NotLoaded,
    }
  }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Fetch the whole collection, replacing the working copy.
  ///
  /// On failure the previous working copy is kept and the load state turns
  /// [`LoadState::Failed`].
  pub async fn load(&mut self) -> Result<(), FlowError<S::Error>> {
    self.load_state = LoadState::Loading;
    match self.store.list_greetings(None).await {
      Ok(greetings) => {
        debug!(count = greetings.len(), "loaded greetings for moderation");
        self.greetings = greetings;
        self.load_state = LoadState::Ready;
        if self
          .selected
          .is_some_and(|id| !self.greetings.iter().any(|g| g.id == id))
        {
          self.selected = None;
        }
        Ok(())
      }
      Err(e) => {
        error!(error = %e, "failed to load greetings");
        self.load_state = LoadState::Failed(e.to_string());
        Err(FlowError::Remote(e))
      }
    }
  }

  pub fn load_state(&self) -> &LoadState { &self.load_state }

  pub fn greetings(&self) -> &[Greeting] { &self.greetings }

  // ── Filtering ─────────────────────────────────────────────────────────────

  pub fn filter(&self) -> StatusFilter { self.filter }

  /// Change the active partition. Never re-fetches.
  pub fn set_filter(&mut self, filter: StatusFilter) { self.filter = filter; }

  /// Greetings in the active partition, in load order.
  pub fn visible(&self) -> Vec<&Greeting> {
    self
      .greetings
      .iter()
      .filter(|g| self.filter.matches(g.status))
      .collect()
  }

  /// Size of `filter`'s partition of the working copy.
  pub fn count(&self, filter: StatusFilter) -> usize {
    self
      .greetings
      .iter()
      .filter(|g| filter.matches(g.status))
      .count()
  }

  // ── Status changes ────────────────────────────────────────────────────────

  /// Set greeting `id` to `target`.
  ///
  /// The working copy changes immediately; if the store write fails it is
  /// restored to the previous status before the error is returned.
  pub async fn set_status(
    &mut self,
    id: Uuid,
    target: GreetingStatus,
  ) -> Result<(), FlowError<S::Error>> {
    let index = self.index_of(id)?;
    let previous = self.greetings[index].status;
    self.greetings[index].status = target;

    match self.store.update_status(id, target).await {
      Ok(updated) => {
        info!(%id, status = %updated.status, "greeting status changed");
        self.greetings[index].status = updated.status;
        Ok(())
      }
      Err(e) => {
        error!(%id, error = %e, "failed to update greeting status");
        self.greetings[index].status = previous;
        Err(FlowError::Remote(e))
      }
    }
  }

  /// Flip greeting `id` between pending and approved.
  pub async fn toggle(&mut self, id: Uuid) -> Result<(), FlowError<S::Error>> {
    let current = self.greetings[self.index_of(id)?].status;
    self.set_status(id, current.toggled()).await
  }

  fn index_of(&self, id: Uuid) -> crate::Result<usize> {
    self
      .greetings
      .iter()
      .position(|g| g.id == id)
      .ok_or(Error::GreetingNotFound(id))
  }

  // ── Detail view ───────────────────────────────────────────────────────────

  /// Open the detail view for `id`. Returns the selected greeting, or
  /// `None` (leaving the selection unchanged) if it is not loaded.
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

#[cfg(test)]
mod tests {
  use std::sync::atomic::Ordering;

  use super::*;
  use crate::memory::MemoryStore;

  /// `[{1, approved}, {2, pending}, {3, <no status>}]`
  fn scenario() -> (Arc<MemoryStore>, [Uuid; 3]) {
    let store = Arc::new(MemoryStore::default());
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    store.seed(ids[0], Some("approved"));
    store.seed(ids[1], Some("pending"));
    store.seed(ids[2], None);
    (store, ids)
  }

  fn visible_ids<S: GreetingStore>(flow: &ModerationFlow<S>) -> Vec<Uuid> {
    flow.visible().iter().map(|g| g.id).collect()
  }

  #[tokio::test]
  async fn filters_partition_the_loaded_set() {
    let (store, ids) = scenario();
    let mut flow = ModerationFlow::new(store);
    flow.load().await.unwrap();

    assert_eq!(visible_ids(&flow), ids.to_vec());

    flow.set_filter(StatusFilter::Pending);
    assert_eq!(visible_ids(&flow), vec![ids[1], ids[2]]);

    flow.set_filter(StatusFilter::Approved);
    assert_eq!(visible_ids(&flow), vec![ids[0]]);

    assert_eq!(
      flow.count(StatusFilter::All),
      flow.count(StatusFilter::Approved) + flow.count(StatusFilter::Pending)
    );
  }

  #[tokio::test]
  async fn unknown_status_record_leaves_the_rest_loaded() {
    let (store, ids) = scenario();
    store.seed(Uuid::new_v4(), Some("rejected"));
    let mut flow = ModerationFlow::new(store);
    flow.load().await.unwrap();

    assert!(flow.load_state().is_ready());
    assert_eq!(visible_ids(&flow), ids.to_vec());
  }

  #[tokio::test]
  async fn changing_filter_does_not_refetch() {
    let (store, _) = scenario();
    let mut flow = ModerationFlow::new(store.clone());
    flow.load().await.unwrap();

    store.fail_reads.store(true, Ordering::SeqCst);
    flow.set_filter(StatusFilter::Pending);
    assert_eq!(flow.visible().len(), 2);
    assert!(flow.load_state().is_ready());
  }

  #[tokio::test]
  async fn missing_status_is_not_written_back() {
    let (store, ids) = scenario();
    let mut flow = ModerationFlow::new(store.clone());
    flow.load().await.unwrap();

    let legacy = store.raw().into_iter().find(|r| r.id == ids[2]).unwrap();
    assert!(legacy.status.is_none());
  }

  #[tokio::test]
  async fn double_toggle_restores_original_status() {
    let (store, ids) = scenario();
    let mut flow = ModerationFlow::new(store.clone());
    flow.load().await.unwrap();

    flow.toggle(ids[1]).await.unwrap();
    assert_eq!(store.stored_status(ids[1]), Some(GreetingStatus::Approved));
    flow.toggle(ids[1]).await.unwrap();

    assert_eq!(store.stored_status(ids[1]), Some(GreetingStatus::Pending));
    assert_eq!(flow.greetings()[1].status, GreetingStatus::Pending);
  }

  #[tokio::test]
  async fn failed_write_rolls_back_working_copy() {
    let (store, ids) = scenario();
    let mut flow = ModerationFlow::new(store.clone());
    flow.load().await.unwrap();
    store.fail_writes.store(true, Ordering::SeqCst);

    let result = flow.set_status(ids[1], GreetingStatus::Approved).await;

    assert!(matches!(result, Err(FlowError::Remote(_))));
    assert_eq!(flow.greetings()[1].status, GreetingStatus::Pending);
    assert_eq!(store.stored_status(ids[1]), Some(GreetingStatus::Pending));
  }

  #[tokio::test]
  async fn unknown_id_is_rejected_locally() {
    let (store, _) = scenario();
    let mut flow = ModerationFlow::new(store.clone());
    flow.load().await.unwrap();

    let missing = Uuid::new_v4();
    assert!(matches!(
      flow.toggle(missing).await,
      Err(FlowError::Invalid(Error::GreetingNotFound(id))) if id == missing
    ));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn load_failure_is_an_explicit_state() {
    let (store, _) = scenario();
    store.fail_reads.store(true, Ordering::SeqCst);
    let mut flow = ModerationFlow::new(store);

    assert!(flow.load().await.is_err());
    assert!(matches!(flow.load_state(), LoadState::Failed(msg) if msg == "store unavailable"));
    assert!(flow.visible().is_empty());
  }

  #[tokio::test]
  async fn detail_view_tracks_selection_without_side_effects() {
    let (store, ids) = scenario();
    let mut flow = ModerationFlow::new(store.clone());
    flow.load().await.unwrap();

    assert!(flow.select(Uuid::new_v4()).is_none());
    assert!(flow.selected().is_none());

    let selected = flow.select(ids[2]).unwrap();
    assert_eq!(selected.status, GreetingStatus::Pending);
    flow.close_detail();
    assert!(flow.selected().is_none());
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
  }
}
