//! Greeting submission: `Composing` → `Submitting` → `Composing`.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info};

use crate::{
  flow::FlowError,
  greeting::{Greeting, NewGreeting},
  store::GreetingStore,
  visitor::Visitor,
};

/// How long the success indicator stays up after a submission.
pub const SUCCESS_DISPLAY_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
  Composing,
  Submitting,
}

/// Owns the message draft and writes one greeting per successful submit.
///
/// There is no duplicate guard: submitting the same text twice creates two
/// greetings.
pub struct SubmissionFlow<S> {
  store:         Arc<S>,
  recipient:     String,
  draft:         String,
  state:         SubmissionState,
  success_until: Option<DateTime<Utc>>,
}

impl<S: GreetingStore> SubmissionFlow<S> {
  pub fn new(store: Arc<S>, recipient: impl Into<String>) -> Self {
    Self {
      store,
      recipient: recipient.into(),
      draft: String::new(),
      state: SubmissionState::Composing,
      success_until: None,
    }
  }

  pub fn state(&self) -> SubmissionState { self.state }

  pub fn draft(&self) -> &str { &self.draft }

  pub fn draft_mut(&mut self) -> &mut String { &mut self.draft }

  /// Submit the current draft as `visitor`.
  ///
  /// Blank visitor fields or a blank draft fail before the store is called.
  /// On success the draft is cleared and the success indicator is shown
  /// until `now + 3s`; on a store failure the draft is kept for a manual
  /// retry.
  pub async fn submit(
    &mut self,
    visitor: &Visitor,
    now: DateTime<Utc>,
  ) -> Result<Greeting, FlowError<S::Error>> {
    let input = NewGreeting::compose(visitor, &self.draft, &self.recipient)?;

    self.state = SubmissionState::Submitting;
    let result = self.store.create_greeting(input).await;
    self.state = SubmissionState::Composing;

    match result {
      Ok(greeting) => {
        info!(id = %greeting.id, from = %greeting.from, "greeting submitted");
        self.draft.clear();
        self.success_until = Some(now + TimeDelta::seconds(SUCCESS_DISPLAY_SECS));
        Ok(greeting)
      }
      Err(e) => {
        error!(error = %e, "failed to submit greeting");
        Err(FlowError::Remote(e))
      }
    }
  }

  /// Whether the success indicator should be visible at `now`.
  pub fn success_visible(&self, now: DateTime<Utc>) -> bool {
    self.success_until.is_some_and(|until| now < until)
  }

  /// Drop an expired success indicator.
  pub fn dismiss_expired(&mut self, now: DateTime<Utc>) {
    if !self.success_visible(now) {
      self.success_until = None;
    }
  }
}
