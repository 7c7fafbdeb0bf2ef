//! Client-side flows over a [`GreetingStore`](crate::store::GreetingStore).
//!
//! Each flow is a small state machine driven through `&mut self`, so an
//! operation in flight cannot overlap another one on the same flow. The
//! store handle is passed in explicitly as an `Arc` and shared between
//! flows; none of them acquires one on its own.

pub mod display;
pub mod moderate;
pub mod submit;

use thiserror::Error;

pub use display::{DisplayFlow, Rotation};
pub use moderate::{ModerationFlow, StatusFilter};
pub use submit::{SubmissionFlow, SubmissionState};

/// Failure of a flow operation.
#[derive(Debug, Error)]
pub enum FlowError<E> {
  /// Rejected locally; the remote side was never contacted.
  #[error(transparent)]
  Invalid(#[from] crate::Error),

  /// The store or identity provider call failed.
  #[error("remote error: {0}")]
  Remote(#[source] E),
}

/// Progress of a flow's initial load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
  #[default]
  NotLoaded,
  Loading,
  Ready,
  /// The load failed; holds the rendered error.
  Failed(String),
}

impl LoadState {
  pub fn is_ready(&self) -> bool { matches!(self, Self::Ready) }
}
