//! The `GreetingStore` trait.
//!
//! Implemented by storage backends (`greetbook-store-sqlite`) and by the
//! HTTP client in `greetbook-cli`. The flows in [`crate::flow`] and the JSON
//! API depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::greeting::{Greeting, GreetingStatus, NewGreeting};

/// Abstraction over the document store holding the `greetings` collection.
///
/// Greetings are created once and afterwards only their status changes;
/// there is no delete. Every write touches a single record and the last
/// write wins.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GreetingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new greeting. The store assigns `id` and `date` and sets the
  /// status to [`GreetingStatus::Pending`].
  fn create_greeting(
    &self,
    input: NewGreeting,
  ) -> impl Future<Output = Result<Greeting, Self::Error>> + Send + '_;

  /// List greetings, optionally restricted to one status. Order is not
  /// meaningful. Records without a stored status count as pending; records
  /// that cannot be decoded are left out of the listing.
  fn list_greetings(
    &self,
    status: Option<GreetingStatus>,
  ) -> impl Future<Output = Result<Vec<Greeting>, Self::Error>> + Send + '_;

  /// Retrieve a greeting by id. Returns `None` if not found.
  fn get_greeting(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Greeting>, Self::Error>> + Send + '_;

  /// Overwrite the status of an existing greeting and return the updated
  /// record. No other field is touched.
  fn update_status(
    &self,
    id: Uuid,
    status: GreetingStatus,
  ) -> impl Future<Output = Result<Greeting, Self::Error>> + Send + '_;
}
