//! Identity resolution: the federated path and the manual form.
//!
//! A session holds at most one [`Visitor`]. Switching accounts discards it
//! and, for federated visitors, also ends the provider session.

use std::future::Future;

use tracing::{info, warn};

use crate::{
  flow::FlowError,
  visitor::{AuthMethod, FederatedProfile, ManualIdentity, Visitor},
};

/// A federated identity provider.
///
/// Implementations convert their own response payloads into the narrow
/// [`FederatedProfile`] before returning.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run the provider's login and return the signed-in profile.
  fn sign_in(
    &self,
  ) -> impl Future<Output = Result<FederatedProfile, Self::Error>> + Send + '_;

  /// Terminate the provider session.
  fn sign_out(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// The visitor identity of one client session.
pub struct IdentitySession<P> {
  provider: P,
  visitor:  Option<Visitor>,
}

impl<P: IdentityProvider> IdentitySession<P> {
  pub fn new(provider: P) -> Self {
    Self {
      provider,
      visitor: None,
    }
  }

  /// The currently resolved visitor, if any.
  pub fn visitor(&self) -> Option<&Visitor> { self.visitor.as_ref() }

  pub fn provider(&self) -> &P { &self.provider }

  /// Resolve the visitor through the identity provider.
  ///
  /// Any prior visitor is discarded first, ending its provider session if
  /// it was federated. On failure the session is left empty; nothing is
  /// retried.
  pub async fn sign_in_federated(
    &mut self,
  ) -> Result<&Visitor, FlowError<P::Error>> {
    self.release().await.ok();
    let profile = self.provider.sign_in().await.map_err(FlowError::Remote)?;
    let visitor = profile.into_visitor()?;
    info!(name = %visitor.name, "signed in through identity provider");
    Ok(&*self.visitor.insert(visitor))
  }

  /// Resolve the visitor from the manual name/email form.
  ///
  /// An invalid form leaves the current visitor in place. A valid one
  /// replaces it, ending a prior federated session.
  pub async fn sign_in_manual(
    &mut self,
    form: ManualIdentity,
  ) -> crate::Result<&Visitor> {
    let visitor = form.into_visitor()?;
    self.release().await.ok();
    info!(name = %visitor.name, "signed in with name and email");
    Ok(&*self.visitor.insert(visitor))
  }

  /// Discard the current visitor. A federated visitor's provider session is
  /// ended too; if that fails the visitor is still discarded and the error
  /// is returned.
  pub async fn change_account(&mut self) -> Result<(), P::Error> {
    self.release().await
  }

  async fn release(&mut self) -> Result<(), P::Error> {
    let Some(previous) = self.visitor.take() else {
      return Ok(());
    };
    if previous.auth_method == AuthMethod::Google {
      if let Err(e) = self.provider.sign_out().await {
        warn!(error = %e, "identity provider sign-out failed");
        return Err(e);
      }
    }
    Ok(())
  }
}
