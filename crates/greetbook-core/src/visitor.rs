//! The transient identity of whoever is submitting a greeting.
//!
//! A visitor is never persisted on its own; its name, email and photo are
//! copied into each greeting at submission time.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How the visitor identified themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
  Google,
  Email,
}

/// A resolved visitor. `name` and `email` are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
  pub name:        String,
  pub email:       String,
  /// Only federated identities carry a photo.
  pub photo:       Option<String>,
  pub auth_method: AuthMethod,
}

/// The two-field form of the manual path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualIdentity {
  pub name:  String,
  pub email: String,
}

impl ManualIdentity {
  /// Trim both fields and require them to be non-empty.
  pub fn into_visitor(self) -> Result<Visitor> {
    let name = self.name.trim();
    let email = self.email.trim();
    if name.is_empty() {
      return Err(Error::EmptyField("name"));
    }
    if email.is_empty() {
      return Err(Error::EmptyField("email"));
    }
    Ok(Visitor {
      name:        name.to_owned(),
      email:       email.to_owned(),
      photo:       None,
      auth_method: AuthMethod::Email,
    })
  }
}

/// The part of a federated login response we consume. Providers convert
/// their own payloads into this shape and nothing wider crosses the
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedProfile {
  pub name:  String,
  pub email: String,
  pub photo: Option<String>,
}

impl FederatedProfile {
  pub fn into_visitor(self) -> Result<Visitor> {
    let name = self.name.trim();
    let email = self.email.trim();
    if name.is_empty() {
      return Err(Error::IncompleteProfile("name"));
    }
    if email.is_empty() {
      return Err(Error::IncompleteProfile("email"));
    }
    let photo = self
      .photo
      .map(|p| p.trim().to_owned())
      .filter(|p| !p.is_empty());
    Ok(Visitor {
      name: name.to_owned(),
      email: email.to_owned(),
      photo,
      auth_method: AuthMethod::Google,
    })
  }
}
