//! User identity types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity string for the user a credential is bound to.
///
/// The adapter never parses or validates the contents; resolution against
/// the OS account database is an external collaborator's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sid(pub String);

impl Sid {
    pub fn new(sid: impl Into<String>) -> Self {
        Self(sid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One enumerable user identity, supplied by the host in a single batch at
/// scenario activation.
///
/// The batch ordering defines the enumeration index contract: the identity
/// at position `i` backs the credential at index `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub sid: Sid,
    /// Opaque classification tag identifying which provider supplied the
    /// identity.
    pub provider_tag: Uuid,
}

impl UserIdentity {
    pub fn new(sid: Sid, provider_tag: Uuid) -> Self {
        Self { sid, provider_tag }
    }
}
