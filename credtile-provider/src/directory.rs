//! The per-activation user directory.
//!
//! The host supplies the ordered identity batch once per activation (for
//! scenarios that have one at all); the batch ordering defines the
//! enumeration index contract.

use credtile_core::UserIdentity;

/// Ordered set of user identities for the current activation.
///
/// The index domain is exactly `[0, count)`. Lookups outside it, including
/// against a directory that was never populated, resolve to `None`; absence
/// is a normal outcome that downstream logic tolerates, never an error.
#[derive(Debug, Default)]
pub struct UserDirectory {
    identities: Vec<UserIdentity>,
}

impl UserDirectory {
    /// An empty directory, the state of every fresh activation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the directory contents wholesale.
    ///
    /// Called at most once per activation by contract; a second call simply
    /// overwrites.
    pub fn populate(&mut self, identities: Vec<UserIdentity>) {
        self.identities = identities;
    }

    /// Identity at enumeration index `index`, if one exists.
    #[must_use]
    pub fn identity_at(&self, index: u32) -> Option<&UserIdentity> {
        self.identities.get(index as usize)
    }

    /// Number of identities supplied by the host.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.identities.len() as u32
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
