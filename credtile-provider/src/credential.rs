//! Credential handles.
//!
//! A credential binds one enumeration index and one (possibly absent) user
//! identity to the activation's field registry. It owns no field state of
//! its own: value reads and writes delegate to the registry, and terminal
//! submission delegates to the serializer in [`crate::pack`].

use std::cell::RefCell;
use std::rc::Weak;

use credtile_core::{Scenario, SerializationResult, UserIdentity};

use crate::pack::{self, CredentialPacker};
use crate::registry::{FieldRegistry, RegistryError};
use crate::resolver::FIELD_SECRET;

/// Handle to one enumerated credential tile.
///
/// Created only through [`FieldRegistry::create_credential`], which fixes
/// the identity binding and memoizes the handle by index. Holds a non-owning
/// reference to its registry and must not outlive the activation; a handle
/// used after the next activation replaced the registry reports
/// [`RegistryError::Detached`].
#[derive(Debug)]
pub struct Credential {
    index: u32,
    identity: Option<UserIdentity>,
    registry: Weak<RefCell<FieldRegistry>>,
}

impl Credential {
    /// Crate-private so identity binding can only happen at registry
    /// creation time.
    pub(crate) fn new(
        index: u32,
        identity: Option<UserIdentity>,
        registry: Weak<RefCell<FieldRegistry>>,
    ) -> Self {
        Self {
            index,
            identity,
            registry,
        }
    }

    /// Enumeration index this credential was created for.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Identity bound at creation, if the directory resolved one.
    ///
    /// Absence is a normal outcome (the CredentialPrompt scenario never
    /// populates a directory), not an error.
    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// Read a field value through the backing registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Detached`] if the activation that created
    /// this credential has been replaced, or the registry's own bounds
    /// errors.
    pub fn value(&self, field: u32) -> Result<String, RegistryError> {
        let registry = self.registry.upgrade().ok_or(RegistryError::Detached)?;
        let value = registry.borrow().value(field)?;
        Ok(value)
    }

    /// Write a field value through the backing registry.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Credential::value`].
    pub fn set_value(&self, field: u32, value: impl Into<String>) -> Result<(), RegistryError> {
        let registry = self.registry.upgrade().ok_or(RegistryError::Detached)?;
        registry.borrow_mut().set_value(field, value)?;
        Ok(())
    }

    /// Submit this credential for the given scenario.
    ///
    /// Reads the designated secret field and hands everything to the
    /// serializer. Never panics across the boundary; registry failures
    /// (including a detached handle) come back as a `Failed` result with a
    /// user-facing message.
    #[must_use]
    pub fn submit<P: CredentialPacker + ?Sized>(
        &self,
        scenario: Scenario,
        packer: &P,
    ) -> SerializationResult {
        // A handle whose activation has been replaced must not produce any
        // terminal result, not even the scenarios with fixed outcomes.
        if self.registry.upgrade().is_none() {
            return SerializationResult::failed(RegistryError::Detached.to_string());
        }
        // Only the interactive scenarios read the secret.
        let secret = if matches!(scenario, Scenario::Logon | Scenario::UnlockWorkstation) {
            match self.value(FIELD_SECRET.as_u32()) {
                Ok(secret) => secret,
                Err(err) => return SerializationResult::failed(err.to_string()),
            }
        } else {
            String::new()
        };
        pack::serialize(scenario, self.identity.as_ref(), &secret, packer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldRegistry;
    use crate::resolver;
    use std::rc::Rc;

    fn shared_registry(scenario: Scenario) -> Rc<RefCell<FieldRegistry>> {
        let layout = resolver::resolve(scenario);
        let mut registry = if layout.active {
            FieldRegistry::building()
        } else {
            FieldRegistry::inactive()
        };
        for template in layout.templates {
            registry.add_field(template).unwrap();
        }
        registry.seal();
        Rc::new(RefCell::new(registry))
    }

    #[test]
    fn value_access_delegates_to_registry() {
        let registry = shared_registry(Scenario::Logon);
        let credential = FieldRegistry::create_credential(&registry, 0, |_| None).unwrap();
        credential.set_value(FIELD_SECRET.as_u32(), "1234").unwrap();
        assert_eq!(registry.borrow().value(FIELD_SECRET.as_u32()).unwrap(), "1234");
        assert_eq!(credential.value(FIELD_SECRET.as_u32()).unwrap(), "1234");
    }

    #[test]
    fn detached_credential_reports_detached() {
        let registry = shared_registry(Scenario::Logon);
        let credential = FieldRegistry::create_credential(&registry, 0, |_| None).unwrap();
        drop(registry);
        assert_eq!(
            credential.value(FIELD_SECRET.as_u32()),
            Err(RegistryError::Detached)
        );
        assert_eq!(
            credential.set_value(FIELD_SECRET.as_u32(), "x"),
            Err(RegistryError::Detached)
        );
    }

    #[test]
    fn detached_credential_never_submits() {
        use crate::pack::InteractiveLogonPacker;
        use credtile_core::{SerializeOutcome, StatusIcon};

        let registry = shared_registry(Scenario::ChangePassword);
        let credential = FieldRegistry::create_credential(&registry, 0, |_| None).unwrap();
        drop(registry);

        let packer = InteractiveLogonPacker::new(7);
        // Even the scenarios with fixed outcomes report detachment rather
        // than succeeding against a replaced activation.
        for scenario in [
            Scenario::Logon,
            Scenario::UnlockWorkstation,
            Scenario::ChangePassword,
            Scenario::CredentialPrompt,
            Scenario::Invalid,
        ] {
            let result = credential.submit(scenario, &packer);
            assert!(
                matches!(result.outcome, SerializeOutcome::Failed { .. }),
                "{scenario} should fail when detached, got {:?}",
                result.outcome
            );
            assert_eq!(result.status_icon, StatusIcon::Error);
        }
    }

    #[test]
    fn identity_binding_is_fixed_at_creation() {
        let registry = shared_registry(Scenario::Logon);
        let identity = UserIdentity::new(
            credtile_core::Sid::new("S-1-5-21-TEST"),
            uuid::Uuid::from_u128(1),
        );
        let credential =
            FieldRegistry::create_credential(&registry, 3, |_| Some(identity.clone())).unwrap();
        assert_eq!(credential.index(), 3);
        assert_eq!(credential.identity(), Some(&identity));
    }
}
