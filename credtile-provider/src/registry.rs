//! The field registry state machine.
//!
//! A registry is the only mutable state surface of one scenario activation.
//! It moves through two phases:
//!
//! 1. **Building** - fields may be added; ids are assigned densely from 0 in
//!    call order.
//! 2. **Sealed** - structure (ids, kinds, labels, render state) is frozen;
//!    only field values stay mutable for the host's read/write loop.
//!
//! Adding a field after seal is a resolver bug, not a runtime condition, and
//! fails loudly with [`RegistryError::InactiveRegistryMutation`].
//!
//! The registry also owns the credential cache: credentials are created
//! lazily, memoized by enumeration index, and dropped together with the
//! registry when the next activation replaces it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use credtile_core::{FieldDescriptor, FieldId, FieldState, UserIdentity};

use crate::credential::Credential;
use crate::resolver::FieldTemplate;

/// Errors from field registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A field was added outside the building phase. Indicates a bug in the
    /// caller, not a user-visible condition.
    #[error("field added to a sealed or inactive registry")]
    InactiveRegistryMutation,

    /// A field lookup was outside the registry's id range.
    #[error("field index {index} out of range (registry has {count} fields)")]
    IndexOutOfRange { index: u32, count: u32 },

    /// A credential was requested from a registry with no field set.
    #[error("registry is inactive for this scenario")]
    Inactive,

    /// A credential outlived the registry of its activation.
    #[error("credential is detached from its registry")]
    Detached,
}

/// One field's descriptor, render state, and mutable value.
#[derive(Debug)]
struct FieldSlot {
    descriptor: FieldDescriptor,
    state: FieldState,
    /// `None` means never set; reads come back as the empty string, which is
    /// itself a valid stored value.
    value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Sealed,
}

/// Live field set for the current scenario activation.
///
/// Exclusively owned by one activation and replaced wholesale by the next;
/// never shared across activations.
pub struct FieldRegistry {
    active: bool,
    phase: Phase,
    slots: Vec<FieldSlot>,
    credentials: HashMap<u32, Rc<Credential>>,
}

impl FieldRegistry {
    /// Start a registry in the building phase for a supported scenario.
    #[must_use]
    pub fn building() -> Self {
        Self {
            active: true,
            phase: Phase::Building,
            slots: Vec::new(),
            credentials: HashMap::new(),
        }
    }

    /// The registry handed out for unsupported scenarios: sealed, inactive,
    /// empty.
    ///
    /// Each caller gets its own immutable value; there is no process-global
    /// singleton to alias across activations.
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            active: false,
            phase: Phase::Sealed,
            slots: Vec::new(),
            credentials: HashMap::new(),
        }
    }

    /// Whether this registry carries a field set at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether structure is frozen.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.phase == Phase::Sealed
    }

    /// Add a field during the building phase.
    ///
    /// Ids are dense, zero-based, and assigned in call order; they are never
    /// reused within an activation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InactiveRegistryMutation`] once the registry
    /// is sealed or if it was never active.
    pub fn add_field(&mut self, template: FieldTemplate) -> Result<FieldId, RegistryError> {
        if !self.active || self.phase != Phase::Building {
            return Err(RegistryError::InactiveRegistryMutation);
        }
        let id = FieldId::new(self.slots.len() as u32);
        self.slots.push(FieldSlot {
            descriptor: FieldDescriptor {
                id,
                kind: template.kind,
                label: template.label.to_string(),
                group: template.group,
            },
            state: FieldState {
                visibility: template.visibility,
                interactivity: template.interactivity,
            },
            value: template.default_value.map(str::to_string),
        });
        Ok(id)
    }

    /// Freeze structure. Idempotent; values remain writable afterwards.
    pub fn seal(&mut self) {
        self.phase = Phase::Sealed;
    }

    /// Number of fields in the registry.
    #[must_use]
    pub fn descriptor_count(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Look up the descriptor for field `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] if `index` is not a field id.
    pub fn descriptor_at(&self, index: u32) -> Result<&FieldDescriptor, RegistryError> {
        self.slot(index).map(|slot| &slot.descriptor)
    }

    /// Look up the render state for field `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] if `index` is not a field id.
    pub fn field_state(&self, index: u32) -> Result<FieldState, RegistryError> {
        self.slot(index).map(|slot| slot.state)
    }

    /// Read the value of field `index`; fields never set read as `""`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] if `index` is not a field id.
    pub fn value(&self, index: u32) -> Result<String, RegistryError> {
        self.slot(index)
            .map(|slot| slot.value.clone().unwrap_or_default())
    }

    /// Overwrite the value of field `index` unconditionally.
    ///
    /// The registry performs no type or format validation; that is the
    /// host's or the serializer's concern.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] if `index` is not a field id.
    pub fn set_value(&mut self, index: u32, value: impl Into<String>) -> Result<(), RegistryError> {
        let count = self.descriptor_count();
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or(RegistryError::IndexOutOfRange { index, count })?;
        slot.value = Some(value.into());
        Ok(())
    }

    /// Get or create the credential for enumeration index `index`.
    ///
    /// The cache is keyed by index, not by resolved identity: calling twice
    /// with the same index returns the identical handle, and `lookup` runs
    /// only on the first call. Identity binding is fixed at creation;
    /// `lookup` may yield `None`, which binds a credential without identity
    /// metadata rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Inactive`] for a registry with no field set.
    pub fn create_credential<F>(
        this: &Rc<RefCell<Self>>,
        index: u32,
        lookup: F,
    ) -> Result<Rc<Credential>, RegistryError>
    where
        F: FnOnce(u32) -> Option<UserIdentity>,
    {
        {
            let registry = this.borrow();
            if !registry.active {
                return Err(RegistryError::Inactive);
            }
            if let Some(cached) = registry.credentials.get(&index) {
                return Ok(Rc::clone(cached));
            }
        }
        let identity = lookup(index);
        let credential = Rc::new(Credential::new(index, identity, Rc::downgrade(this)));
        this.borrow_mut()
            .credentials
            .insert(index, Rc::clone(&credential));
        Ok(credential)
    }

    fn slot(&self, index: u32) -> Result<&FieldSlot, RegistryError> {
        self.slots
            .get(index as usize)
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                count: self.descriptor_count(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver;
    use credtile_core::Scenario;

    fn sealed_logon_registry() -> FieldRegistry {
        let mut registry = FieldRegistry::building();
        for template in resolver::resolve(Scenario::Logon).templates {
            registry.add_field(template).unwrap();
        }
        registry.seal();
        registry
    }

    #[test]
    fn ids_are_dense_and_insertion_ordered() {
        let mut registry = FieldRegistry::building();
        let templates = resolver::resolve(Scenario::Logon).templates;
        for (expected, template) in templates.into_iter().enumerate() {
            let id = registry.add_field(template).unwrap();
            assert_eq!(id.as_u32(), expected as u32);
        }
        registry.seal();
        assert_eq!(registry.descriptor_count(), 5);
        for index in 0..5 {
            assert_eq!(registry.descriptor_at(index).unwrap().id.as_u32(), index);
        }
    }

    #[test]
    fn add_field_after_seal_is_rejected() {
        let mut registry = sealed_logon_registry();
        let template = resolver::resolve(Scenario::Logon).templates.remove(0);
        assert_eq!(
            registry.add_field(template),
            Err(RegistryError::InactiveRegistryMutation)
        );
    }

    #[test]
    fn add_field_to_inactive_registry_is_rejected() {
        let mut registry = FieldRegistry::inactive();
        let template = resolver::resolve(Scenario::Logon).templates.remove(0);
        assert_eq!(
            registry.add_field(template),
            Err(RegistryError::InactiveRegistryMutation)
        );
    }

    #[test]
    fn value_roundtrip_and_unset_default() {
        let mut registry = sealed_logon_registry();
        assert_eq!(registry.value(2).unwrap(), "");
        registry.set_value(2, "secret123").unwrap();
        assert_eq!(registry.value(2).unwrap(), "secret123");
        // Empty string is a valid stored value, distinct from never-set.
        registry.set_value(2, "").unwrap();
        assert_eq!(registry.value(2).unwrap(), "");
    }

    #[test]
    fn branding_field_carries_default_value() {
        let registry = sealed_logon_registry();
        assert_eq!(
            registry.value(resolver::FIELD_BRANDING.as_u32()).unwrap(),
            resolver::BRANDING_LABEL
        );
    }

    #[test]
    fn out_of_range_lookup_fails_without_panicking() {
        let registry = sealed_logon_registry();
        assert_eq!(
            registry.descriptor_at(99),
            Err(RegistryError::IndexOutOfRange {
                index: 99,
                count: 5
            })
        );
        assert_eq!(
            registry.field_state(5),
            Err(RegistryError::IndexOutOfRange { index: 5, count: 5 })
        );
    }

    #[test]
    fn credential_creation_is_memoized_by_index() {
        let registry = Rc::new(RefCell::new(sealed_logon_registry()));
        let mut lookups = 0;
        let first = FieldRegistry::create_credential(&registry, 0, |_| {
            lookups += 1;
            None
        })
        .unwrap();
        let second = FieldRegistry::create_credential(&registry, 0, |_| {
            lookups += 1;
            None
        })
        .unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(lookups, 1);
    }

    #[test]
    fn inactive_registry_never_yields_credentials() {
        let registry = Rc::new(RefCell::new(FieldRegistry::inactive()));
        let result = FieldRegistry::create_credential(&registry, 0, |_| None);
        assert_eq!(result.unwrap_err(), RegistryError::Inactive);
    }
}
