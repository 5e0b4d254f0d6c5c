//! The host-facing call surface.
//!
//! [`Provider`] owns one activation at a time: the scenario, its field
//! registry, and its user directory. The host drives the fixed call
//! sequence (activate, populate, enumerate, edit, serialize, report); the
//! provider never initiates anything. This is the only module that logs.

use std::cell::RefCell;
use std::rc::Rc;

use credtile_core::{
    FieldDescriptor, FieldState, Scenario, SerializationResult, StatusIcon, UserIdentity,
};

use crate::credential::Credential;
use crate::directory::UserDirectory;
use crate::pack::CredentialPacker;
use crate::registry::{FieldRegistry, RegistryError};
use crate::resolver;

/// What the host declared itself capable of at construction.
///
/// Replaces the runtime type-probe the host interface would otherwise
/// invite: the capability is a declared fact, not something detected by
/// downcasting a callback object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCapability {
    /// The baseline host surface.
    Basic,
    /// The host accepts extended field-update callbacks.
    Extended,
}

/// One authentication front-end adapter instance.
///
/// # Concurrency
///
/// Single-threaded, synchronous, call/response. Not reentrant: concurrent
/// invocation from more than one thread is a caller contract violation, and
/// the internal `Rc`/`RefCell` state makes the type `!Send` to match.
pub struct Provider<P> {
    capability: HostCapability,
    packer: P,
    scenario: Scenario,
    registry: Rc<RefCell<FieldRegistry>>,
    directory: UserDirectory,
}

impl<P: CredentialPacker> Provider<P> {
    /// Create a provider with no active scenario.
    ///
    /// Until the first [`Provider::activate`], the field set is empty and
    /// inactive.
    pub fn new(packer: P, capability: HostCapability) -> Self {
        Self {
            capability,
            packer,
            scenario: Scenario::Invalid,
            registry: Rc::new(RefCell::new(FieldRegistry::inactive())),
            directory: UserDirectory::new(),
        }
    }

    /// Activate a scenario, replacing any previous activation wholesale.
    ///
    /// Builds the field set through the resolver and seals the registry.
    /// Credentials from the previous activation detach. Returns whether the
    /// adapter participates in this scenario; `flags` is the host's
    /// pass-through behavior word, logged but neither stored nor
    /// interpreted.
    pub fn activate(&mut self, scenario: Scenario, flags: u32) -> bool {
        let layout = resolver::resolve(scenario);
        let mut registry = if layout.active {
            FieldRegistry::building()
        } else {
            FieldRegistry::inactive()
        };
        for template in layout.templates {
            registry
                .add_field(template)
                .expect("registry accepts fields while building");
        }
        registry.seal();

        self.registry = Rc::new(RefCell::new(registry));
        self.directory = UserDirectory::new();
        self.scenario = scenario;

        tracing::debug!(
            scenario = %scenario,
            flags,
            active = layout.active,
            fields = self.field_count(),
            "scenario activated"
        );
        layout.active
    }

    /// Supply the ordered identity batch for this activation.
    pub fn populate_users(&mut self, identities: Vec<UserIdentity>) {
        tracing::debug!(count = identities.len(), "user directory populated");
        self.directory.populate(identities);
    }

    /// Scenario of the current activation.
    #[must_use]
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Declared host capability.
    #[must_use]
    pub fn capability(&self) -> HostCapability {
        self.capability
    }

    /// Number of fields in the current activation.
    #[must_use]
    pub fn field_count(&self) -> u32 {
        self.registry.borrow().descriptor_count()
    }

    /// Descriptor of field `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] beyond the field set.
    pub fn field_descriptor_at(&self, index: u32) -> Result<FieldDescriptor, RegistryError> {
        self.registry.borrow().descriptor_at(index).cloned()
    }

    /// Render state of field `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] beyond the field set.
    pub fn field_state_at(&self, index: u32) -> Result<FieldState, RegistryError> {
        self.registry.borrow().field_state(index)
    }

    /// Current value of field `index` (empty string if never set).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] beyond the field set.
    pub fn value(&self, index: u32) -> Result<String, RegistryError> {
        self.registry.borrow().value(index)
    }

    /// Overwrite the value of field `index`.
    ///
    /// Values are secrets as often as not, so only the field index is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IndexOutOfRange`] beyond the field set.
    pub fn set_value(&self, index: u32, value: impl Into<String>) -> Result<(), RegistryError> {
        tracing::trace!(field = index, "field value updated");
        self.registry.borrow_mut().set_value(index, value)
    }

    /// Get or create the credential handle for enumeration index `index`.
    ///
    /// Idempotent per index: repeated calls return the identical handle.
    /// Identity resolution goes through the user directory and may bind no
    /// identity at all.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Inactive`] when the current scenario is
    /// unsupported.
    pub fn credential_at(&self, index: u32) -> Result<Rc<Credential>, RegistryError> {
        FieldRegistry::create_credential(&self.registry, index, |i| {
            self.directory.identity_at(i).cloned()
        })
    }

    /// Serialize a credential for submission to the authentication engine.
    ///
    /// Each call is independent; nothing advances between calls other than
    /// field values.
    #[must_use]
    pub fn serialize(&self, credential: &Credential) -> SerializationResult {
        let result = credential.submit(self.scenario, &self.packer);
        tracing::debug!(
            scenario = %self.scenario,
            index = credential.index(),
            finished = result.is_finished(),
            icon = ?result.status_icon,
            "credential serialized"
        );
        result
    }

    /// Receive the outcome of a submitted logon.
    ///
    /// Informational only; translating OS status codes into user text is out
    /// of scope, so the default response is no text and no icon.
    pub fn report_outcome(&self, status: u32, substatus: u32) -> (String, StatusIcon) {
        tracing::debug!(status, substatus, "logon outcome reported");
        (String::new(), StatusIcon::None)
    }
}
