//! Field registry, scenario resolution, and credential serialization for the
//! Credtile authentication front-end.
//!
//! This crate is intentionally IO-free:
//! - No filesystem operations
//! - No network calls
//! - No OS API calls
//!
//! External collaborators are injected via traits:
//! - [`pack::CredentialPacker`] - the native authentication-package
//!   negotiation and credential packing calls
//!
//! The host UI process drives everything through [`Provider`]; the adapter
//! never initiates work on its own. The call surface is **not reentrant**:
//! every operation must be invoked from a single host thread, one call at a
//! time. This is a hard precondition on the caller, not something the core
//! defends against (the `Rc`/`RefCell` internals enforce it by making the
//! types `!Send`).
//!
//! # Example
//!
//! ```
//! use credtile_core::Scenario;
//! use credtile_provider::{HostCapability, InteractiveLogonPacker, Provider};
//! use credtile_provider::resolver::FIELD_SECRET;
//!
//! let mut provider = Provider::new(InteractiveLogonPacker::new(2), HostCapability::Basic);
//! assert!(provider.activate(Scenario::Logon, 0));
//! provider.set_value(FIELD_SECRET.as_u32(), "hunter2").unwrap();
//! ```

pub mod credential;
pub mod directory;
pub mod pack;
pub mod provider;
pub mod registry;
pub mod resolver;

pub use credential::Credential;
pub use directory::UserDirectory;
pub use pack::{
    CredentialPacker, InteractiveLogonPacker, PackError, PackRequest, PackStep, serialize,
};
pub use provider::{HostCapability, Provider};
pub use registry::{FieldRegistry, RegistryError};
pub use resolver::{FieldTemplate, ScenarioLayout, resolve};
