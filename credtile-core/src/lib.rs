//! # Credtile Core
//!
//! Pure domain types for the Credtile authentication front-end adapter.
//!
//! ## Design Principles
//!
//! This crate is intentionally **IO-free**:
//! - No filesystem operations
//! - No network calls
//! - No OS-specific APIs
//! - No logging
//!
//! All types are plain Rust structs/enums with serde serialization. The
//! actual behavior (field registry state machine, credential serialization,
//! the host call surface) lives in `credtile-provider`.
//!
//! ## Stability
//!
//! The public API includes:
//! - All types exported from this module
//! - Their serde serialization format (JSON field names, enum representations)
//!
//! Breaking changes to serialization format will bump the major version.
//!
//! ## Modules
//!
//! - [`scenario`] - Authentication scenario selection
//! - [`field`] - Display field descriptors and state
//! - [`identity`] - User identity types
//! - [`status`] - Serialization results and host status feedback

pub mod field;
pub mod identity;
pub mod scenario;
pub mod status;

// Re-export commonly used types at crate root for convenience.
// Users can write `use credtile_core::Scenario` instead of
// `use credtile_core::scenario::Scenario`.

pub use field::{FieldDescriptor, FieldId, FieldInteractivity, FieldKind, FieldState, FieldVisibility};
pub use identity::{Sid, UserIdentity};
pub use scenario::Scenario;
pub use status::{SerializationResult, SerializeOutcome, StatusIcon};
