//! Display field descriptors and state.
//!
//! A field is one UI-bindable unit of display or input. The host owns all
//! rendering; these types only describe what exists and where it should
//! appear. Structure (ids, kinds, labels) is fixed when the registry seals;
//! only values stay mutable afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dense, zero-based ordinal identifying a field within one activation.
///
/// Assigned in insertion order at registry build time and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl FieldId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What kind of UI element a field binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FieldKind {
    /// The tile's image slot.
    TileImage,
    /// A small static text label.
    SmallText,
    /// A large static text label.
    LargeText,
    /// A plain-text edit box.
    EditText,
    /// A masked edit box for secrets.
    PasswordText,
    /// The submit control.
    SubmitButton,
}

/// Where a field renders relative to tile selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldVisibility {
    /// Never rendered.
    Hidden,
    /// Rendered only when the tile is selected.
    SelectedTile,
    /// Rendered only when the tile is not selected.
    DeselectedTile,
    /// Rendered in both selection states.
    Both,
}

/// Whether and how the user may interact with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldInteractivity {
    /// No special interaction handling.
    None,
    /// Visible but not editable.
    ReadOnly,
    /// Rendered greyed out.
    Disabled,
    /// Receives initial keyboard focus.
    Focused,
}

/// Immutable description of one field.
///
/// The optional `group` token is a layout-grouping hint for the host
/// (e.g. credential-logo, smartcard-pin); the adapter never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub kind: FieldKind,
    pub label: String,
    pub group: Option<Uuid>,
}

/// Host-facing render state for one field.
///
/// Mutable only indirectly through scenario re-activation, never by value
/// edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub visibility: FieldVisibility,
    pub interactivity: FieldInteractivity,
}
