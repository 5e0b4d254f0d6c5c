//! Scenario-to-field-set resolution.
//!
//! [`resolve`] is a pure function: the same scenario always yields the same
//! field templates in the same order, with no side effects. The mapping is a
//! single match over [`Scenario`] rather than branching state scattered
//! across components.

use credtile_core::{FieldId, FieldInteractivity, FieldKind, FieldVisibility, Scenario};
use uuid::Uuid;

/// Ordinal of the tile image field in every supported scenario.
pub const FIELD_TILE_IMAGE: FieldId = FieldId(0);
/// Ordinal of the username edit field.
pub const FIELD_USERNAME: FieldId = FieldId(1);
/// Ordinal of the secret/PIN field, the one serialization reads.
pub const FIELD_SECRET: FieldId = FieldId(2);
/// Ordinal of the confirm-secret field.
pub const FIELD_CONFIRM_SECRET: FieldId = FieldId(3);
/// Ordinal of the static branding label.
pub const FIELD_BRANDING: FieldId = FieldId(4);

/// Number of fields in every supported scenario's template set.
pub const TEMPLATE_FIELD_COUNT: u32 = 5;

/// Fixed branding string shown on deselected tiles.
pub const BRANDING_LABEL: &str = "Credtile Secure Sign-In";

/// Layout-grouping token for the tile logo slot.
pub const GROUP_CREDENTIAL_LOGO: Uuid = Uuid::from_u128(0x2d1e_8f1a_9c43_4b6e_a1f0_5c07_36d9_41b2);
/// Layout-grouping token for the secret/PIN entry slot.
pub const GROUP_SMARTCARD_PIN: Uuid = Uuid::from_u128(0x7a94_03ce_51d8_4f7b_b6e2_90aa_1d58_c44f);

/// Blueprint for one field, before the registry assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    pub kind: FieldKind,
    pub label: &'static str,
    pub visibility: FieldVisibility,
    pub interactivity: FieldInteractivity,
    /// Optional layout-grouping hint for the host.
    pub group: Option<Uuid>,
    /// Initial field value; fields without one read back as empty.
    pub default_value: Option<&'static str>,
}

/// Result of resolving a scenario: whether the adapter participates, and
/// which fields exist if it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioLayout {
    pub active: bool,
    pub templates: Vec<FieldTemplate>,
}

impl ScenarioLayout {
    /// The layout for every unsupported scenario: inactive, no fields.
    ///
    /// Constructed fresh on each call; there is no shared mutable singleton
    /// to alias across activations.
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            active: false,
            templates: Vec::new(),
        }
    }
}

/// Derive the field set for a scenario.
///
/// Supported scenarios (Logon, UnlockWorkstation, ChangePassword,
/// CredentialPrompt) share one five-field template set; only per-field
/// visibility differs:
///
/// | Ordinal | Field          | Visibility                                  |
/// |---------|----------------|---------------------------------------------|
/// | 0       | tile image     | both tiles                                  |
/// | 1       | username       | selected tile for CredentialPrompt, else hidden |
/// | 2       | secret/PIN     | selected tile                               |
/// | 3       | confirm secret | both tiles for ChangePassword, else hidden  |
/// | 4       | branding label | deselected tile                             |
///
/// The username field stays hidden for the console scenarios because those
/// resolve identity out-of-band through the user directory.
#[must_use]
pub fn resolve(scenario: Scenario) -> ScenarioLayout {
    if !scenario.is_supported() {
        return ScenarioLayout::inactive();
    }

    let username_visibility = match scenario {
        Scenario::CredentialPrompt => FieldVisibility::SelectedTile,
        _ => FieldVisibility::Hidden,
    };
    let confirm_visibility = match scenario {
        Scenario::ChangePassword => FieldVisibility::Both,
        _ => FieldVisibility::Hidden,
    };

    ScenarioLayout {
        active: true,
        templates: vec![
            FieldTemplate {
                kind: FieldKind::TileImage,
                label: "Tile image",
                visibility: FieldVisibility::Both,
                interactivity: FieldInteractivity::None,
                group: Some(GROUP_CREDENTIAL_LOGO),
                default_value: None,
            },
            FieldTemplate {
                kind: FieldKind::EditText,
                label: "Username",
                visibility: username_visibility,
                interactivity: FieldInteractivity::None,
                group: None,
                default_value: None,
            },
            FieldTemplate {
                kind: FieldKind::PasswordText,
                label: "PIN",
                visibility: FieldVisibility::SelectedTile,
                interactivity: FieldInteractivity::Focused,
                group: Some(GROUP_SMARTCARD_PIN),
                default_value: None,
            },
            FieldTemplate {
                kind: FieldKind::PasswordText,
                label: "Confirm PIN",
                visibility: confirm_visibility,
                interactivity: FieldInteractivity::None,
                group: None,
                default_value: None,
            },
            FieldTemplate {
                kind: FieldKind::LargeText,
                label: "Branding",
                visibility: FieldVisibility::DeselectedTile,
                interactivity: FieldInteractivity::None,
                group: None,
                default_value: Some(BRANDING_LABEL),
            },
        ],
    }
}
