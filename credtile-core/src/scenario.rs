//! Authentication scenario selection.

use serde::{Deserialize, Serialize};

/// The authentication context the host activated the adapter for.
///
/// Determined once per activation and immutable thereafter; every activation
/// replaces the previous field set wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Interactive logon at the physical console.
    Logon,
    /// Unlocking an already logged-on workstation.
    UnlockWorkstation,
    /// Changing the acting user's password.
    ChangePassword,
    /// A remote or in-session credential prompt.
    CredentialPrompt,
    /// Any scenario the adapter does not support.
    Invalid,
}

impl Scenario {
    /// Whether the adapter builds a field set for this scenario.
    ///
    /// Unsupported scenarios yield an inactive, empty registry rather than
    /// an error.
    #[must_use]
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Logon => "logon",
            Self::UnlockWorkstation => "unlock_workstation",
            Self::ChangePassword => "change_password",
            Self::CredentialPrompt => "credential_prompt",
            Self::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_snake_case() {
        assert_eq!(
            serde_json::to_string(&Scenario::UnlockWorkstation).unwrap(),
            r#""unlock_workstation""#
        );
        assert_eq!(
            serde_json::to_string(&Scenario::CredentialPrompt).unwrap(),
            r#""credential_prompt""#
        );
    }

    #[test]
    fn scenario_roundtrip() {
        for scenario in [
            Scenario::Logon,
            Scenario::UnlockWorkstation,
            Scenario::ChangePassword,
            Scenario::CredentialPrompt,
            Scenario::Invalid,
        ] {
            let json = serde_json::to_string(&scenario).unwrap();
            let parsed: Scenario = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, scenario);
        }
    }

    #[test]
    fn only_invalid_is_unsupported() {
        assert!(Scenario::Logon.is_supported());
        assert!(Scenario::UnlockWorkstation.is_supported());
        assert!(Scenario::ChangePassword.is_supported());
        assert!(Scenario::CredentialPrompt.is_supported());
        assert!(!Scenario::Invalid.is_supported());
    }
}
