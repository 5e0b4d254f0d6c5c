//! Serialization results and host status feedback.

use serde::{Deserialize, Serialize};

/// Icon the host should display next to a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    /// No icon.
    None,
    Success,
    Error,
    Warning,
}

/// Terminal outcome of serializing a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SerializeOutcome {
    /// An authentication blob was produced (possibly empty for scenarios
    /// that complete without one) and ownership transfers to the host.
    Finished {
        #[serde(with = "serde_bytes_base64")]
        blob: Vec<u8>,
        /// Identifier of the negotiated authentication package that
        /// interprets the blob.
        auth_package_id: u32,
    },
    /// Nothing to submit; the host decides what happens next.
    NotFinished,
    /// Serialization failed with a user-presentable reason.
    Failed { reason: String },
}

/// Result of a serialization attempt, with display hints for the host.
///
/// Failures are always expressed through this type; serialization never
/// panics across the component boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializationResult {
    #[serde(flatten)]
    pub outcome: SerializeOutcome,
    /// User-facing status message; empty when there is nothing to say.
    pub status_text: String,
    pub status_icon: StatusIcon,
}

impl SerializationResult {
    /// A finished result carrying a blob for the authentication engine.
    #[must_use]
    pub fn finished(blob: Vec<u8>, auth_package_id: u32) -> Self {
        Self {
            outcome: SerializeOutcome::Finished {
                blob,
                auth_package_id,
            },
            status_text: String::new(),
            status_icon: StatusIcon::None,
        }
    }

    /// The safe default: defer the decision to the host.
    #[must_use]
    pub fn not_finished() -> Self {
        Self {
            outcome: SerializeOutcome::NotFinished,
            status_text: String::new(),
            status_icon: StatusIcon::None,
        }
    }

    /// A failure with a user-presentable reason, displayed with the Error
    /// icon.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            status_text: reason.clone(),
            outcome: SerializeOutcome::Failed { reason },
            status_icon: StatusIcon::Error,
        }
    }

    /// Attach a status message and icon.
    #[must_use]
    pub fn with_status(mut self, text: impl Into<String>, icon: StatusIcon) -> Self {
        self.status_text = text.into();
        self.status_icon = icon;
        self
    }

    /// Length in bytes of the produced blob, zero if none.
    #[must_use]
    pub fn blob_len(&self) -> u32 {
        match &self.outcome {
            SerializeOutcome::Finished { blob, .. } => blob.len() as u32,
            _ => 0,
        }
    }

    /// Returns true if this is a finished result.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.outcome, SerializeOutcome::Finished { .. })
    }
}

/// Blobs serialize as base64 strings rather than JSON byte arrays.
mod serde_bytes_base64 {
    use base64::prelude::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        BASE64_STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
