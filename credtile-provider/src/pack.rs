//! Credential serialization.
//!
//! Turns a resolved identity plus the collected secret into an opaque
//! authentication blob via a two-phase buffer-sizing protocol, or into a
//! scenario-specific terminal result. The native packing call is an
//! external collaborator behind [`CredentialPacker`]; this module ships
//! [`InteractiveLogonPacker`] as the deterministic reference implementation.

use credtile_core::{Scenario, SerializationResult, Sid, StatusIcon, UserIdentity};

/// Maximum SID length the v1 blob format can carry (fits in u16).
const MAX_SID_LEN: usize = 65535;

/// Maximum secret length in UTF-16 bytes (fits in u16).
const MAX_SECRET_LEN: usize = 65535;

/// Errors from the packing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PackError {
    /// No local authentication package could be negotiated.
    #[error("authentication package negotiation failed")]
    NegotiationFailed,
}

/// What the serializer hands to the packer: the resolved identity and the
/// collected secret, borrowed for the duration of one `pack` call.
#[derive(Debug, Clone, Copy)]
pub struct PackRequest<'a> {
    pub sid: &'a Sid,
    pub secret: &'a str,
}

/// Outcome of one packing step.
///
/// The query-then-fill handshake is modeled as explicit discriminated
/// outcomes, never as an exception-driven retry loop: phase 1 calls with a
/// zero-length destination and expects `InsufficientBuffer`, phase 2 calls
/// with exactly the advertised capacity and expects `Packed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackStep {
    /// The destination was filled with `written` bytes.
    Packed { written: usize },
    /// The destination is too small; `required` bytes are needed.
    InsufficientBuffer { required: usize },
    /// The packer rejected the request outright.
    Refused,
}

/// The native authentication-package seam.
///
/// Implementations are queried once for the package identifier and then
/// driven through the two-phase sizing protocol by [`serialize`]. Packing
/// is expected to be fast; it is never retried beyond the two fixed phases.
pub trait CredentialPacker {
    /// Negotiate the local authentication-package identifier that will
    /// interpret the blob.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::NegotiationFailed`] if no package is available.
    fn negotiate_package(&self) -> Result<u32, PackError>;

    /// Pack the request into `dest`, or report the required size.
    fn pack(&self, request: &PackRequest<'_>, dest: &mut [u8]) -> PackStep;
}

/// Serialize collected values into a terminal result for the host.
///
/// - `Logon` / `UnlockWorkstation`: requires a bound identity and runs the
///   two-phase sizing protocol against `packer`. The phase-2 buffer is
///   returned by value inside the result; nothing is retained or reused.
/// - `ChangePassword`: acknowledged as a no-op success with no blob, so the
///   host does not attempt a secondary logon. Changing the password itself
///   is out of scope for this layer.
/// - Anything else (including `CredentialPrompt` and `Invalid`): the safe
///   default `NotFinished`, deferring the decision to the host.
///
/// Never panics across the component boundary; every failure path is a
/// `Failed` result with user-facing status text and the Error icon.
#[must_use]
pub fn serialize<P: CredentialPacker + ?Sized>(
    scenario: Scenario,
    identity: Option<&UserIdentity>,
    secret: &str,
    packer: &P,
) -> SerializationResult {
    match scenario {
        Scenario::Logon | Scenario::UnlockWorkstation => {
            serialize_interactive(identity, secret, packer)
        }
        Scenario::ChangePassword => SerializationResult::finished(Vec::new(), 0)
            .with_status("password changed", StatusIcon::Success),
        Scenario::CredentialPrompt | Scenario::Invalid => SerializationResult::not_finished(),
    }
}

fn serialize_interactive<P: CredentialPacker + ?Sized>(
    identity: Option<&UserIdentity>,
    secret: &str,
    packer: &P,
) -> SerializationResult {
    let Some(identity) = identity else {
        return SerializationResult::failed("no identity bound to credential");
    };
    let auth_package_id = match packer.negotiate_package() {
        Ok(id) => id,
        Err(err) => return SerializationResult::failed(err.to_string()),
    };

    let request = PackRequest {
        sid: &identity.sid,
        secret,
    };

    // Phase 1: size query against a zero-length destination. The packer is
    // expected to report the required length here, not to produce output.
    let required = match packer.pack(&request, &mut []) {
        PackStep::InsufficientBuffer { required } => required,
        PackStep::Packed { .. } | PackStep::Refused => {
            return SerializationResult::failed("buffer sizing failure");
        }
    };

    // Phase 2: allocate exactly the advertised length and fill it. The
    // filled buffer transfers to the caller inside the result.
    let mut blob = vec![0u8; required];
    match packer.pack(&request, &mut blob) {
        PackStep::Packed { written } => {
            blob.truncate(written);
            SerializationResult::finished(blob, auth_package_id)
        }
        PackStep::InsufficientBuffer { .. } | PackStep::Refused => {
            SerializationResult::failed("pack failure")
        }
    }
}

/// Reference packer producing the v1 interactive-logon blob.
///
/// Blob layout (all multi-byte integers are big-endian):
///
/// | Field      | Size | Description                        |
/// |------------|------|------------------------------------|
/// | magic      | 8    | `"CREDTILE"`                       |
/// | version    | 1    | 0x01                               |
/// | sid_len    | 2    | Length of SID bytes (u16 BE)       |
/// | sid        | var  | UTF-8 SID string                   |
/// | secret_len | 2    | Length of secret bytes (u16 BE)    |
/// | secret     | var  | UTF-16-LE secret                   |
///
/// The secret is carried in UTF-16-LE because that is what the downstream
/// authentication engine consumes; no hashing or encryption happens here.
pub struct InteractiveLogonPacker {
    package_id: u32,
}

/// Magic preamble of the v1 blob.
pub const BLOB_MAGIC: &[u8; 8] = b"CREDTILE";

/// Current blob format version.
pub const BLOB_VERSION: u8 = 0x01;

impl InteractiveLogonPacker {
    /// Create a packer that reports `package_id` as the negotiated
    /// authentication package.
    #[must_use]
    pub fn new(package_id: u32) -> Self {
        Self { package_id }
    }
}

impl CredentialPacker for InteractiveLogonPacker {
    fn negotiate_package(&self) -> Result<u32, PackError> {
        Ok(self.package_id)
    }

    fn pack(&self, request: &PackRequest<'_>, dest: &mut [u8]) -> PackStep {
        let sid = request.sid.as_str().as_bytes();
        let secret: Vec<u8> = request
            .secret
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();

        // Validate lengths before encoding to prevent silent truncation.
        if sid.len() > MAX_SID_LEN || secret.len() > MAX_SECRET_LEN {
            return PackStep::Refused;
        }

        let required = BLOB_MAGIC.len() + 1 + 2 + sid.len() + 2 + secret.len();
        if dest.len() < required {
            return PackStep::InsufficientBuffer { required };
        }

        let mut offset = 0;
        let mut put = |bytes: &[u8]| {
            dest[offset..offset + bytes.len()].copy_from_slice(bytes);
            offset += bytes.len();
        };
        put(BLOB_MAGIC);
        put(&[BLOB_VERSION]);
        put(&(sid.len() as u16).to_be_bytes());
        put(sid);
        put(&(secret.len() as u16).to_be_bytes());
        put(&secret);

        PackStep::Packed { written: required }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credtile_core::SerializeOutcome;
    use std::cell::RefCell;
    use uuid::Uuid;

    fn test_identity() -> UserIdentity {
        UserIdentity::new(Sid::new("S-1-5-21-TEST"), Uuid::from_u128(0xabcd))
    }

    /// Records the destination capacity of each pack call.
    struct RecordingPacker {
        capacities: RefCell<Vec<usize>>,
        inner: InteractiveLogonPacker,
    }

    impl RecordingPacker {
        fn new() -> Self {
            Self {
                capacities: RefCell::new(Vec::new()),
                inner: InteractiveLogonPacker::new(7),
            }
        }
    }

    impl CredentialPacker for RecordingPacker {
        fn negotiate_package(&self) -> Result<u32, PackError> {
            self.inner.negotiate_package()
        }

        fn pack(&self, request: &PackRequest<'_>, dest: &mut [u8]) -> PackStep {
            self.capacities.borrow_mut().push(dest.len());
            self.inner.pack(request, dest)
        }
    }

    /// Reports a size in phase 1, then refuses to fill it.
    struct TornPacker;

    impl CredentialPacker for TornPacker {
        fn negotiate_package(&self) -> Result<u32, PackError> {
            Ok(1)
        }

        fn pack(&self, _request: &PackRequest<'_>, dest: &mut [u8]) -> PackStep {
            if dest.is_empty() {
                PackStep::InsufficientBuffer { required: 64 }
            } else {
                PackStep::Refused
            }
        }
    }

    struct NoPackagePacker;

    impl CredentialPacker for NoPackagePacker {
        fn negotiate_package(&self) -> Result<u32, PackError> {
            Err(PackError::NegotiationFailed)
        }

        fn pack(&self, _request: &PackRequest<'_>, _dest: &mut [u8]) -> PackStep {
            PackStep::Refused
        }
    }

    #[test]
    fn logon_runs_the_two_phase_protocol() {
        let packer = RecordingPacker::new();
        let identity = test_identity();
        let result = serialize(Scenario::Logon, Some(&identity), "1234", &packer);

        match &result.outcome {
            SerializeOutcome::Finished {
                blob,
                auth_package_id,
            } => {
                assert!(!blob.is_empty());
                assert_eq!(*auth_package_id, 7);
            }
            other => panic!("expected Finished, got {other:?}"),
        }

        // Phase 1 sees a zero-length destination, phase 2 exactly the
        // advertised requirement.
        let capacities = packer.capacities.borrow();
        assert_eq!(capacities.len(), 2);
        assert_eq!(capacities[0], 0);
        assert_eq!(capacities[1], result.blob_len() as usize);
    }

    #[test]
    fn v1_blob_layout_is_stable() {
        let packer = InteractiveLogonPacker::new(7);
        let identity = test_identity();
        let result = serialize(Scenario::UnlockWorkstation, Some(&identity), "ab", &packer);

        let SerializeOutcome::Finished { blob, .. } = &result.outcome else {
            panic!("expected Finished, got {:?}", result.outcome);
        };
        assert_eq!(&blob[..8], BLOB_MAGIC);
        assert_eq!(blob[8], BLOB_VERSION);

        let sid = identity.sid.as_str().as_bytes();
        let sid_len = u16::from_be_bytes([blob[9], blob[10]]) as usize;
        assert_eq!(sid_len, sid.len());
        assert_eq!(&blob[11..11 + sid_len], sid);

        let secret_offset = 11 + sid_len;
        let secret_len =
            u16::from_be_bytes([blob[secret_offset], blob[secret_offset + 1]]) as usize;
        assert_eq!(secret_len, 4); // "ab" in UTF-16-LE
        assert_eq!(&blob[secret_offset + 2..], b"a\0b\0");
    }

    #[test]
    fn missing_identity_fails_with_error_icon() {
        let packer = InteractiveLogonPacker::new(7);
        let result = serialize(Scenario::Logon, None, "1234", &packer);
        assert!(matches!(result.outcome, SerializeOutcome::Failed { .. }));
        assert_eq!(result.status_icon, StatusIcon::Error);
        assert!(!result.status_text.is_empty());
    }

    #[test]
    fn phase_two_failure_is_a_pack_failure() {
        let identity = test_identity();
        let result = serialize(Scenario::Logon, Some(&identity), "1234", &TornPacker);
        assert_eq!(
            result.outcome,
            SerializeOutcome::Failed {
                reason: "pack failure".to_string()
            }
        );
        assert_eq!(result.status_icon, StatusIcon::Error);
    }

    #[test]
    fn negotiation_failure_is_reported_not_thrown() {
        let identity = test_identity();
        let result = serialize(Scenario::Logon, Some(&identity), "1234", &NoPackagePacker);
        assert!(matches!(result.outcome, SerializeOutcome::Failed { .. }));
        assert_eq!(result.status_icon, StatusIcon::Error);
    }

    #[test]
    fn change_password_acknowledges_without_blob() {
        let packer = InteractiveLogonPacker::new(7);
        let result = serialize(Scenario::ChangePassword, None, "ignored", &packer);
        assert_eq!(
            result.outcome,
            SerializeOutcome::Finished {
                blob: Vec::new(),
                auth_package_id: 0
            }
        );
        assert_eq!(result.status_text, "password changed");
        assert_eq!(result.status_icon, StatusIcon::Success);
    }

    #[test]
    fn other_scenarios_defer_to_the_host() {
        let packer = InteractiveLogonPacker::new(7);
        for scenario in [Scenario::CredentialPrompt, Scenario::Invalid] {
            let identity = test_identity();
            let result = serialize(scenario, Some(&identity), "1234", &packer);
            assert_eq!(result.outcome, SerializeOutcome::NotFinished);
            assert_eq!(result.status_text, "");
            assert_eq!(result.status_icon, StatusIcon::None);
        }
    }

    #[test]
    fn oversized_secret_is_refused_in_phase_one() {
        let packer = InteractiveLogonPacker::new(7);
        let identity = test_identity();
        let secret = "x".repeat(MAX_SECRET_LEN); // doubles in UTF-16
        let result = serialize(Scenario::Logon, Some(&identity), &secret, &packer);
        assert_eq!(
            result.outcome,
            SerializeOutcome::Failed {
                reason: "buffer sizing failure".to_string()
            }
        );
    }
}
