//! Event signature verification.

use subtle::ConstantTimeEq;

use crate::error::{WebhookError, WebhookResult};
use crate::event::EventHeader;

/// Environment variable consulted when no secret is passed explicitly.
pub const SECRET_ENV: &str = "FACEGATE_CLIENT_SECRET";

/// Verifies the sender of an event notification.
///
/// The provider signs each event as `hex(md5(secret || event_id))` and
/// declares the digest in the `hash` field. The digest covers the event id
/// only, not the body; that is the provider's scheme and strengthening it
/// here would break verification of genuine events.
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    /// Creates a verifier for a shared secret.
    ///
    /// An empty secret is a configuration error; the provider always issues
    /// a non-empty client secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> WebhookResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(WebhookError::Config("signature secret is empty".to_string()));
        }
        Ok(Self { secret })
    }

    /// Creates a verifier from the `FACEGATE_CLIENT_SECRET` environment
    /// variable.
    pub fn from_env() -> WebhookResult<Self> {
        match std::env::var(SECRET_ENV) {
            Ok(secret) if !secret.is_empty() => Self::new(secret.into_bytes()),
            _ => Err(WebhookError::Config(format!("{SECRET_ENV} is not set"))),
        }
    }

    /// Computes the hex digest the sender is expected to declare for an
    /// event id.
    pub fn expected_signature(&self, event_id: &str) -> String {
        let mut digest = md5::Context::new();
        digest.consume(&self.secret);
        digest.consume(event_id.as_bytes());
        hex::encode(digest.compute().0)
    }

    /// Checks the declared signature against the expected digest.
    ///
    /// Comparison is constant-time so response timing does not leak how much
    /// of a forged signature was correct; a length mismatch compares false.
    /// Matching is case-sensitive (the provider emits lowercase hex).
    pub fn verify(&self, header: &EventHeader) -> bool {
        let expected = self.expected_signature(&header.event_id);
        expected
            .as_bytes()
            .ct_eq(header.signature.as_bytes())
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ActionType;

    const SECRET: &str = "946b9654dcfc55342c55e533805cdba6";
    const EVENT_ID: &str = "c75570bb-dc1a-4192-946c-ed09a34f7d77";
    const SIGNATURE: &str = "a173b27d031519da1e0cc5468eb7b9f3";

    fn header(signature: &str) -> EventHeader {
        EventHeader {
            action: ActionType::Update,
            date: String::new(),
            keycode: String::new(),
            signature: signature.to_string(),
            event_id: EVENT_ID.to_string(),
            client_time_ms: 0,
        }
    }

    #[test]
    fn known_vector_matches() {
        let verifier = SignatureVerifier::new(SECRET).unwrap();
        assert_eq!(verifier.expected_signature(EVENT_ID), SIGNATURE);
        assert!(verifier.verify(&header(SIGNATURE)));
    }

    #[test]
    fn digest_is_deterministic() {
        let verifier = SignatureVerifier::new(SECRET).unwrap();
        assert_eq!(
            verifier.expected_signature(EVENT_ID),
            verifier.expected_signature(EVENT_ID)
        );
    }

    #[test]
    fn single_character_mutations_fail() {
        let verifier = SignatureVerifier::new(SECRET).unwrap();
        for i in 0..SIGNATURE.len() {
            let mut tampered = SIGNATURE.to_string().into_bytes();
            tampered[i] = if tampered[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(!verifier.verify(&header(&tampered)), "mutation at {i}");
        }
    }

    #[test]
    fn case_is_significant() {
        let verifier = SignatureVerifier::new(SECRET).unwrap();
        assert!(!verifier.verify(&header(&SIGNATURE.to_uppercase())));
    }

    #[test]
    fn length_mismatch_fails() {
        let verifier = SignatureVerifier::new(SECRET).unwrap();
        assert!(!verifier.verify(&header(&SIGNATURE[..10])));
        assert!(!verifier.verify(&header("")));
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert!(matches!(
            SignatureVerifier::new(Vec::new()),
            Err(WebhookError::Config(_))
        ));
    }
}
