//! Comparison of presented secrets against stored credentials.
//!
//! Secrets are stored and compared in plaintext. This mirrors the account
//! data the server is deployed against and is a known security defect:
//! replacing it with a salted password hash requires migrating every
//! stored credential at once.

/// Verifies presented secrets against stored credential records.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialVerifier;

impl CredentialVerifier {
    /// Creates a new instance of the [`CredentialVerifier`] service.
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` when the presented secret matches the stored one.
    ///
    /// Two absent secrets match; exactly one absent secret never does.
    #[must_use]
    pub fn verify(&self, presented: Option<&str>, stored: Option<&str>) -> bool {
        match (presented, stored) {
            (None, None) => true,
            (Some(presented), Some(stored)) => presented == stored,
            _ => false,
        }
    }
}
