//! Fingerprint Engine error types

use thiserror::Error;

/// Input-validation and keying failures of the Fingerprint Engine.
///
/// These are caller errors: the engine never catches them itself, they
/// propagate untouched to whoever initiated the attempt.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The biometric sample was empty or absent.
    #[error("biometric sample is required for fingerprint derivation")]
    EmptySample,

    /// The per-user salt was empty or absent.
    #[error("user salt is required for fingerprint derivation")]
    EmptySalt,

    /// The pepper could not key the underlying MAC.
    #[error("failed to key the fingerprint construction")]
    KeyInit,
}
