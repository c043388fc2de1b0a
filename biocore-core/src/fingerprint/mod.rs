//! Fingerprint Engine - irreversible identity digests from biometric input
//!
//! Derives a stable, non-invertible fingerprint from a biometric sample, a
//! per-user salt, and the process-wide pepper. The construction is keyed and
//! length-prefixed rather than separator-joined, so no combination of field
//! contents can collide across field boundaries:
//!
//! ```text
//! seed   = HMAC-SHA256(pepper, len64(salt) || salt || len64(sample) || sample)
//! d[n]   = HMAC-SHA256(pepper, d[n-1])          for n in 1..=1000
//! output = hex(d[1000])
//! ```
//!
//! Every round is keyed by the pepper, so nothing about a fingerprint is
//! recomputable without it. The engine is a pure function of its inputs and
//! the injected pepper: no I/O, no clock, and no logging of input material.

pub mod error;

pub use error::FingerprintError;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Number of keyed stretching rounds applied after the seed digest.
///
/// A work factor trading brute-force resistance against latency. It must be
/// identical across every computation of the same fingerprint; changing it
/// invalidates all previously stored fingerprints, exactly like rotating the
/// pepper.
pub const STRETCH_ROUNDS: usize = 1000;

/// Process-wide secret mixed into every fingerprint computation.
///
/// Loaded once at startup, immutable for the process lifetime, zeroized on
/// drop. Its debug form is redacted; it must never reach logs or errors.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SystemPepper(String);

impl SystemPepper {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SystemPepper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SystemPepper(<redacted>)")
    }
}

/// Irreversible hex-encoded digest of `(salt, sample, pepper)`.
///
/// Deterministic for identical inputs, statistically unrelated under any
/// one-bit input change, and never mutated once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix safe for logging. The full value is opaque and
    /// irreversible, but logs only ever carry this preview.
    pub fn preview(&self) -> &str {
        &self.0[..self.0.len().min(10)]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The one-way hashing engine.
///
/// Owns the pepper/salt combination logic exclusively; everything downstream
/// of it only ever sees the already-irreversible fingerprint.
pub struct FingerprintEngine {
    pepper: SystemPepper,
}

impl FingerprintEngine {
    pub fn new(pepper: SystemPepper) -> Self {
        Self { pepper }
    }

    /// Derive the fingerprint for a biometric sample and its user salt.
    ///
    /// # Errors
    ///
    /// Returns `EmptySample` or `EmptySalt` when either input is missing.
    pub fn generate(&self, sample: &str, user_salt: &str) -> Result<Fingerprint, FingerprintError> {
        let mac = self.compute(sample, user_salt)?;
        Ok(Fingerprint(hex::encode(mac.finalize().into_bytes())))
    }

    /// Check a sample and salt against a previously stored fingerprint.
    ///
    /// Recomputes the fingerprint and compares in constant time via the
    /// MAC's own verification primitive. A malformed stored value compares
    /// unequal rather than erroring.
    pub fn verify(
        &self,
        sample: &str,
        user_salt: &str,
        stored: &str,
    ) -> Result<bool, FingerprintError> {
        let Ok(stored_bytes) = hex::decode(stored) else {
            return Ok(false);
        };
        let mac = self.compute(sample, user_salt)?;
        Ok(mac.verify_slice(&stored_bytes).is_ok())
    }

    /// Run the full construction, returning the final round's MAC before
    /// finalization so `verify` can use constant-time comparison.
    fn compute(&self, sample: &str, user_salt: &str) -> Result<HmacSha256, FingerprintError> {
        if sample.is_empty() {
            return Err(FingerprintError::EmptySample);
        }
        if user_salt.is_empty() {
            return Err(FingerprintError::EmptySalt);
        }

        let mut mac = self.keyed_mac()?;
        mac.update(&(user_salt.len() as u64).to_le_bytes());
        mac.update(user_salt.as_bytes());
        mac.update(&(sample.len() as u64).to_le_bytes());
        mac.update(sample.as_bytes());
        let mut digest = mac.finalize().into_bytes();

        for _ in 1..STRETCH_ROUNDS {
            let mut mac = self.keyed_mac()?;
            mac.update(digest.as_slice());
            digest = mac.finalize().into_bytes();
        }

        let mut mac = self.keyed_mac()?;
        mac.update(digest.as_slice());
        Ok(mac)
    }

    fn keyed_mac(&self) -> Result<HmacSha256, FingerprintError> {
        HmacSha256::new_from_slice(self.pepper.as_bytes()).map_err(|_| FingerprintError::KeyInit)
    }
}
