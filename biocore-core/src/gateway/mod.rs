//! Caller-facing authentication pipeline
//!
//! One attempt walks liveness gate, fingerprint derivation, then kernel
//! dispatch. Liveness failure exits before any fingerprint work: it is a
//! hard precondition, not a kernel-side decision. Attempts are stateless
//! and independent; the only shared state is the read-only pepper inside
//! the engine.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bridge::{AuthContext, AuthResult, BridgeError, TrustBridge};
use crate::fingerprint::{FingerprintEngine, FingerprintError};

/// Inbound authentication request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BioAuthRequest {
    pub biometric_data: String,
    pub user_id: String,
    pub liveness_verified: bool,
}

/// Failure of one authentication attempt.
///
/// Each variant is a terminal state of the attempt: `LivenessFailed` is the
/// early exit, `InvalidInput` a caller error, and the bridge variants carry
/// the kernel-side outcomes.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Liveness was not attested; the attempt never reached the engine.
    /// The caller must re-attempt capture.
    #[error("liveness check failed; authentication aborted")]
    LivenessFailed,

    /// Missing sample or salt. Caller error, not retried.
    #[error("invalid authentication input")]
    InvalidInput(#[from] FingerprintError),

    /// Kernel unreachable or kernel rejection, per the bridge contract.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Orchestrates the verification pipeline for each attempt.
pub struct Gateway {
    engine: FingerprintEngine,
    bridge: TrustBridge,
}

impl Gateway {
    pub fn new(engine: FingerprintEngine, bridge: TrustBridge) -> Self {
        Self { engine, bridge }
    }

    /// Run one authentication attempt.
    ///
    /// # Errors
    ///
    /// `LivenessFailed` before any fingerprint work when liveness is not
    /// attested; `InvalidInput` for missing sample material; the bridge's
    /// `KernelUnreachable`/`KernelRejected` otherwise.
    pub async fn authenticate(&self, request: &BioAuthRequest) -> Result<AuthResult, AuthError> {
        if !request.liveness_verified {
            warn!(user_id = %request.user_id, "liveness gate rejected attempt");
            return Err(AuthError::LivenessFailed);
        }
        debug!(user_id = %request.user_id, "liveness verified; deriving fingerprint");

        let salt = user_salt(&request.user_id);
        let fingerprint = self.engine.generate(&request.biometric_data, &salt)?;
        info!(
            user_id = %request.user_id,
            fingerprint = fingerprint.preview(),
            "fingerprint derived"
        );

        let context = AuthContext {
            liveness: request.liveness_verified,
            user_id: request.user_id.clone(),
        };
        let verdict = self.bridge.authenticate(&fingerprint, context).await?;

        info!(user_id = %request.user_id, audit_id = %verdict.audit_id, "attempt authorized");
        Ok(verdict)
    }
}

/// Per-user salt for fingerprint derivation.
///
/// Enrollment issues the salt; until an enrollment store is wired in, it is
/// derived deterministically from the user id.
fn user_salt(user_id: &str) -> String {
    format!("salt_{user_id}")
}
