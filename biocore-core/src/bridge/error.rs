//! Trust Bridge error types
//!
//! Transport failures are wrapped, never swallowed, and re-raised with the
//! original cause attached. No error payload ever carries biometric material.

use thiserror::Error;

/// Failure raised by a transport while submitting an envelope.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request never completed: connect failure, timeout, TLS error.
    #[error("trust kernel could not be reached")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The kernel answered outside its contract (error status, bad body).
    #[error("trust kernel replied outside its contract: {detail}")]
    Contract { detail: String },
}

/// Caller-facing failure of one authentication dispatch.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The kernel call could not complete. Security-relevant and fatal for
    /// this attempt; any retry is the caller's, bounded and explicit.
    #[error("critical: Safe Core connection could not be established")]
    KernelUnreachable(#[source] TransportError),

    /// The kernel explicitly denied the attempt. Fatal without new
    /// biometric input.
    #[error("Safe Core rejected the authentication attempt (status: {status})")]
    KernelRejected { status: String },
}

impl BridgeError {
    /// Log security-critical bridge errors under the security target.
    ///
    /// An unreachable kernel is reported as a security event, not retried
    /// silently: undetected retries against a security kernel risk replay
    /// and rate-limit abuse.
    pub fn log_if_security_critical(&self) {
        if let BridgeError::KernelUnreachable(_) = self {
            tracing::error!(target: "security", "KERNEL UNREACHABLE: {}", self);
        }
    }
}
