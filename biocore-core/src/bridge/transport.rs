//! Transport abstraction over the trust kernel boundary
//!
//! The kernel is a black box reachable over a network boundary: one request,
//! one response, bounded latency. This trait is the single capability the
//! bridge needs, letting the production HTTP transport and deterministic
//! test doubles share one contract.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::TransportError;
use super::types::{AuthResult, Envelope, STATUS_AUTHORIZED};

/// A single-operation capability: submit one envelope, receive the kernel's
/// verdict or a transport failure.
#[async_trait]
pub trait KernelTransport: Send + Sync {
    async fn submit(&self, envelope: &Envelope) -> Result<AuthResult, TransportError>;

    /// Transport identifier for logging.
    fn name(&self) -> &'static str;
}

/// Deterministic stand-in kernel that authorizes every envelope.
///
/// Useful for development runs and tests; no outbound calls and no
/// wall-clock delay.
pub struct StubKernelTransport;

#[async_trait]
impl KernelTransport for StubKernelTransport {
    async fn submit(&self, envelope: &Envelope) -> Result<AuthResult, TransportError> {
        let prefix = &envelope.fingerprint[..envelope.fingerprint.len().min(16)];
        Ok(AuthResult {
            status: STATUS_AUTHORIZED.to_string(),
            token: format!("sc_tok_{prefix}"),
            audit_id: format!("log_{}", Uuid::now_v7().simple()),
            integrity_check: "passed".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
