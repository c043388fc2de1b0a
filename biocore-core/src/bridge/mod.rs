//! Trust Bridge - authenticates fingerprints against the Safe Core kernel
//!
//! Consumes an already-irreversible fingerprint plus authentication context,
//! wraps them in a request envelope, dispatches it through the injected
//! transport, and normalizes the kernel's verdict or the transport's failure
//! into a caller-facing result. Raw biometric data never crosses this
//! boundary, so nothing downstream of the bridge can leak it.

pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use error::{BridgeError, TransportError};
pub use http::HttpKernelTransport;
pub use transport::{KernelTransport, StubKernelTransport};
pub use types::{AuthContext, AuthResult, Envelope};

use tracing::{debug, warn};

use crate::fingerprint::Fingerprint;

/// Bridge between the verification pipeline and the trust kernel.
pub struct TrustBridge {
    transport: Box<dyn KernelTransport>,
    app_id: String,
}

impl TrustBridge {
    pub fn new(transport: Box<dyn KernelTransport>, app_id: impl Into<String>) -> Self {
        Self {
            transport,
            app_id: app_id.into(),
        }
    }

    /// Authenticate a fingerprint with the trust kernel.
    ///
    /// Issues exactly one outbound call; there is no retry here. Retrying
    /// against a security kernel must stay an explicit, bounded caller
    /// decision.
    ///
    /// # Errors
    ///
    /// `KernelUnreachable` when the call cannot complete, `KernelRejected`
    /// when the kernel returns a non-authorized status.
    pub async fn authenticate(
        &self,
        fingerprint: &Fingerprint,
        context: AuthContext,
    ) -> Result<AuthResult, BridgeError> {
        let envelope = Envelope::new(fingerprint, context, &self.app_id);

        debug!(
            transport = self.transport.name(),
            fingerprint = fingerprint.preview(),
            "dispatching authentication envelope"
        );

        let verdict = self.transport.submit(&envelope).await.map_err(|e| {
            let err = BridgeError::KernelUnreachable(e);
            err.log_if_security_critical();
            err
        })?;

        if !verdict.is_authorized() {
            warn!(status = %verdict.status, "trust kernel rejected authentication attempt");
            return Err(BridgeError::KernelRejected {
                status: verdict.status,
            });
        }

        debug!(audit_id = %verdict.audit_id, "trust kernel authorized attempt");
        Ok(verdict)
    }
}
