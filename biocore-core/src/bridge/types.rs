//! Wire contract between the bridge and the Safe Core trust kernel
//!
//! These types define the request/response boundary. Everything the kernel
//! returns is treated as an opaque string; its internal structure belongs to
//! the kernel.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// Kernel status value meaning the attempt was authorized.
pub const STATUS_AUTHORIZED: &str = "authorized";

/// Authentication context attached to a request envelope.
///
/// Travels alongside the fingerprint but is never mixed into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub liveness: bool,
    pub user_id: String,
}

/// Request envelope dispatched to the trust kernel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub fingerprint: String,
    pub context: AuthContext,
    pub timestamp: String,
    pub app_id: String,
}

impl Envelope {
    /// Build an envelope, stamping the timestamp at send time so kernel-side
    /// replay detection sees dispatch time, not fingerprint-compute time.
    pub fn new(fingerprint: &Fingerprint, context: AuthContext, app_id: &str) -> Self {
        Self {
            fingerprint: fingerprint.as_str().to_owned(),
            context,
            timestamp: Utc::now().to_rfc3339(),
            app_id: app_id.to_owned(),
        }
    }
}

/// Authorization verdict returned by the trust kernel.
///
/// All fields are opaque to this crate; the bridge only inspects `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub status: String,
    pub token: String,
    pub audit_id: String,
    pub integrity_check: String,
}

impl AuthResult {
    pub fn is_authorized(&self) -> bool {
        self.status == STATUS_AUTHORIZED
    }
}
