//! Process configuration - secrets and kernel connection settings
//!
//! Loaded once at startup and injected into the engine and bridge at
//! construction time; nothing reads configuration ad hoc from global state.
//! The pepper is required and has no fallback value: a default pepper would
//! make every deployment derive the same fingerprints.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fingerprint::SystemPepper;

/// Environment variable holding the system pepper.
pub const PEPPER_ENV: &str = "BIO_PEPPER";

/// Environment variable overriding the trust kernel endpoint.
pub const KERNEL_ENDPOINT_ENV: &str = "SAFE_CORE_URL";

/// Top-level BioCore configuration.
#[derive(Debug, Clone)]
pub struct BiocoreConfig {
    /// Process-wide fingerprint secret. Immutable for the process lifetime;
    /// rotating it invalidates every previously issued fingerprint.
    pub pepper: SystemPepper,

    /// Trust kernel connection settings.
    pub kernel: KernelConfig,
}

impl BiocoreConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `BIO_PEPPER` is not set.
    pub fn from_env() -> Result<Self> {
        let pepper = std::env::var(PEPPER_ENV).with_context(|| {
            format!("BioCore requires the {PEPPER_ENV} environment variable to be set")
        })?;

        let mut kernel = KernelConfig::default();
        if let Ok(endpoint) = std::env::var(KERNEL_ENDPOINT_ENV) {
            kernel.endpoint = endpoint;
        }

        Ok(Self {
            pepper: SystemPepper::new(pepper),
            kernel,
        })
    }
}

/// Trust kernel connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Endpoint receiving authentication envelopes.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable name containing the kernel credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Timeout for the outbound kernel call in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Application identifier stamped on every envelope.
    #[serde(default = "default_app_id")]
    pub app_id: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
            app_id: default_app_id(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000/api/safecore".to_string()
}

fn default_api_key_env() -> String {
    "BIOCORE_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_app_id() -> String {
    "BioCore-Identity-Module".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_kernel_config_defaults() {
        let config = KernelConfig::default();
        assert_eq!(config.endpoint, "http://localhost:5000/api/safecore");
        assert_eq!(config.api_key_env, "BIOCORE_API_KEY");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.app_id, "BioCore-Identity-Module");
    }

    #[test]
    fn test_kernel_config_deserializes_with_defaults() {
        let config: KernelConfig =
            serde_json::from_str(r#"{"endpoint": "https://safecore.internal/api"}"#).unwrap();
        assert_eq!(config.endpoint, "https://safecore.internal/api");
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    #[serial]
    fn test_from_env_requires_pepper() {
        std::env::remove_var(PEPPER_ENV);
        let err = BiocoreConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(PEPPER_ENV));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_pepper_and_endpoint() {
        std::env::set_var(PEPPER_ENV, "env-pepper");
        std::env::set_var(KERNEL_ENDPOINT_ENV, "https://safecore.example/api");
        let config = BiocoreConfig::from_env().unwrap();
        assert_eq!(config.kernel.endpoint, "https://safecore.example/api");
        std::env::remove_var(PEPPER_ENV);
        std::env::remove_var(KERNEL_ENDPOINT_ENV);
    }
}
