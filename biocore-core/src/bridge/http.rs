//! HTTP transport for the trust kernel
//!
//! One POST per attempt against the configured endpoint: JSON envelope out,
//! JSON verdict back, timeout baked into the client at construction.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::TransportError;
use super::transport::KernelTransport;
use super::types::{AuthResult, Envelope};
use crate::config::KernelConfig;

/// HTTP client for the Safe Core endpoint.
pub struct HttpKernelTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpKernelTransport {
    /// Build the transport from kernel configuration.
    ///
    /// Reads the kernel credential from the environment variable named in
    /// the config; a missing credential is a construction-time error, not a
    /// per-request one.
    pub fn new(config: &KernelConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).with_context(|| {
            format!(
                "trust kernel credential requires {} environment variable to be set",
                config.api_key_env
            )
        })?;

        // Clamp to a floor so a misconfigured zero doesn't disable the bound
        const MIN_TIMEOUT_SECONDS: u64 = 1;
        let timeout_seconds = if config.timeout_seconds < MIN_TIMEOUT_SECONDS {
            warn!(
                "Configured timeout_seconds={} is too low; using minimum of {} seconds",
                config.timeout_seconds, MIN_TIMEOUT_SECONDS
            );
            MIN_TIMEOUT_SECONDS
        } else {
            config.timeout_seconds
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl KernelTransport for HttpKernelTransport {
    async fn submit(&self, envelope: &Envelope) -> Result<AuthResult, TransportError> {
        debug!(endpoint = %self.endpoint, "submitting envelope to trust kernel");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(envelope)
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Trust kernel HTTP error: {} - {}", status, body);
            return Err(TransportError::Contract {
                detail: format!("{status} - {body}"),
            });
        }

        let verdict: AuthResult = response.json().await.map_err(|e| {
            TransportError::Contract {
                detail: format!("unparseable kernel response: {e}"),
            }
        })?;

        Ok(verdict)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
