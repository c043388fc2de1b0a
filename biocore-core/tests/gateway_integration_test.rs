//! Integration tests for the authentication pipeline end to end
//!
//! Every test injects a deterministic transport double behind the
//! `KernelTransport` contract; none relies on wall-clock delays or a live
//! kernel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use biocore_core::bridge::{
    AuthResult, Envelope, KernelTransport, StubKernelTransport, TransportError, TrustBridge,
};
use biocore_core::fingerprint::{FingerprintEngine, SystemPepper};
use biocore_core::gateway::{AuthError, BioAuthRequest, Gateway};

/// Wraps the stub kernel, counting submissions and capturing the last
/// envelope as it would appear on the wire.
struct RecordingTransport {
    submissions: Arc<AtomicUsize>,
    last_envelope: Arc<Mutex<Option<serde_json::Value>>>,
}

#[async_trait]
impl KernelTransport for RecordingTransport {
    async fn submit(&self, envelope: &Envelope) -> Result<AuthResult, TransportError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        *self.last_envelope.lock().unwrap() = Some(serde_json::to_value(envelope).unwrap());
        StubKernelTransport.submit(envelope).await
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct UnreachableTransport;

#[async_trait]
impl KernelTransport for UnreachableTransport {
    async fn submit(&self, _envelope: &Envelope) -> Result<AuthResult, TransportError> {
        Err(TransportError::Contract {
            detail: "connection refused".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

fn gateway_with(
    transport: Box<dyn KernelTransport>,
) -> Gateway {
    let engine = FingerprintEngine::new(SystemPepper::new("integration-test-pepper"));
    let bridge = TrustBridge::new(transport, "BioCore-Identity-Module");
    Gateway::new(engine, bridge)
}

fn recording_gateway() -> (Gateway, Arc<AtomicUsize>, Arc<Mutex<Option<serde_json::Value>>>) {
    let submissions = Arc::new(AtomicUsize::new(0));
    let last_envelope = Arc::new(Mutex::new(None));
    let gateway = gateway_with(Box::new(RecordingTransport {
        submissions: Arc::clone(&submissions),
        last_envelope: Arc::clone(&last_envelope),
    }));
    (gateway, submissions, last_envelope)
}

fn request(biometric_data: &str, user_id: &str, liveness_verified: bool) -> BioAuthRequest {
    BioAuthRequest {
        biometric_data: biometric_data.to_string(),
        user_id: user_id.to_string(),
        liveness_verified,
    }
}

#[tokio::test]
async fn test_end_to_end_authorization() {
    let (gateway, submissions, last_envelope) = recording_gateway();

    let verdict = gateway
        .authenticate(&request("face_scan_data_77821", "daniel_art_01", true))
        .await
        .unwrap();

    assert!(verdict.is_authorized());
    assert!(!verdict.token.is_empty());
    assert!(!verdict.audit_id.is_empty());
    assert_eq!(verdict.integrity_check, "passed");
    assert_eq!(submissions.load(Ordering::SeqCst), 1);

    let envelope = last_envelope.lock().unwrap().clone().unwrap();
    let fingerprint = envelope["fingerprint"].as_str().unwrap();
    assert_eq!(fingerprint.len(), 64);
    assert_eq!(envelope["context"]["userId"], "daniel_art_01");
    assert_eq!(envelope["context"]["liveness"], true);
    assert_eq!(envelope["appId"], "BioCore-Identity-Module");
    assert!(!envelope["timestamp"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_no_field_leaks_biometric_material() {
    let (gateway, _, last_envelope) = recording_gateway();
    let sample = "face_scan_data_77821";

    let verdict = gateway
        .authenticate(&request(sample, "daniel_art_01", true))
        .await
        .unwrap();

    for field in [
        &verdict.status,
        &verdict.token,
        &verdict.audit_id,
        &verdict.integrity_check,
    ] {
        assert!(!field.contains(sample));
    }
    let envelope = last_envelope.lock().unwrap().clone().unwrap();
    assert!(!envelope["fingerprint"].as_str().unwrap().contains(sample));
}

#[tokio::test]
async fn test_liveness_gate_blocks_before_any_dispatch() {
    let (gateway, submissions, _) = recording_gateway();

    let err = gateway
        .authenticate(&request("face_scan_data_77821", "daniel_art_01", false))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::LivenessFailed));
    assert_eq!(submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_sample_blocks_before_any_dispatch() {
    let (gateway, submissions, _) = recording_gateway();

    let err = gateway
        .authenticate(&request("", "daniel_art_01", true))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidInput(_)));
    assert_eq!(submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transport_failure_surfaces_as_unreachable_without_auth_payload() {
    let gateway = gateway_with(Box::new(UnreachableTransport));

    let result = gateway
        .authenticate(&request("face_scan_data_77821", "daniel_art_01", true))
        .await;

    match result {
        Err(AuthError::Bridge(biocore_core::bridge::BridgeError::KernelUnreachable(_))) => {}
        other => panic!("expected KernelUnreachable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_same_user_same_sample_yields_same_fingerprint_across_attempts() {
    let (gateway, _, last_envelope) = recording_gateway();
    let req = request("face_scan_data_77821", "daniel_art_01", true);

    gateway.authenticate(&req).await.unwrap();
    let first = last_envelope.lock().unwrap().clone().unwrap()["fingerprint"].clone();
    gateway.authenticate(&req).await.unwrap();
    let second = last_envelope.lock().unwrap().clone().unwrap()["fingerprint"].clone();

    assert_eq!(first, second);
}
