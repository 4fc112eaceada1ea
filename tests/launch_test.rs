// tests/launch_test.rs

mod common;

use std::sync::atomic::Ordering;

use common::StubApi;
use dorkx_monitor::core::error::LaunchError;
use dorkx_monitor::core::launch::{LaunchRequest, launch_scan};
use dorkx_monitor::core::models::{ScanProfile, TargetValidation};

fn request(target: &str, consent_accepted: bool) -> LaunchRequest {
    LaunchRequest {
        target: target.into(),
        profile: ScanProfile::Standard,
        consent_accepted,
        user_id: "anonymous".into(),
    }
}

#[tokio::test]
async fn test_consent_is_required_before_any_call() {
    let api = StubApi::default();

    let outcome = launch_scan(&api, &request("example.com", false)).await;

    assert!(matches!(outcome, Err(LaunchError::ConsentRequired)));
    assert_eq!(api.validate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_target_never_reaches_the_backend() {
    let api = StubApi::default();

    let outcome = launch_scan(&api, &request("not a domain", true)).await;

    assert!(matches!(outcome, Err(LaunchError::InvalidTarget { .. })));
    assert_eq!(api.validate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_server_rejection_reason_is_surfaced() {
    let api = StubApi::default();
    *api.validation.lock().unwrap() = Some(TargetValidation {
        valid: false,
        normalized_target: Some("gov.example".into()),
        reason: Some("Government domains require additional authorization".into()),
        warnings: Vec::new(),
    });

    let outcome = launch_scan(&api, &request("gov.example", true)).await;

    match outcome {
        Err(LaunchError::InvalidTarget { reason }) => {
            assert_eq!(reason, "Government domains require additional authorization")
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_normalized_target_from_the_server_is_used() {
    let api = StubApi::default();
    *api.validation.lock().unwrap() = Some(TargetValidation {
        valid: true,
        normalized_target: Some("shop.example.com".into()),
        reason: None,
        warnings: vec!["Subdomain scans may return fewer results".into()],
    });

    let scan = launch_scan(&api, &request("http://SHOP.example.com/", true)).await.unwrap();

    assert_eq!(scan.target_domain, "shop.example.com");
    let sent = api.created.lock().unwrap().clone().unwrap();
    assert!(sent.consent_accepted);
    assert_eq!(sent.scan_profile, ScanProfile::Standard);
}
