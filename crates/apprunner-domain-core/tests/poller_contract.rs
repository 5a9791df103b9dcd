//! Contract Test: State Pollers
//!
//! Runs on paused time, so the five minute deadlines elapse instantly.
//!
//! Constraints verified:
//! - Create waits through `creating` and stops at certificate validation
//! - Delete waits through `active`/`deleting` until the domain is unlisted
//! - A status stuck in a pending state ends in Timeout with the last state
//! - A status outside both sets aborts the wait immediately
//!
//! If this test fails, create or delete can return before App Runner settles.

mod common;

use apprunner_domain_core::Error;
use apprunner_domain_core::waiter::{
    wait_custom_domain_association_created, wait_custom_domain_association_deleted,
};
use common::*;
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::assert_ok;

#[tokio::test(start_paused = true)]
async fn create_poller_stops_at_certificate_validation() {
    let api = MockAppRunnerApi::new().with_statuses(
        "example.com",
        &[
            Some("creating"),
            Some("creating"),
            Some("pending_certificate_dns_validation"),
        ],
    );

    let settled = assert_ok!(
        wait_custom_domain_association_created(&api, "example.com", SERVICE_ARN, &test_waiter())
            .await
    );

    let association = settled.expect("target state returns the association");
    assert_eq!(
        association.status().as_str(),
        "pending_certificate_dns_validation"
    );
    assert_eq!(association.custom_domain.domain_name, "example.com");
    assert_eq!(api.describe_call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn create_poller_times_out_when_stuck_creating() {
    let api = MockAppRunnerApi::new().with_statuses("example.com", &[Some("creating")]);
    let waiter = test_waiter();
    let started = Instant::now();

    let err = wait_custom_domain_association_created(&api, "example.com", SERVICE_ARN, &waiter)
        .await
        .unwrap_err();

    match err {
        Error::Timeout {
            expected,
            last_state,
            timeout,
        } => {
            assert_eq!(
                expected,
                vec!["pending_certificate_dns_validation", "binding_certificate"]
            );
            assert_eq!(last_state, "creating");
            assert_eq!(timeout, Duration::from_secs(300));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }

    assert!(started.elapsed() >= waiter.create_timeout());
    assert!(api.describe_call_count() > 2, "poller kept refreshing");
}

#[tokio::test(start_paused = true)]
async fn create_poller_rejects_unknown_status() {
    let api = MockAppRunnerApi::new()
        .with_statuses("example.com", &[Some("creating"), Some("create_failed")]);

    let err = wait_custom_domain_association_created(&api, "example.com", SERVICE_ARN, &test_waiter())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnexpectedState { ref state, .. } if state == "create_failed"));
    assert_eq!(api.describe_call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn create_poller_tolerates_brief_absence() {
    let api = MockAppRunnerApi::new().with_statuses(
        "example.com",
        &[None, None, Some("creating"), Some("binding_certificate")],
    );

    let settled = assert_ok!(
        wait_custom_domain_association_created(&api, "example.com", SERVICE_ARN, &test_waiter())
            .await
    );

    assert_eq!(
        settled.map(|association| association.status().as_str().to_string()),
        Some("binding_certificate".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn delete_poller_succeeds_once_unlisted() {
    let api = MockAppRunnerApi::new()
        .with_statuses("example.com", &[Some("active"), Some("deleting"), None]);

    let settled = assert_ok!(
        wait_custom_domain_association_deleted(&api, "example.com", SERVICE_ARN, &test_waiter())
            .await
    );

    assert!(settled.is_none());
    assert_eq!(api.describe_call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn delete_poller_succeeds_when_service_is_gone() {
    let api = MockAppRunnerApi::new().with_service_missing();

    let settled = assert_ok!(
        wait_custom_domain_association_deleted(&api, "example.com", SERVICE_ARN, &test_waiter())
            .await
    );

    assert!(settled.is_none());
    assert_eq!(api.describe_call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn delete_poller_times_out_when_stuck_active() {
    let api = MockAppRunnerApi::new().with_statuses("example.com", &[Some("active")]);
    let waiter = test_waiter();
    let started = Instant::now();

    let err = wait_custom_domain_association_deleted(&api, "example.com", SERVICE_ARN, &waiter)
        .await
        .unwrap_err();

    match err {
        Error::Timeout {
            expected,
            last_state,
            ..
        } => {
            assert!(expected.is_empty());
            assert_eq!(last_state, "active");
        }
        other => panic!("expected Timeout, got {other:?}"),
    }

    assert!(started.elapsed() >= waiter.delete_timeout());
}

#[tokio::test(start_paused = true)]
async fn create_poller_rejects_unrepresentable_timeout() {
    let api = MockAppRunnerApi::new().with_statuses("example.com", &[Some("creating")]);
    let waiter = apprunner_domain_core::WaiterConfig {
        create_timeout_secs: u64::MAX,
        ..test_waiter()
    };

    let err = wait_custom_domain_association_created(&api, "example.com", SERVICE_ARN, &waiter)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)), "got {err:?}");
    assert_eq!(api.describe_call_count(), 0);
}
