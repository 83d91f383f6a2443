// ABOUTME: Tests for the health wait loop.
// ABOUTME: Covers the unhealthy-first tie-break, instance counting, and timeouts.

mod support;

use convoy::deploy::{DeployError, DeployErrorKind, HealthOutcome};
use serde_json::json;
use std::time::Duration;
use support::{Event, Harness, Verb, app_body, descriptor};

const APP: &str = "/v2/apps/foo";

#[tokio::test]
async fn no_health_checks_returns_immediately() {
    let harness = Harness::new();
    let app = descriptor("foo", 3);
    harness.gateway.on(
        Verb::Get,
        APP,
        200,
        json!({"app": {"id": "/foo", "instances": 3, "healthChecks": [], "tasks": []}}),
    );

    let outcome = harness.deployment(&app).wait_until_healthy().await.unwrap();

    assert_eq!(outcome, HealthOutcome::NoHealthChecks);
    assert_eq!(harness.gateway.count(Verb::Get, APP), 1);
    assert!(harness.clock.sleeps().is_empty());
    assert_eq!(harness.observer.events(), vec![Event::NoHealthChecks]);
}

#[tokio::test]
async fn succeeds_once_healthy_count_matches_instances() {
    let harness = Harness::new();
    let app = descriptor("foo", 3);
    harness
        .gateway
        .on(Verb::Get, APP, 200, app_body("foo", &[Some(true), Some(true)]))
        .on(
            Verb::Get,
            APP,
            200,
            app_body("foo", &[Some(true), Some(true), Some(true)]),
        );

    let outcome = harness.deployment(&app).wait_until_healthy().await.unwrap();

    match outcome {
        HealthOutcome::Healthy { tasks } => assert_eq!(tasks.len(), 3),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(harness.gateway.count(Verb::Get, APP), 2);
    assert_eq!(harness.clock.sleeps(), vec![Duration::from_secs(2)]);
    assert_eq!(
        harness.observer.events(),
        vec![Event::Partial(2), Event::Healthy(3)]
    );
}

#[tokio::test]
async fn unhealthy_task_blocks_success_even_with_enough_healthy() {
    let harness = Harness::new();
    let app = descriptor("foo", 2);
    harness.gateway.on(
        Verb::Get,
        APP,
        200,
        app_body("foo", &[Some(true), Some(true), Some(false)]),
    );

    let deployment = harness.deployment(&app);
    let err = deployment.wait_until_healthy().await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::HealthCheckTimeout);
    match err {
        DeployError::HealthCheckTimeout {
            elapsed,
            healthy,
            unhealthy,
            instances,
            ..
        } => {
            assert!(elapsed >= deployment.healthcheck_timeout());
            assert_eq!(healthy, 2);
            assert_eq!(unhealthy, 1);
            assert_eq!(instances, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(
        harness
            .observer
            .events()
            .iter()
            .all(|e| *e == Event::Unhealthy(vec!["foo.task2".to_string()]))
    );
}

#[tokio::test]
async fn unknown_liveness_is_ignored() {
    let harness = Harness::new();
    let app = descriptor("foo", 2);
    harness
        .gateway
        .on(Verb::Get, APP, 200, app_body("foo", &[Some(true), None, Some(true)]));

    let outcome = harness.deployment(&app).wait_until_healthy().await.unwrap();

    assert!(matches!(outcome, HealthOutcome::Healthy { ref tasks } if tasks.len() == 2));
}

#[tokio::test]
async fn more_healthy_than_instances_keeps_waiting() {
    let harness = Harness::new();
    let app = descriptor("foo", 1);
    harness
        .gateway
        .on(Verb::Get, APP, 200, app_body("foo", &[Some(true), Some(true)]))
        .on(Verb::Get, APP, 200, app_body("foo", &[Some(true)]));

    let outcome = harness.deployment(&app).wait_until_healthy().await.unwrap();

    assert!(matches!(outcome, HealthOutcome::Healthy { .. }));
    assert_eq!(harness.gateway.count(Verb::Get, APP), 2);
}

#[tokio::test]
async fn times_out_with_partial_health() {
    let harness = Harness::new();
    let app = descriptor("foo", 3);
    harness
        .gateway
        .on(Verb::Get, APP, 200, app_body("foo", &[Some(true)]));

    let deployment = harness.deployment(&app);
    let err = deployment.wait_until_healthy().await.unwrap_err();

    assert!(matches!(
        err,
        DeployError::HealthCheckTimeout { healthy: 1, unhealthy: 0, instances: 3, .. }
    ));
    assert_eq!(err.elapsed(), Some(deployment.healthcheck_timeout()));
    // 20s deadline, 2s interval: polls at 0,2,...,20
    assert_eq!(harness.gateway.count(Verb::Get, APP), 11);
}

#[tokio::test]
async fn empty_app_object_is_fatal_and_not_retried() {
    let harness = Harness::new();
    let app = descriptor("foo", 1);
    harness.gateway.on(Verb::Get, APP, 200, json!({"app": {}}));

    let err = harness.deployment(&app).wait_until_healthy().await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Deployment);
    assert_eq!(harness.gateway.count(Verb::Get, APP), 1);
    assert!(harness.clock.sleeps().is_empty());
}

#[tokio::test]
async fn missing_application_is_fatal() {
    let harness = Harness::new();
    let app = descriptor("foo", 1);

    let err = harness.deployment(&app).wait_until_healthy().await.unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::Deployment);
}
