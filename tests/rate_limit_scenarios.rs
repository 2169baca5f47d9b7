//! End-to-end runs against an in-process mock comment service.

use std::net::SocketAddr;

use rate_probe::config::{HarnessConfig, LoginConfig, TokenFormat};
use rate_probe::lifecycle::{prepare, StartupError};
use rate_probe::probe::auth::AuthError;
use rate_probe::probe::{ProbeOutcome, ProbeRecord};
use rate_probe::run::StopReason;
use rate_probe::Shutdown;

mod common;

fn config_for(addr: SocketAddr, count: u32, expected: u32) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.target.base_url = format!("http://{}", addr);
    config.probe.count = count;
    config.probe.expected_success = expected;
    config.pacing.interval_ms = 2;
    config.timeouts.connect_secs = 2;
    config.timeouts.request_secs = 5;
    config
}

#[tokio::test]
async fn test_fresh_quota_splits_exactly() {
    let (addr, log) = common::start_comment_service(60, None).await;
    let config = config_for(addr, 70, 60);

    let orchestrator = prepare(&config).await.unwrap();
    let report = orchestrator.run(Shutdown::new().subscribe()).await;

    assert_eq!(report.counters.success_count, 60);
    assert_eq!(report.counters.rate_limited_count, 10);
    assert_eq!(report.counters.failure_count, 10);
    assert_eq!(report.issued, 70);
    assert!(report.passed, "{:?}", report.mismatches);
    assert_eq!(log.accepted(), 60);
    assert_eq!(log.distinct_request_ids(), 70);
}

#[tokio::test]
async fn test_bad_credentials_fail_every_probe() {
    let (addr, _log) = common::start_comment_service(60, Some("Bearer good-token".into())).await;
    let mut config = config_for(addr, 70, 60);
    config.pacing.interval_ms = 0;
    config.auth.token = Some("stale-token".into());

    let report = prepare(&config).await.unwrap().run(Shutdown::new().subscribe()).await;

    assert_eq!(report.counters.success_count, 0);
    assert_eq!(report.counters.unauthorized_count, 70);
    assert_eq!(report.counters.failure_count, 70);
    assert_eq!(report.counters.rate_limited_count, 0);
    assert!(!report.passed);
}

#[tokio::test]
async fn test_unreachable_service_yields_transport_errors() {
    let addr = common::unreachable_addr().await;
    let config = config_for(addr, 5, 5);

    let mut records = Vec::new();
    let report = prepare(&config)
        .await
        .unwrap()
        .run_observed(Shutdown::new().subscribe(), |r| records.push(r.clone()))
        .await;

    assert_eq!(report.counters.success_count, 0);
    assert_eq!(report.counters.transport_error_count, 5);
    assert_eq!(report.counters.failure_count, 5);
    assert!(!report.passed);
    assert!(records
        .iter()
        .all(|r| matches!(r.outcome, ProbeOutcome::TransportError { .. })));
}

#[tokio::test]
async fn test_unpaced_burst_still_accounts_for_every_probe() {
    let (addr, log) = common::start_comment_service(12, None).await;
    let mut config = config_for(addr, 40, 12);
    config.pacing.interval_ms = 0;

    let report = prepare(&config).await.unwrap().run(Shutdown::new().subscribe()).await;

    assert_eq!(report.counters.total(), 40);
    assert_eq!(report.counters.success_count, 12);
    assert_eq!(report.counters.rate_limited_count, 28);
    assert!(report.passed, "{:?}", report.mismatches);
    assert_eq!(log.bodies().len(), 40);
}

#[tokio::test]
async fn test_login_then_json_envelope_token() {
    let expected_header = format!(r#"Bearer {{"token":"{}"}}"#, common::ISSUED_TOKEN);
    let (addr, _log) = common::start_comment_service(3, Some(expected_header)).await;
    let mut config = config_for(addr, 5, 3);
    config.auth.token_format = TokenFormat::JsonEnvelope;
    config.auth.login = Some(LoginConfig {
        path: common::LOGIN_PATH.into(),
        email: common::LOGIN_EMAIL.into(),
        password: common::LOGIN_PASSWORD.into(),
    });

    let report = prepare(&config).await.unwrap().run(Shutdown::new().subscribe()).await;

    assert_eq!(report.counters.success_count, 3);
    assert_eq!(report.counters.rate_limited_count, 2);
    assert_eq!(report.counters.unauthorized_count, 0);
    assert!(report.passed);
}

#[tokio::test]
async fn test_rejected_login_aborts_before_probing() {
    let (addr, log) = common::start_comment_service(3, None).await;
    let mut config = config_for(addr, 5, 3);
    config.auth.login = Some(LoginConfig {
        path: common::LOGIN_PATH.into(),
        email: common::LOGIN_EMAIL.into(),
        password: "wrong".into(),
    });

    let err = match prepare(&config).await {
        Ok(_) => panic!("login with wrong password should fail"),
        Err(e) => e,
    };
    assert!(matches!(
        err,
        StartupError::Auth(AuthError::Rejected { status: 401, .. })
    ));
    assert!(log.bodies().is_empty());
}

#[tokio::test]
async fn test_other_status_keeps_body_snippet() {
    let addr = common::start_fixed_status_service(503, "maintenance window in progress").await;
    let mut config = config_for(addr, 3, 0);
    config.target.path = "/anything".into();
    config.probe.body_snippet_bytes = 11;

    let mut records: Vec<ProbeRecord> = Vec::new();
    let report = prepare(&config)
        .await
        .unwrap()
        .run_observed(Shutdown::new().subscribe(), |r| records.push(r.clone()))
        .await;

    assert_eq!(report.counters.other_failure_count, 3);
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(
            record.outcome,
            ProbeOutcome::OtherFailure {
                status: 503,
                body: "maintenance".into()
            }
        );
    }
    // Zero successes were expected but none of the failures were 429s.
    assert!(!report.passed);
}

#[tokio::test]
async fn test_large_error_body_is_cut_to_snippet() {
    let body = format!("é{}", "x".repeat(4 * 1024 * 1024));
    let addr = common::start_fixed_status_service(500, body).await;
    let mut config = config_for(addr, 2, 0);
    config.target.path = "/anything".into();
    // One byte into the two-byte 'é', so nothing decodable survives.
    config.probe.body_snippet_bytes = 1;

    let mut records: Vec<ProbeRecord> = Vec::new();
    prepare(&config)
        .await
        .unwrap()
        .run_observed(Shutdown::new().subscribe(), |r| records.push(r.clone()))
        .await;

    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(
            record.outcome,
            ProbeOutcome::OtherFailure {
                status: 500,
                body: String::new()
            }
        );
    }
}

#[tokio::test]
async fn test_large_success_body_is_not_kept() {
    let addr = common::start_fixed_status_service(200, "y".repeat(1024 * 1024)).await;
    let mut config = config_for(addr, 3, 3);
    config.target.path = "/anything".into();

    let report = prepare(&config).await.unwrap().run(Shutdown::new().subscribe()).await;

    assert_eq!(report.counters.success_count, 3);
    assert!(report.passed, "{:?}", report.mismatches);
}

#[tokio::test]
async fn test_halt_on_first_rate_limit() {
    let (addr, log) = common::start_comment_service(5, None).await;
    let mut config = config_for(addr, 70, 5);
    config.pacing.interval_ms = 20;
    config.run.halt_on_rate_limit = true;

    let report = prepare(&config).await.unwrap().run(Shutdown::new().subscribe()).await;

    assert_eq!(report.stop_reason, Some(StopReason::RateLimitObserved));
    assert!(report.issued < 70);
    assert_eq!(report.counters.success_count, 5);
    assert!(report.counters.rate_limited_count >= 1);
    assert_eq!(report.counters.total(), report.issued);
    assert_eq!(log.accepted(), 5);
    assert!(report.passed, "{:?}", report.mismatches);
}

#[tokio::test]
async fn test_payload_shape() {
    let (addr, log) = common::start_comment_service(10, None).await;
    let mut config = config_for(addr, 2, 2);
    config.probe.post_id = 9;
    config.probe.user_id = 4;

    let report = prepare(&config).await.unwrap().run(Shutdown::new().subscribe()).await;
    assert!(report.passed);

    let mut texts: Vec<String> = log
        .bodies()
        .iter()
        .map(|b| {
            assert_eq!(b["post_id"], 9);
            assert_eq!(b["user_id"], 4);
            b["text"].as_str().unwrap().to_string()
        })
        .collect();
    texts.sort();
    assert_eq!(texts, vec!["Test comment 1", "Test comment 2"]);
}
