//! Timing-strategy behavior, exercised through CLI probes.

use lc_attest::{CliPlan, Config, Outcome};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config() -> Arc<Config> {
    Arc::new(Config::new())
}

/// Immediate: `echo ok`, stdout matches, exactly one attempt.
#[tokio::test]
async fn test_immediate_single_attempt() {
    let verdict = CliPlan::command(config(), "echo")
        .arg("ok")
        .into_assert()
        .stdout_equals("ok\n")
        .await;

    assert_eq!(verdict.outcome, Outcome::Passed);
    assert_eq!(verdict.attempts, 1);
}

/// A non-zero exit is an observation, not an engine error.
#[tokio::test]
async fn test_immediate_nonzero_exit_fails_cleanly() {
    let verdict = CliPlan::command(config(), "false")
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Failed);
    assert_eq!(verdict.attempts, 1);
    assert!(verdict.last_observation.contains("exit code 1"));
}

/// A missing binary is an infrastructure fault, captured in the verdict.
#[tokio::test]
async fn test_missing_binary_fails_without_retrying() {
    let verdict = CliPlan::command(config(), "lc-no-such-binary")
        .eventually()
        .within(Duration::from_secs(5))
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Failed);
    assert_eq!(verdict.attempts, 1, "spawn failures must not be retried");
    assert!(verdict.last_observation.contains("failed to launch"));
}

/// Eventually: passes once the condition starts holding, well before the
/// window expires.
#[tokio::test]
async fn test_eventually_passes_when_condition_appears() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("ready");

    let marker_for_task = marker.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        std::fs::write(&marker_for_task, b"ready").expect("write marker");
    });

    let marker_path = marker.display().to_string();
    let verdict = CliPlan::command(config(), "test")
        .args(["-f", marker_path.as_str()])
        .eventually()
        .within(Duration::from_secs(2))
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Passed);
    assert!(verdict.attempts > 1, "success arrived late, attempts = {}", verdict.attempts);
    assert!(verdict.elapsed < Duration::from_secs(2));
}

/// Eventually: a predicate that never holds times out near the window.
#[tokio::test]
async fn test_eventually_times_out() {
    let verdict = CliPlan::command(config(), "false")
        .eventually()
        .within(Duration::from_millis(300))
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::TimedOut);
    assert!(verdict.attempts >= 1);
    assert!(
        verdict.elapsed < Duration::from_millis(800),
        "must not run far past the window, elapsed = {:?}",
        verdict.elapsed
    );
}

/// Eventually guarantees at least one attempt even with a zero window.
#[tokio::test]
async fn test_eventually_zero_window_still_probes_once() {
    let verdict = CliPlan::command(config(), "false")
        .eventually()
        .within(Duration::ZERO)
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::TimedOut);
    assert_eq!(verdict.attempts, 1);
}

/// Consistently: a condition that holds through the window passes, and the
/// check takes about the window.
#[tokio::test]
async fn test_consistently_holds_for_window() {
    let verdict = CliPlan::command(config(), "true")
        .consistently()
        .hold_for(Duration::from_millis(300))
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Passed);
    assert!(verdict.attempts > 1);
    assert!(verdict.elapsed >= Duration::from_millis(300));
}

/// Consistently fails fast on the first bad poll instead of waiting out the
/// window.
#[tokio::test]
async fn test_consistently_fails_fast() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("up");
    std::fs::write(&marker, b"up").expect("write marker");

    let marker_for_task = marker.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::remove_file(&marker_for_task).expect("remove marker");
    });

    let marker_path = marker.display().to_string();
    let verdict = CliPlan::command(config(), "test")
        .args(["-f", marker_path.as_str()])
        .consistently()
        .hold_for(Duration::from_secs(2))
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Failed);
    assert!(
        verdict.elapsed < Duration::from_secs(1),
        "should fail at the break, not after the window, elapsed = {:?}",
        verdict.elapsed
    );
}

/// Cancellation during Eventually yields Cancelled, not TimedOut, promptly.
#[tokio::test]
async fn test_eventually_cancellation_is_not_a_timeout() {
    let token = CancellationToken::new();
    let config = Arc::new(Config::new().with_cancellation(token.clone()));

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        cancel.cancel();
    });

    let verdict = CliPlan::command(config, "false")
        .eventually()
        .within(Duration::from_secs(10))
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Cancelled);
    assert!(
        verdict.elapsed < Duration::from_secs(1),
        "cancellation must be observed within about one poll interval, elapsed = {:?}",
        verdict.elapsed
    );
}

/// Cancellation during Consistently is symmetric.
#[tokio::test]
async fn test_consistently_cancellation_is_not_a_pass() {
    let token = CancellationToken::new();
    let config = Arc::new(Config::new().with_cancellation(token.clone()));

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        cancel.cancel();
    });

    let verdict = CliPlan::command(config, "true")
        .consistently()
        .hold_for(Duration::from_secs(10))
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Cancelled);
    assert!(verdict.elapsed < Duration::from_secs(1));
}

/// An already-cancelled token stops an Immediate check before the probe.
#[tokio::test]
async fn test_immediate_respects_prior_cancellation() {
    let token = CancellationToken::new();
    token.cancel();
    let config = Arc::new(Config::new().with_cancellation(token));

    let verdict = CliPlan::command(config, "echo")
        .arg("never runs")
        .into_assert()
        .succeeds()
        .await;

    assert_eq!(verdict.outcome, Outcome::Cancelled);
    assert_eq!(verdict.attempts, 0);
}

/// Plans sharing a config do not share probe state.
#[tokio::test]
async fn test_plans_are_independent() {
    let config = config();

    let ok = CliPlan::command(config.clone(), "echo")
        .arg("ok")
        .into_assert();
    let bad = CliPlan::command(config, "false").into_assert();

    let first = ok.stdout_equals("ok\n").await;
    let second = bad.succeeds().await;
    let third = ok.stdout_equals("ok\n").await;

    assert!(first.passed());
    assert!(!second.passed());
    assert!(third.passed(), "a failing sibling plan must not bleed over");
}
