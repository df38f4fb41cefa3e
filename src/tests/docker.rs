//! End-to-end tests against a real docker daemon. They create (and reuse)
//! the long-lived worker containers, so the first run pulls the language
//! images. Skipped entirely when docker is not installed.

use std::sync::OnceLock;

use super::fixtures::{cases, code_samples::*, submission};
use crate::config::EngineConfig;
use crate::service::JudgeService;
use crate::types::{Language, VerdictLabel};

fn docker_missing() -> bool {
    if which::which("docker").is_err() {
        eprintln!("Skipping test: docker not available");
        return true;
    }
    false
}

/// All docker tests share one service so the worker containers are created
/// exactly once per test run.
fn shared_service() -> JudgeService {
    static SERVICE: OnceLock<JudgeService> = OnceLock::new();
    SERVICE
        .get_or_init(|| JudgeService::new(EngineConfig::default()).expect("docker available"))
        .clone()
}

#[tokio::test]
async fn python_grading_round_trip() {
    if docker_missing() {
        return;
    }
    let service = shared_service();

    let verdict = service
        .grade(
            &submission(Language::Python, PYTHON_SUM),
            &cases(&[("1 2", "3"), ("10 20", "30")]),
        )
        .await;

    assert_eq!(verdict.verdict, VerdictLabel::Accepted);
    assert_eq!((verdict.passed, verdict.total), (2, 2));
}

#[tokio::test]
async fn cpp_grading_round_trip() {
    if docker_missing() {
        return;
    }
    let service = shared_service();

    let verdict = service
        .grade(
            &submission(Language::Cpp, CPP_SUM),
            &cases(&[("1 2", "3"), ("40 2", "42")]),
        )
        .await;

    assert_eq!(verdict.verdict, VerdictLabel::Accepted);
    assert_eq!((verdict.passed, verdict.total), (2, 2));
}

#[tokio::test]
async fn java_grading_round_trip() {
    if docker_missing() {
        return;
    }
    let service = shared_service();

    let verdict = service
        .grade(
            &submission(Language::Java, JAVA_SUM),
            &cases(&[("1 2", "3")]),
        )
        .await;

    assert_eq!(verdict.verdict, VerdictLabel::Accepted);
    assert_eq!((verdict.passed, verdict.total), (1, 1));
}

#[tokio::test]
async fn cpp_compile_error_round_trip() {
    if docker_missing() {
        return;
    }
    let service = shared_service();

    let verdict = service
        .grade(
            &submission(Language::Cpp, CPP_BAD_SYNTAX),
            &cases(&[("", "whatever")]),
        )
        .await;

    assert_eq!(verdict.verdict, VerdictLabel::CompilationError);
    assert_eq!((verdict.passed, verdict.total), (0, 1));
    assert!(verdict.error_message.is_some());
}

#[tokio::test]
async fn python_time_limit_round_trip() {
    if docker_missing() {
        return;
    }
    let service = shared_service();

    let mut sub = submission(Language::Python, PYTHON_SLEEP);
    sub.time_limit_ms = Some(1_000);
    let verdict = service.grade(&sub, &cases(&[("", "done")])).await;

    assert_eq!(verdict.verdict, VerdictLabel::TimeLimitExceeded);
    assert_eq!((verdict.passed, verdict.total), (0, 1));
}

#[tokio::test]
async fn python_trial_run_round_trip() {
    if docker_missing() {
        return;
    }
    let service = shared_service();

    let results = service
        .trial_run(
            &submission(Language::Python, PYTHON_SUM),
            &cases(&[("1 2", "3"), ("1 2", "4")]),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].passed);
    assert!(!results[1].passed);
    assert_eq!(results[1].actual_output, "3");
}
