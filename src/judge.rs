use std::time::Instant;
use tracing::{debug, error};

use crate::environment::EnvironmentHandle;
use crate::error::Error;
use crate::runner::Runner;
use crate::types::{
    ExecutionOutcome, ExecutionStatus, Submission, TestCase, TrialCaseResult, Verdict, VerdictLabel,
};
use crate::workspace::{StagedSubmission, Workspace};

/// Exact string equality after trimming surrounding whitespace on both sides.
/// Internal whitespace is significant.
fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

/// Drives a submission through its test cases and aggregates the result.
/// Holds no state across calls; one judge is built per request.
pub struct Judge {
    workspace: Workspace,
    env: EnvironmentHandle,
    runner: Runner,
    default_time_limit_ms: u64,
}

impl Judge {
    pub fn new(
        workspace: Workspace,
        env: EnvironmentHandle,
        runner: Runner,
        default_time_limit_ms: u64,
    ) -> Self {
        Self {
            workspace,
            env,
            runner,
            default_time_limit_ms,
        }
    }

    fn time_limit_ms(&self, submission: &Submission) -> u64 {
        submission.time_limit_ms.unwrap_or(self.default_time_limit_ms)
    }

    /// Stage, materialize, and compile once per submission. On `Err` the
    /// partial staging has already been cleaned up; on `Ok` the caller owns
    /// the staged set and must clean it up on every path.
    async fn prepare(
        &self,
        submission: &Submission,
    ) -> Result<(StagedSubmission, Option<ExecutionOutcome>), Error> {
        let staged = self
            .workspace
            .stage(submission.language, &submission.code)
            .await?;

        if let Err(e) = self.workspace.materialize(&staged, &self.env).await {
            self.workspace.cleanup(&staged, &self.env).await;
            return Err(e);
        }

        match self.runner.compile(&staged).await {
            Ok(compile_failure) => Ok((staged, compile_failure)),
            Err(e) => {
                self.workspace.cleanup(&staged, &self.env).await;
                Err(e)
            }
        }
    }

    /// Ship one case's stdin into the environment and run the program.
    async fn run_case(
        &self,
        staged: &StagedSubmission,
        input: &str,
        time_limit_ms: u64,
    ) -> Result<ExecutionOutcome, Error> {
        self.workspace.write_input(staged, input).await?;
        self.workspace.materialize_input(staged, &self.env).await?;
        Ok(self.runner.run_case(staged, time_limit_ms).await)
    }

    /// Run the visible sample cases and report each one independently. One
    /// failing case never fails the batch; infrastructure failure before any
    /// case can run surfaces as `Err`.
    pub async fn trial_run(
        &self,
        submission: &Submission,
        sample_cases: &[TestCase],
    ) -> Result<Vec<TrialCaseResult>, Error> {
        if sample_cases.is_empty() {
            return Ok(Vec::new());
        }

        let (staged, compile_failure) = self.prepare(submission).await?;
        let mut results = Vec::with_capacity(sample_cases.len());

        if let Some(outcome) = compile_failure {
            // Nothing runnable; every case reports the compiler diagnostic.
            for (index, case) in sample_cases.iter().enumerate() {
                results.push(TrialCaseResult {
                    test_case: index + 1,
                    input: case.input.clone(),
                    expected_output: case.expected_output.trim().to_string(),
                    actual_output: outcome.candidate_output().to_string(),
                    passed: false,
                });
            }
            self.workspace.cleanup(&staged, &self.env).await;
            return Ok(results);
        }

        let time_limit_ms = self.time_limit_ms(submission);
        for (index, case) in sample_cases.iter().enumerate() {
            let outcome = match self.run_case(&staged, &case.input, time_limit_ms).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.workspace.cleanup(&staged, &self.env).await;
                    return Err(e);
                }
            };

            let passed = outcome.status == ExecutionStatus::Success
                && outputs_match(&outcome.stdout, &case.expected_output);
            results.push(TrialCaseResult {
                test_case: index + 1,
                input: case.input.clone(),
                expected_output: case.expected_output.trim().to_string(),
                actual_output: outcome.candidate_output().trim().to_string(),
                passed,
            });
        }

        self.workspace.cleanup(&staged, &self.env).await;
        Ok(results)
    }

    /// Grade the submission against the hidden cases. Always returns a
    /// well-formed verdict, never an error: infrastructure failures degrade
    /// to `Internal Error`.
    ///
    /// Cases run strictly in order. The first timeout, runtime error, or
    /// system error stops the run; a wrong answer does not, and every remaining
    /// case still runs so the pass count stays accurate.
    pub async fn grade(&self, submission: &Submission, hidden_cases: &[TestCase]) -> Verdict {
        let started = Instant::now();
        let total = hidden_cases.len();

        // Nothing to check: vacuously accepted.
        if total == 0 {
            return Verdict {
                verdict: VerdictLabel::Accepted,
                passed: 0,
                total: 0,
                execution_time_ms: 0,
                error_message: None,
            };
        }

        let (staged, compile_failure) = match self.prepare(submission).await {
            Ok(prepared) => prepared,
            Err(e) => {
                error!("grading aborted while preparing submission: {}", e);
                return Verdict {
                    verdict: VerdictLabel::InternalError,
                    passed: 0,
                    total,
                    execution_time_ms: started.elapsed().as_millis() as u64,
                    error_message: Some(format!("Internal error: {}", e)),
                };
            }
        };

        if let Some(outcome) = compile_failure {
            self.workspace.cleanup(&staged, &self.env).await;
            return Verdict {
                verdict: VerdictLabel::CompilationError,
                passed: 0,
                total,
                execution_time_ms: started.elapsed().as_millis() as u64,
                error_message: Some(outcome.candidate_output().to_string()),
            };
        }

        let time_limit_ms = self.time_limit_ms(submission);
        let mut passed = 0;
        let mut any_mismatch = false;
        let mut early_verdict = None;
        let mut error_message = None;

        for (index, case) in hidden_cases.iter().enumerate() {
            let outcome = match self.run_case(&staged, &case.input, time_limit_ms).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(case = index + 1, "grading aborted: {}", e);
                    early_verdict = Some(VerdictLabel::InternalError);
                    error_message = Some(format!("Internal error: {}", e));
                    break;
                }
            };

            match outcome.status {
                ExecutionStatus::Success => {
                    if outputs_match(&outcome.stdout, &case.expected_output) {
                        passed += 1;
                    } else {
                        any_mismatch = true;
                    }
                    debug!(case = index + 1, passed, "case evaluated");
                }
                ExecutionStatus::TimeLimitExceeded => {
                    early_verdict = Some(VerdictLabel::TimeLimitExceeded);
                    break;
                }
                ExecutionStatus::RuntimeError => {
                    early_verdict = Some(VerdictLabel::RuntimeError);
                    error_message = Some(outcome.candidate_output().to_string());
                    break;
                }
                ExecutionStatus::CompileError | ExecutionStatus::SystemError => {
                    early_verdict = Some(VerdictLabel::InternalError);
                    error_message = Some(outcome.candidate_output().to_string());
                    break;
                }
            }
        }

        self.workspace.cleanup(&staged, &self.env).await;

        let verdict = early_verdict.unwrap_or(if any_mismatch {
            VerdictLabel::WrongAnswer
        } else {
            VerdictLabel::Accepted
        });

        Verdict {
            verdict,
            passed,
            total,
            execution_time_ms: started.elapsed().as_millis() as u64,
            error_message,
        }
    }
}
