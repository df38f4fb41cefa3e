use tokio::time::Duration;
use tracing::debug;

use crate::environment::EnvironmentHandle;
use crate::error::Error;
use crate::types::{ExecOutput, ExecutionOutcome};
use crate::workspace::{StagedSubmission, INPUT_FILE};

/// Exit code coreutils `timeout` reserves for a command it had to kill.
const TIMEOUT_EXIT_CODE: i32 = 124;

/// Whole seconds granted for `time_limit_ms`. The in-environment `timeout`
/// only has second granularity, so the limit is rounded UP (1500 ms grants
/// 2 s) and never under-granted. Minimum one second.
pub fn timeout_seconds(time_limit_ms: u64) -> u64 {
    time_limit_ms.div_ceil(1000).max(1)
}

/// Compiles and runs a staged submission inside its environment. One runner
/// works for every language; the differences live in the profile.
pub struct Runner {
    env: EnvironmentHandle,
    watchdog_grace: Duration,
    compile_timeout: Duration,
}

impl Runner {
    pub fn new(env: EnvironmentHandle, watchdog_grace: Duration, compile_timeout: Duration) -> Self {
        Self {
            env,
            watchdog_grace,
            compile_timeout,
        }
    }

    /// Language-level compilation, run once per submission and reused across
    /// test cases. `Ok(None)` means a clean build or nothing to compile;
    /// `Ok(Some(_))` is a compile_error outcome carrying the toolchain
    /// diagnostic. Execution must not proceed past a `Some`.
    pub async fn compile(
        &self,
        staged: &StagedSubmission,
    ) -> Result<Option<ExecutionOutcome>, Error> {
        let Some(compile_cmd) = self.env.profile.compile_cmd else {
            return Ok(None);
        };

        let script = format!("cd {} && {}", staged.env_dir, compile_cmd);
        debug!(id = %staged.id, "compiling: {}", compile_cmd);

        match self.env.exec(&script, self.compile_timeout).await {
            Ok(output) if output.exit_code == Some(0) => Ok(None),
            Ok(output) => {
                let diagnostic = if output.stderr.trim().is_empty() {
                    "Compilation failed".to_string()
                } else {
                    output.stderr
                };
                Ok(Some(ExecutionOutcome::compile_error(diagnostic)))
            }
            Err(Error::Timeout(_)) => Ok(Some(ExecutionOutcome::compile_error(
                "Compilation timed out".to_string(),
            ))),
            Err(e) => Err(e),
        }
    }

    /// Execute the staged program against the already-materialized input
    /// file, bounded by `time_limit_ms` of wall clock. Never fails: every
    /// failure mode is folded into the outcome classification.
    pub async fn run_case(&self, staged: &StagedSubmission, time_limit_ms: u64) -> ExecutionOutcome {
        let secs = timeout_seconds(time_limit_ms);
        let script = format!(
            "cd {} && timeout {}s {} < {}",
            staged.env_dir, secs, self.env.profile.run_cmd, INPUT_FILE
        );
        // The outer watchdog covers the case where the in-environment
        // `timeout` itself never comes back.
        let deadline = Duration::from_secs(secs) + self.watchdog_grace;

        match self.env.exec(&script, deadline).await {
            Ok(output) => classify(output),
            Err(Error::Timeout(_)) => ExecutionOutcome::time_limit_exceeded(),
            Err(e) => ExecutionOutcome::system_error(e.to_string()),
        }
    }
}

/// Map a raw process exit onto an outcome. Output is passed through
/// untouched; trimming happens at comparison time in the judge.
fn classify(output: ExecOutput) -> ExecutionOutcome {
    match output.exit_code {
        Some(0) => ExecutionOutcome::success(output.stdout, output.stderr),
        Some(TIMEOUT_EXIT_CODE) => ExecutionOutcome::time_limit_exceeded(),
        code => {
            let message = if output.stderr.trim().is_empty() {
                match code {
                    Some(c) => format!("Process exited with code {}", c),
                    None => "Process killed by signal".to_string(),
                }
            } else {
                output.stderr
            };
            ExecutionOutcome::runtime_error(message)
        }
    }
}
