use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Duration;
use tracing::{debug, error};

use crate::config::EngineConfig;
use crate::environment::{ContainerRuntime, DockerCli};
use crate::error::Error;
use crate::judge::Judge;
use crate::pool::EnvironmentPool;
use crate::runner::Runner;
use crate::types::{Language, Submission, TestCase, TrialCaseResult, Verdict, VerdictLabel};
use crate::workspace::Workspace;

/// Facade over the pool, workspace, and judge. One semaphore per language
/// bounds how many submissions share that language's warm environment at
/// once: the environment's CPU and memory ceiling is a shared envelope, and
/// the cap is what keeps one submission's workload from starving another's.
#[derive(Clone)]
pub struct JudgeService {
    inner: Arc<Inner>,
}

struct Inner {
    config: EngineConfig,
    pool: EnvironmentPool,
    workspace: Workspace,
    semaphores: [Arc<Semaphore>; 3],
}

impl JudgeService {
    /// Wire the service against the local docker daemon.
    pub fn new(config: EngineConfig) -> Result<Self, Error> {
        let runtime: Arc<dyn ContainerRuntime> = Arc::new(DockerCli::new()?);
        Self::with_runtime(config, runtime)
    }

    /// Wire the service against an arbitrary container runtime.
    pub fn with_runtime(
        config: EngineConfig,
        runtime: Arc<dyn ContainerRuntime>,
    ) -> Result<Self, Error> {
        let workspace = Workspace::new(&config.staging_root)?;
        let pool = EnvironmentPool::new(runtime);
        let limit = config.max_concurrent_per_language;
        let semaphores = Language::ALL.map(|_| Arc::new(Semaphore::new(limit)));

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                pool,
                workspace,
                semaphores,
            }),
        })
    }

    /// Bring every language's environment up. Intended for process startup;
    /// individual calls re-ensure readiness lazily either way.
    pub async fn warm_up(&self) -> Result<(), Error> {
        self.inner.pool.warm_up().await
    }

    pub fn available_slots(&self, language: Language) -> usize {
        self.inner.semaphores[language.index()].available_permits()
    }

    async fn acquire(&self, language: Language) -> Result<OwnedSemaphorePermit, Error> {
        debug!(%language, "waiting for execution slot");
        self.inner.semaphores[language.index()]
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| Error::System(format!("Failed to acquire execution permit: {}", e)))
    }

    async fn judge_for(&self, language: Language) -> Result<Judge, Error> {
        self.inner.pool.ensure_ready(language).await?;
        let env = self.inner.pool.handle(language);
        let runner = Runner::new(
            env.clone(),
            Duration::from_millis(self.inner.config.watchdog_grace_ms),
            Duration::from_millis(self.inner.config.compile_timeout_ms),
        );
        Ok(Judge::new(
            self.inner.workspace.clone(),
            env,
            runner,
            self.inner.config.default_time_limit_ms,
        ))
    }

    /// Run a submission against its visible sample cases.
    pub async fn trial_run(
        &self,
        submission: &Submission,
        sample_cases: &[TestCase],
    ) -> Result<Vec<TrialCaseResult>, Error> {
        let _permit = self.acquire(submission.language).await?;
        let judge = self.judge_for(submission.language).await?;
        let result = judge.trial_run(submission, sample_cases).await;
        if result.is_err() {
            // The environment may have died under us; re-probe next time.
            self.inner.pool.invalidate(submission.language).await;
        }
        result
    }

    /// Grade a submission against its hidden cases. Never fails: every
    /// infrastructure problem degrades to an `Internal Error` verdict.
    pub async fn grade(&self, submission: &Submission, hidden_cases: &[TestCase]) -> Verdict {
        let total = hidden_cases.len();

        let _permit = match self.acquire(submission.language).await {
            Ok(permit) => permit,
            Err(e) => return degraded_verdict(total, &e),
        };
        let judge = match self.judge_for(submission.language).await {
            Ok(judge) => judge,
            Err(e) => {
                error!(language = %submission.language, "environment unavailable: {}", e);
                return degraded_verdict(total, &e);
            }
        };

        let verdict = judge.grade(submission, hidden_cases).await;
        if verdict.verdict == VerdictLabel::InternalError {
            self.inner.pool.invalidate(submission.language).await;
        }
        verdict
    }
}

fn degraded_verdict(total: usize, e: &Error) -> Verdict {
    Verdict {
        verdict: VerdictLabel::InternalError,
        passed: 0,
        total,
        execution_time_ms: 0,
        error_message: Some(format!("Internal error: {}", e)),
    }
}
