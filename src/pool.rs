use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::environment::{ContainerRuntime, EnvironmentHandle};
use crate::error::Error;
use crate::languages::{profile, PROFILES};
use crate::types::Language;

/// Liveness of one language's environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Absent,
    Starting,
    Ready,
}

/// Maintains one long-lived, reusable execution environment per supported
/// language. Environments are shared by every concurrent submission for that
/// language; the pool only manages their existence, never the work inside.
pub struct EnvironmentPool {
    runtime: Arc<dyn ContainerRuntime>,
    states: [Mutex<Liveness>; 3],
}

impl EnvironmentPool {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self {
            runtime,
            states: Language::ALL.map(|_| Mutex::new(Liveness::Absent)),
        }
    }

    pub fn handle(&self, language: Language) -> EnvironmentHandle {
        EnvironmentHandle {
            runtime: Arc::clone(&self.runtime),
            profile: profile(language),
        }
    }

    /// Idempotent and safe to call concurrently: a ready environment is left
    /// untouched, a stopped one is discarded and recreated, an absent one is
    /// created. The per-language mutex serializes racing callers so only one
    /// of them launches.
    pub async fn ensure_ready(&self, language: Language) -> Result<(), Error> {
        let profile = profile(language);
        let mut state = self.states[language.index()].lock().await;

        if *state == Liveness::Ready {
            return Ok(());
        }
        *state = Liveness::Starting;

        if self.runtime.is_running(profile.container).await? {
            *state = Liveness::Ready;
            return Ok(());
        }

        // A stopped container keeps its name reserved; discard it first.
        self.runtime.remove_container(profile.container).await?;

        info!(
            container = profile.container,
            image = profile.image,
            "starting execution environment"
        );
        match self.runtime.launch(profile).await {
            Ok(()) => {
                *state = Liveness::Ready;
                Ok(())
            }
            Err(e) => {
                *state = Liveness::Absent;
                error!(
                    container = profile.container,
                    "failed to start execution environment: {}", e
                );
                Err(e)
            }
        }
    }

    /// Drop the cached liveness for `language` so the next `ensure_ready`
    /// re-probes the container. Called when an execution reports the
    /// environment gone mid-flight.
    pub async fn invalidate(&self, language: Language) {
        *self.states[language.index()].lock().await = Liveness::Absent;
    }

    /// Startup sweep over every supported language. Failures are logged per
    /// language and collected into one error; the affected languages stay
    /// unavailable until a later `ensure_ready` succeeds.
    pub async fn warm_up(&self) -> Result<(), Error> {
        let mut failed = Vec::new();
        for entry in &PROFILES {
            if let Err(e) = self.ensure_ready(entry.language).await {
                warn!(
                    container = entry.container,
                    "environment unavailable after warm-up: {}", e
                );
                failed.push(entry.language);
            }
        }

        if failed.is_empty() {
            info!("all execution environments ready");
            Ok(())
        } else {
            let names: Vec<String> = failed.iter().map(|l| l.to_string()).collect();
            Err(Error::Environment(format!(
                "environments unavailable for: {}",
                names.join(", ")
            )))
        }
    }
}
