use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::environment::EnvironmentHandle;
use crate::error::Error;
use crate::languages::profile;
use crate::types::Language;

pub const INPUT_FILE: &str = "input.txt";

/// One submission's uniquely-named artifacts: a host-side staging directory
/// and its mirror inside the shared execution environment. The uuid is what
/// keeps concurrent submissions in the same environment from touching each
/// other's files.
#[derive(Debug, Clone)]
pub struct StagedSubmission {
    pub id: Uuid,
    pub language: Language,
    pub host_dir: PathBuf,
    pub env_dir: String,
}

impl StagedSubmission {
    pub fn source_path(&self) -> PathBuf {
        self.host_dir.join(profile(self.language).source_file)
    }

    pub fn input_path(&self) -> PathBuf {
        self.host_dir.join(INPUT_FILE)
    }

    pub fn env_input(&self) -> String {
        format!("{}/{}", self.env_dir, INPUT_FILE)
    }
}

/// Stages submissions on the host and mirrors them into execution
/// environments.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Write the submission source under a fresh unique directory. Languages
    /// with a fixed entry file name (Java's `Main.java`) get their isolation
    /// from the directory, not the file name.
    pub async fn stage(&self, language: Language, code: &str) -> Result<StagedSubmission, Error> {
        let id = Uuid::new_v4();
        let host_dir = self.root.join(format!("sub_{}", id));
        fs::create_dir_all(&host_dir).await?;

        let staged = StagedSubmission {
            id,
            language,
            host_dir,
            env_dir: format!("/sub_{}", id),
        };
        fs::write(staged.source_path(), code).await?;

        debug!(id = %id, dir = %staged.host_dir.display(), "staged submission");
        Ok(staged)
    }

    /// (Re)write the per-case stdin blob.
    pub async fn write_input(&self, staged: &StagedSubmission, input: &str) -> Result<(), Error> {
        fs::write(staged.input_path(), input).await?;
        Ok(())
    }

    /// Mirror the staged directory into the environment.
    pub async fn materialize(
        &self,
        staged: &StagedSubmission,
        env: &EnvironmentHandle,
    ) -> Result<(), Error> {
        env.copy_in(&staged.host_dir, &staged.env_dir).await
    }

    /// Push the current input file into the environment.
    pub async fn materialize_input(
        &self,
        staged: &StagedSubmission,
        env: &EnvironmentHandle,
    ) -> Result<(), Error> {
        env.copy_in(&staged.input_path(), &staged.env_input()).await
    }

    /// Best-effort teardown of both copies. Never fails and tolerates
    /// "already gone". The environment-side removal does not hold up the
    /// response path; the host-side removal is immediate.
    pub async fn cleanup(&self, staged: &StagedSubmission, env: &EnvironmentHandle) {
        let env = env.clone();
        let env_dir = staged.env_dir.clone();
        let id = staged.id;
        tokio::spawn(async move {
            if let Err(e) = env.remove_path(&env_dir).await {
                warn!(id = %id, "environment-side cleanup failed: {}", e);
            }
        });

        match fs::remove_dir_all(&staged.host_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(id = %staged.id, "host-side cleanup failed: {}", e),
        }
    }
}
