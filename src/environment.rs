use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::time::{self, Duration};
use tracing::debug;

use crate::{error::Error, languages::LanguageProfile, types::ExecOutput};

/// Process boundary to an execution environment. The data plane is exactly
/// three primitives: copy a file in, run a bounded command with captured
/// stdout/stderr/exit status, and remove a path. The remaining methods are
/// the lifecycle probes the pool needs.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn is_running(&self, container: &str) -> Result<bool, Error>;

    /// Remove a container so its name can be reused. Tolerates "no such
    /// container".
    async fn remove_container(&self, container: &str) -> Result<(), Error>;

    /// Start the long-lived worker container for `profile` with its resource
    /// ceiling and a keep-alive entrypoint.
    async fn launch(&self, profile: &LanguageProfile) -> Result<(), Error>;

    /// Copy a host file or directory into the container.
    async fn copy_in(&self, container: &str, host_path: &Path, dest: &str) -> Result<(), Error>;

    /// Run `script` through `bash -c` inside the container. `deadline` bounds
    /// the whole invocation; expiry surfaces as [`Error::Timeout`].
    async fn exec(
        &self,
        container: &str,
        script: &str,
        deadline: Duration,
    ) -> Result<ExecOutput, Error>;

    /// Delete a path inside the container. Tolerates "already gone".
    async fn remove_path(&self, container: &str, path: &str) -> Result<(), Error>;
}

/// Docker-CLI-backed runtime. Every operation shells out to the `docker`
/// binary resolved at construction time.
pub struct DockerCli {
    docker: PathBuf,
}

impl DockerCli {
    pub fn new() -> Result<Self, Error> {
        let docker = which::which("docker")
            .map_err(|_| Error::Environment("docker binary not found in PATH".to_string()))?;
        Ok(Self { docker })
    }

    async fn docker_output(&self, args: &[&str]) -> Result<std::process::Output, Error> {
        debug!("docker {}", args.join(" "));
        Command::new(&self.docker)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Environment(format!("Failed to invoke docker: {}", e)))
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn is_running(&self, container: &str) -> Result<bool, Error> {
        let filter = format!("name=^{}$", container);
        let output = self.docker_output(&["ps", "-q", "-f", &filter]).await?;
        Ok(output.status.success() && !String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }

    async fn remove_container(&self, container: &str) -> Result<(), Error> {
        // Non-zero exit here just means the container was already gone.
        let _ = self.docker_output(&["rm", "-f", container]).await?;
        Ok(())
    }

    async fn launch(&self, profile: &LanguageProfile) -> Result<(), Error> {
        let cpus = format!("--cpus={}", profile.cpus);
        let memory = format!("--memory={}", profile.memory);
        let output = self
            .docker_output(&[
                "run",
                "-d",
                "--name",
                profile.container,
                &cpus,
                &memory,
                profile.image,
                "tail",
                "-f",
                "/dev/null",
            ])
            .await?;

        if !output.status.success() {
            return Err(Error::Environment(format!(
                "Failed to start {}: {}",
                profile.container,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    async fn copy_in(&self, container: &str, host_path: &Path, dest: &str) -> Result<(), Error> {
        let host = host_path.to_string_lossy();
        let target = format!("{}:{}", container, dest);
        let output = self.docker_output(&["cp", host.as_ref(), &target]).await?;

        if !output.status.success() {
            return Err(Error::Environment(format!(
                "Failed to copy {} into {}: {}",
                host,
                container,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    async fn exec(
        &self,
        container: &str,
        script: &str,
        deadline: Duration,
    ) -> Result<ExecOutput, Error> {
        let args = ["exec", container, "bash", "-c", script];
        let exec = self.docker_output(&args);

        match time::timeout(deadline, exec).await {
            Ok(output) => {
                let output = output?;
                Ok(ExecOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            Err(_) => Err(Error::Timeout(deadline.as_secs())),
        }
    }

    async fn remove_path(&self, container: &str, path: &str) -> Result<(), Error> {
        let output = self
            .docker_output(&["exec", container, "rm", "-rf", path])
            .await?;

        if !output.status.success() {
            return Err(Error::Environment(format!(
                "Failed to remove {} in {}: {}",
                path,
                container,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Handle to one language's environment: the runtime plus the profile that
/// names the container inside it.
#[derive(Clone)]
pub struct EnvironmentHandle {
    pub runtime: Arc<dyn ContainerRuntime>,
    pub profile: &'static LanguageProfile,
}

impl EnvironmentHandle {
    pub async fn copy_in(&self, host_path: &Path, dest: &str) -> Result<(), Error> {
        self.runtime
            .copy_in(self.profile.container, host_path, dest)
            .await
    }

    pub async fn exec(&self, script: &str, deadline: Duration) -> Result<ExecOutput, Error> {
        self.runtime
            .exec(self.profile.container, script, deadline)
            .await
    }

    pub async fn remove_path(&self, path: &str) -> Result<(), Error> {
        self.runtime.remove_path(self.profile.container, path).await
    }
}
