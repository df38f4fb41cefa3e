//! # Judge Engine
//!
//! Sandboxed multi-language code execution and judging. Candidate-submitted
//! source is compiled and run against test cases inside long-lived, per-
//! language worker containers, under a wall-clock time limit, producing a
//! grading verdict. The engine is invoked synchronously per submission and
//! persists nothing; storing the verdict is the caller's responsibility.

mod config;
mod environment;
mod error;
mod judge;
mod languages;
mod pool;
mod runner;
mod service;
mod types;
mod workspace;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use environment::{ContainerRuntime, DockerCli, EnvironmentHandle};
pub use error::Error;
pub use judge::Judge;
pub use languages::{profile, LanguageProfile, PROFILES};
pub use pool::EnvironmentPool;
pub use runner::{timeout_seconds, Runner};
pub use service::JudgeService;
pub use types::{
    ExecOutput, ExecutionOutcome, ExecutionStatus, Language, Submission, TestCase, TrialCaseResult,
    Verdict, VerdictLabel,
};
pub use workspace::{StagedSubmission, Workspace};

/// Result type for judge-engine operations
pub type Result<T> = std::result::Result<T, Error>;
