use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Python,
    Java,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Cpp, Language::Python, Language::Java];

    pub(crate) const fn index(self) -> usize {
        match self {
            Language::Cpp => 0,
            Language::Python => 1,
            Language::Java => 2,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpp" => Ok(Language::Cpp),
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Java => "java",
        };
        write!(f, "{}", name)
    }
}

/// A candidate submission, as handed over by the routing layer. Lives only for
/// the duration of one trial or grading call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub language: Language,
    pub code: String,
    /// Wall-clock budget per test case, in milliseconds. `None` resolves to
    /// the configured default.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
}

/// A single test case. Whether it is a visible sample or a hidden grading case
/// is decided by which judge entry point receives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Raw result of one command executed inside an environment: exit status plus
/// captured streams, untouched.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Classified result of one program invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    CompileError,
    RuntimeError,
    TimeLimitExceeded,
    SystemError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: ExecutionStatus,
    /// Raw stdout; trimming is the judge's concern.
    pub stdout: String,
    /// Raw stderr, or the diagnostic message for failed outcomes.
    pub stderr: String,
}

impl ExecutionOutcome {
    pub fn success(stdout: String, stderr: String) -> Self {
        Self {
            status: ExecutionStatus::Success,
            stdout,
            stderr,
        }
    }

    pub fn compile_error(diagnostic: String) -> Self {
        Self {
            status: ExecutionStatus::CompileError,
            stdout: String::new(),
            stderr: diagnostic,
        }
    }

    pub fn runtime_error(message: String) -> Self {
        Self {
            status: ExecutionStatus::RuntimeError,
            stdout: String::new(),
            stderr: message,
        }
    }

    pub fn time_limit_exceeded() -> Self {
        Self {
            status: ExecutionStatus::TimeLimitExceeded,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn system_error(message: String) -> Self {
        Self {
            status: ExecutionStatus::SystemError,
            stdout: String::new(),
            stderr: message,
        }
    }

    /// Candidate-facing text for this outcome: the program's stdout on
    /// success, the diagnostic otherwise.
    pub fn candidate_output(&self) -> &str {
        match self.status {
            ExecutionStatus::Success => &self.stdout,
            ExecutionStatus::TimeLimitExceeded => "Time Limit Exceeded",
            _ => &self.stderr,
        }
    }
}

/// Per-case record returned by a trial run against the visible sample cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialCaseResult {
    /// 1-based case number.
    pub test_case: usize,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub passed: bool,
}

/// Final grading classification. Serialized labels match what the exam UI
/// displays and the caller persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictLabel {
    Accepted,
    #[serde(rename = "Wrong Answer")]
    WrongAnswer,
    #[serde(rename = "Compilation Error")]
    CompilationError,
    #[serde(rename = "Time Limit Exceeded")]
    TimeLimitExceeded,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
    #[serde(rename = "Internal Error")]
    InternalError,
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerdictLabel::Accepted => "Accepted",
            VerdictLabel::WrongAnswer => "Wrong Answer",
            VerdictLabel::CompilationError => "Compilation Error",
            VerdictLabel::TimeLimitExceeded => "Time Limit Exceeded",
            VerdictLabel::RuntimeError => "Runtime Error",
            VerdictLabel::InternalError => "Internal Error",
        };
        write!(f, "{}", label)
    }
}

/// Result of grading a submission against its hidden test cases. The caller
/// persists this; the engine keeps nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub verdict: VerdictLabel,
    pub passed: usize,
    pub total: usize,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
