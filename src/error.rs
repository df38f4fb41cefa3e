use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Compilation failed: {0}")]
    Compilation(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("System error: {0}")]
    System(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
