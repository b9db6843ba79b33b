
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuaestorError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize> },
    #[error("Compilation error: {0}")]
    Compilation(String),
    #[error("Execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, QuaestorError>;
