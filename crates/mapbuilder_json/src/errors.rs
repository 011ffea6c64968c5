#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
    #[error("Invalid JSON at position {position}: {message}")]
    Format { message: String, position: usize },
    #[error("RecursionLimit exceeded (limit {limit})")]
    DepthLimitExceeded { limit: usize },
    #[error("Input is empty")]
    EmptyInput,
    #[error("{token} called without a matching start")]
    UnbalancedWriter { token: &'static str },
    #[error("Cannot write non-finite number")]
    NonFiniteNumber,
    #[error("Cannot convert {found} to {expected}")]
    Conversion { expected: &'static str, found: &'static str },
}

impl JsonError {
    pub fn format(message: impl Into<String>, position: usize) -> Self {
        JsonError::Format {
            message: message.into(),
            position,
        }
    }
}

pub type JsonResult<T> = Result<T, JsonError>;
