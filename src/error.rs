use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing the weight file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on weight file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid weight on line {line}: {value:?}")]
    Parse {
        line: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Weight file has {found} weights, expected {expected}")]
    WrongLength { expected: usize, found: usize },
}

/// Errors constructing or running the agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid agent configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type for agent construction and persistence.
pub type Result<T, E = AgentError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_length_display() {
        let e = PersistenceError::WrongLength {
            expected: 6,
            found: 4,
        };
        assert_eq!(e.to_string(), "Weight file has 4 weights, expected 6");
    }

    #[test]
    fn parse_error_display() {
        let source = "abc".parse::<f64>().unwrap_err();
        let e = PersistenceError::Parse {
            line: 3,
            value: "abc".into(),
            source,
        };
        assert_eq!(e.to_string(), "Invalid weight on line 3: \"abc\"");
    }

    #[test]
    fn persistence_converts_into_agent_error() {
        let e: AgentError = PersistenceError::WrongLength {
            expected: 6,
            found: 0,
        }
        .into();
        assert!(matches!(e, AgentError::Persistence(_)));
        assert_eq!(e.to_string(), "Weight file has 0 weights, expected 6");
    }
}
