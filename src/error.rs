// error.rs - Crate-wide error type

use thiserror::Error;

/// Errors raised while preparing or computing distance matrices
#[derive(Error, Debug)]
pub enum DistError {
    /// I/O errors (missing alignment, unwritable output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid model name, gap-count mode, parallelism, gamma shape, weights or format
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Stationary frequencies could not be estimated
    #[error("Estimation error: {message}")]
    Estimation { message: String },

    /// Rate matrix cannot be diagonalized in the real domain
    #[error("Degenerate model: {message}")]
    Degenerate { message: String },

    /// Malformed alignment (unequal lengths, unreadable records)
    #[error("Alignment error: {message}")]
    Alignment { message: String },

    /// Parse errors in auxiliary text inputs
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A single pairwise computation failed inside the matrix engine
    #[error("Distance between '{first}' and '{second}' failed: {source}")]
    Pair {
        first: String,
        second: String,
        #[source]
        source: Box<DistError>,
    },
}

/// Type alias for Results using DistError
pub type Result<T> = std::result::Result<T, DistError>;

impl DistError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn estimation(message: impl Into<String>) -> Self {
        Self::Estimation {
            message: message.into(),
        }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::Degenerate {
            message: message.into(),
        }
    }

    pub fn alignment(message: impl Into<String>) -> Self {
        Self::Alignment {
            message: message.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Wrap an error with the names of the sequence pair being compared
    pub fn pair(first: &str, second: &str, source: DistError) -> Self {
        Self::Pair {
            first: first.to_string(),
            second: second.to_string(),
            source: Box::new(source),
        }
    }

    /// True for errors the caller should report as a configuration problem
    pub fn is_config(&self) -> bool {
        matches!(self, DistError::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DistError::config("unknown model 'xyz'");
        assert_eq!(err.to_string(), "Configuration error: unknown model 'xyz'");
        assert!(err.is_config());

        let err = DistError::parse(3, "not a number");
        assert_eq!(err.to_string(), "Parse error at line 3: not a number");
        assert!(!err.is_config());
    }

    #[test]
    fn test_pair_keeps_source() {
        let err = DistError::pair("s1", "s2", DistError::alignment("length 9 != 10"));
        let text = err.to_string();
        assert!(text.contains("'s1'"));
        assert!(text.contains("'s2'"));
        assert!(text.contains("length 9 != 10"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
