//! Error types for the diagnostic engine
//!
//! Only operational failures are errors. Decode degradation, a log with no
//! recognisable failure and an unclassifiable match are all reported as data
//! inside the [`Report`](crate::report::Report) instead.

use std::path::PathBuf;

/// Operational failure that aborts a run
#[derive(Debug, thiserror::Error)]
pub enum DiagnoseError {
    /// Log file could not be read
    #[error("io error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendered output could not be written
    #[error("io error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operator supplied an encoding label nobody recognises
    #[error("unknown encoding label: '{0}'")]
    UnknownEncoding(String),

    /// Search keyword is not a valid regular expression
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Parameter value out of range or flag combination rejected
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration file unreadable or malformed
    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl DiagnoseError {
    /// Create read error for path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Create config error for path
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations
pub type DiagnoseResult<T> = Result<T, DiagnoseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_encoding_display() {
        let err = DiagnoseError::UnknownEncoding("klingon".to_string());
        assert_eq!(err.to_string(), "unknown encoding label: 'klingon'");
    }

    #[test]
    fn read_error_mentions_path() {
        let err = DiagnoseError::read(
            "/var/log/build.log",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let text = err.to_string();
        assert!(text.contains("/var/log/build.log"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn regex_error_converts() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: DiagnoseError = regex_err.into();
        assert!(matches!(err, DiagnoseError::InvalidPattern(_)));
    }
}
