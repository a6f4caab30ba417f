use std::fmt;
use std::path::PathBuf;

/// Error taxonomy for log analysis
///
/// Missing fields and unknown mode codes are deliberately absent: both are
/// treated as data, never as failures.
#[derive(Debug)]
pub enum AnalyzerError {
    /// I/O errors while reading the log
    Io(std::io::Error),
    /// The record stream was exhausted before a required reference point
    EmptySource,
    /// Malformed log content with line context
    Parse { line: usize, message: String },
    /// Writing an output artifact failed
    Sink { path: PathBuf, message: String },
    /// A caller-supplied request could not be interpreted
    InvalidRequest(String),
    /// CSV writer errors
    #[cfg(feature = "csv")]
    Csv(csv::Error),
    /// JSON serialization errors
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

impl AnalyzerError {
    /// Wrap any displayable failure as a sink error for `path`
    pub fn sink(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        AnalyzerError::Sink {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::Io(err) => write!(f, "I/O error: {}", err),
            AnalyzerError::EmptySource => write!(f, "No timestamp available: log contains no records"),
            AnalyzerError::Parse { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            AnalyzerError::Sink { path, message } => {
                write!(f, "Failed to write {}: {}", path.display(), message)
            }
            AnalyzerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            #[cfg(feature = "csv")]
            AnalyzerError::Csv(err) => write!(f, "CSV error: {}", err),
            #[cfg(feature = "json")]
            AnalyzerError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for AnalyzerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyzerError::Io(err) => Some(err),
            #[cfg(feature = "csv")]
            AnalyzerError::Csv(err) => Some(err),
            #[cfg(feature = "json")]
            AnalyzerError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(err: std::io::Error) -> Self {
        AnalyzerError::Io(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for AnalyzerError {
    fn from(err: csv::Error) -> Self {
        AnalyzerError::Csv(err)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
