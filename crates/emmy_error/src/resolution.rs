//! Identity resolver failures.

/// Why a resolver could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ResolutionErrorKind {
    /// The resolver has no record for the key
    #[display("No record found for '{}'", _0)]
    NotFound(String),
    /// The resolver failed for another reason
    #[display("Resolver failed: {}", _0)]
    Failed(String),
    /// The resolver gave up waiting on its backend
    #[display("Resolver timed out: {}", _0)]
    Timeout(String),
    /// The resolution was dropped before it produced a value
    #[display("Resolution abandoned for '{}'", _0)]
    Abandoned(String),
}

/// Resolver error with location tracking.
///
/// Cloneable so one failed resolution can be handed to every caller that was
/// waiting on it.
///
/// # Examples
///
/// ```
/// use emmy_error::{ResolutionError, ResolutionErrorKind};
///
/// let err = ResolutionError::new(ResolutionErrorKind::NotFound("Notch".to_string()));
/// assert!(!err.is_transient());
/// assert!(format!("{}", err).contains("Notch"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Resolution Error: {} at line {} in {}", kind, line, file)]
pub struct ResolutionError {
    /// The specific error condition
    pub kind: ResolutionErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ResolutionError {
    /// Create a new ResolutionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ResolutionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether retrying the same key later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ResolutionErrorKind::Failed(_)
                | ResolutionErrorKind::Timeout(_)
                | ResolutionErrorKind::Abandoned(_)
        )
    }
}
