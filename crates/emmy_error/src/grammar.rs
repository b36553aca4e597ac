//! Registration-time errors.

/// Specific grammar registration and lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GrammarErrorKind {
    /// A path collides with an existing node that cannot be merged
    #[display("Duplicate command path: {}", _0)]
    DuplicateCommand(String),
    /// No node exists at the given path
    #[display("No command node at path: {}", _0)]
    NotFound(String),
    /// The node cannot be registered where it was placed
    #[display("Invalid registration: {}", _0)]
    InvalidRegistration(String),
}

/// Grammar error with location tracking.
///
/// Raised during the setup phase; callers are expected to abort startup.
///
/// # Examples
///
/// ```
/// use emmy_error::{GrammarError, GrammarErrorKind};
///
/// let err = GrammarError::new(GrammarErrorKind::NotFound("tp target".to_string()));
/// assert!(format!("{}", err).contains("tp target"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Grammar Error: {} at line {} in {}", kind, line, file)]
pub struct GrammarError {
    /// The specific error condition
    pub kind: GrammarErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GrammarError {
    /// Create a new GrammarError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GrammarErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
