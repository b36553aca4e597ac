//! Permission errors.

/// Raised when a permission predicate on the matched path rejects the executor.
///
/// # Examples
///
/// ```
/// use emmy_error::PermissionDeniedError;
///
/// let err = PermissionDeniedError::new("ban", "ban <target>");
/// assert!(format!("{}", err).contains("ban <target>"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Permission denied for '{}' (node '{}') at line {} in {}", path, node, line, file)]
pub struct PermissionDeniedError {
    /// Name of the node whose predicate failed
    pub node: String,
    /// Usage-style rendering of the matched path
    pub path: String,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PermissionDeniedError {
    /// Create a new PermissionDeniedError with automatic location tracking.
    #[track_caller]
    pub fn new(node: impl Into<String>, path: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            node: node.into(),
            path: path.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
