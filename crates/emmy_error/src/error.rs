//! Top-level error wrapper types.

use crate::{ConfigError, DispatchError, GrammarError, ResolutionError};

/// Foundation error enum covering every crate in the workspace.
///
/// # Examples
///
/// ```
/// use emmy_error::{ConfigError, EmmyError};
///
/// let err: EmmyError = ConfigError::new("cache_ttl must be positive").into();
/// assert!(format!("{}", err).contains("Settings Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum EmmyErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Grammar registration error
    #[from(GrammarError)]
    Grammar(GrammarError),
    /// Identity resolver error
    #[from(ResolutionError)]
    Resolution(ResolutionError),
    /// Dispatch error
    #[from(DispatchError)]
    Dispatch(DispatchError),
}

/// EmmyLib error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("EmmyLib Error: {}", _0)]
pub struct EmmyError(Box<EmmyErrorKind>);

impl EmmyError {
    /// Create a new error from a kind.
    pub fn new(kind: EmmyErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EmmyErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to EmmyErrorKind
impl<T> From<T> for EmmyError
where
    T: Into<EmmyErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for EmmyLib operations.
pub type EmmyResult<T> = std::result::Result<T, EmmyError>;
