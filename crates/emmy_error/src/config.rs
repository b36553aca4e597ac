//! Settings loading and validation errors.

/// Settings could not be loaded, or loaded settings break a core invariant.
///
/// `setting` names the offending key when a single one is to blame, so hosts can
/// point the operator at the exact line of their settings file.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Settings Error: {}{} at line {} in {}", setting_prefix(setting), message, line, file)]
pub struct ConfigError {
    /// What went wrong
    pub message: String,
    /// Offending setting, if one is to blame
    pub setting: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

fn setting_prefix(setting: &Option<String>) -> String {
    setting
        .as_ref()
        .map(|name| format!("'{}' ", name))
        .unwrap_or_default()
}

impl ConfigError {
    /// Error not tied to one setting, such as an unreadable file.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            setting: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Error blaming `setting`.
    ///
    /// # Examples
    ///
    /// ```
    /// use emmy_error::ConfigError;
    ///
    /// let err = ConfigError::invalid_setting("cache_capacity", "must be at least 1");
    /// assert_eq!(err.setting.as_deref(), Some("cache_capacity"));
    /// assert!(err.to_string().starts_with("Settings Error: 'cache_capacity' must be at least 1"));
    /// ```
    #[track_caller]
    pub fn invalid_setting(setting: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            setting: Some(setting.into()),
            line: location.line(),
            file: location.file(),
        }
    }
}
