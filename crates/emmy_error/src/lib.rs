//! Error types for the EmmyLib common library.
//!
//! This crate provides the error taxonomy shared by the grammar tree, the identity
//! cache and the dispatcher.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Registration-time errors ([`GrammarError`]) are fatal to setup. Per-dispatch errors
//! are gathered under [`DispatchError`] and handed back to the platform adapter as a
//! typed outcome.
//!
//! # Examples
//!
//! ```
//! use emmy_error::{EmmyResult, GrammarError, GrammarErrorKind};
//!
//! fn register() -> EmmyResult<()> {
//!     Err(GrammarError::new(GrammarErrorKind::DuplicateCommand("tp".to_string())))?
//! }
//!
//! assert!(register().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod argument;
mod config;
mod dispatch;
mod error;
mod grammar;
mod handler;
mod parse;
mod permission;
mod resolution;
mod span;

pub use argument::{ArgumentErrorKind, ArgumentResolutionError};
pub use config::ConfigError;
pub use dispatch::{DispatchError, DispatchErrorKind};
pub use error::{EmmyError, EmmyErrorKind, EmmyResult};
pub use grammar::{GrammarError, GrammarErrorKind};
pub use handler::{HandlerError, ResultKind};
pub use parse::{ParseError, ParseErrorKind};
pub use permission::PermissionDeniedError;
pub use resolution::{ResolutionError, ResolutionErrorKind};
pub use span::TokenSpan;
