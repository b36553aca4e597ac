//! Core data types for the EmmyLib common library.
//!
//! This crate holds the value types shared by the identity cache and the command
//! dispatcher:
//!
//! - [`GameProfile`] - identity record resolved for a player handle
//! - [`Vector3`] - three-component coordinate
//! - [`Permissible`] - anything that can run commands and hold permissions
//! - the compact duration grammar ([`parse_duration`], [`short_duration`], [`long_duration`])
//! - [`CoreSettings`] - static configuration handed to the core at construction

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod duration;
mod profile;
mod sender;
mod settings;
mod vector;

pub mod serde_duration;

pub use duration::{
    DURATION_EXAMPLES, DURATION_SCALES, duration_scale_suggestions, long_duration, parse_duration,
    short_duration,
};
pub use profile::{GameProfile, PlayerName, ProfileProperty, is_valid_username};
pub use sender::{ConsoleSender, Permissible, PlayerSender};
pub use settings::CoreSettings;
pub use vector::Vector3;
