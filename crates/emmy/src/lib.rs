//! EmmyLib common - cross-platform command registration and dispatch.
//!
//! Commands are declared once as a grammar tree of literals and typed arguments,
//! frozen, and dispatched against raw text from any host platform. Player arguments
//! resolve through a bounded, TTL-aware identity cache that collapses concurrent
//! lookups of the same name into a single resolver call.
//!
//! # Quick Start
//!
//! ```
//! use emmy::{
//!     CommandOutput, ConsoleSender, CoreSettings, Dispatcher, GrammarTreeBuilder, argument,
//!     literal,
//! };
//! use emmy::argument::integer_range;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = GrammarTreeBuilder::new();
//! builder.register(literal("give").then(argument("amount", integer_range(1, 64)).executes(
//!     |ctx| Ok(CommandOutput::success_with(format!("Gave {}", ctx.integer("amount").unwrap_or(0)))),
//! )))?;
//!
//! let dispatcher = Dispatcher::new(Arc::new(builder.freeze()), &CoreSettings::default());
//! let outcome = dispatcher.execute("give 16", Arc::new(ConsoleSender)).await;
//! assert_eq!(outcome.message().as_deref(), Some("Gave 16"));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `emmy_error` - error taxonomy
//! - `emmy_core` - profiles, senders, durations, vectors and settings
//! - `emmy_cache` - single-flight identity cache
//! - `emmy_command` - grammar tree, argument types, dispatcher and platform boundary
//!
//! This crate (`emmy`) re-exports everything for convenience and adds tracing setup,
//! an offline profile resolver and a console platform adapter.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod console;
mod demo;
mod resolver;
mod telemetry;

pub use emmy_cache::*;
pub use emmy_command::*;
pub use emmy_core::*;
pub use emmy_error::*;

pub use console::ConsolePlatformAdapter;
pub use demo::demo_grammar;
pub use resolver::{OfflineProfileResolver, offline_profile_cache};
pub use telemetry::{LogFormat, init_tracing};
