//! Command registration and dispatch for the EmmyLib common library.
//!
//! Commands are declared with a brigadier-style builder, merged into a
//! [`GrammarTree`] during setup, and executed by a [`Dispatcher`] that tokenizes raw
//! input, walks the tree, resolves typed arguments (consulting the identity cache
//! for player names), checks permissions and finally runs the matched handler.
//!
//! # Example
//!
//! ```
//! use emmy_command::{
//!     CancellationFlag, CommandOutput, Dispatcher, GrammarTreeBuilder, argument, literal,
//! };
//! use emmy_command::argument::integer_range;
//! use emmy_core::{ConsoleSender, CoreSettings};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut builder = GrammarTreeBuilder::new();
//! builder
//!     .register(literal("heal").then(argument("amount", integer_range(1, 20)).executes(|ctx| {
//!         let amount = ctx.integer("amount").unwrap_or_default();
//!         Ok(CommandOutput::success_with(format!("Healed {} hearts", amount)))
//!     })))
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(Arc::new(builder.freeze()), &CoreSettings::default());
//! let outcome = dispatcher
//!     .dispatch("heal 5", Arc::new(ConsoleSender), &CancellationFlag::new())
//!     .await;
//! assert_eq!(outcome.message().as_deref(), Some("Healed 5 hearts"));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod argument;

mod builder;
mod context;
mod dispatcher;
mod node;
mod outcome;
mod permission;
mod platform;
mod queue;
mod suggestion;
mod token;
mod tree;

pub use argument::{ArgumentType, ArgumentValue};
pub use builder::{CommandBuilder, argument, literal};
pub use context::{CancellationFlag, DispatchContext, ParsedArgument};
pub use dispatcher::{DispatchState, Dispatcher};
pub use node::{CommandHandler, CommandNode, NodeKind};
pub use outcome::{CommandOutput, DispatchOutcome, describe_error};
pub use permission::Permission;
pub use platform::{PlatformAdapter, render_plain};
pub use queue::DispatchQueue;
pub use suggestion::Suggestion;
pub use token::{Token, tokenize};
pub use tree::{GrammarTree, GrammarTreeBuilder};
