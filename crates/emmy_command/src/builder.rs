//! Brigadier-style command declaration.

use crate::tree::{check_merge, merge_child, node_path};
use crate::{ArgumentType, CommandNode, CommandOutput, DispatchContext, NodeKind, Permission};
use emmy_error::{GrammarError, GrammarErrorKind, HandlerError};
use std::sync::Arc;

/// Declaration of a command subtree, registered with
/// [`crate::GrammarTreeBuilder::register`].
///
/// # Examples
///
/// ```
/// use emmy_command::{CommandOutput, Permission, argument, literal};
/// use emmy_command::argument::{string, word};
///
/// let command = literal("mail")
///     .requires(Permission::has("emmy.mail"))
///     .then(literal("read").executes(|_| Ok(CommandOutput::success())))
///     .then(
///         literal("send").then(
///             argument("recipient", word())
///                 .then(argument("body", string()).executes(|_| Ok(CommandOutput::success()))),
///         ),
///     );
/// assert_eq!(command.name(), "mail");
/// ```
#[derive(Clone)]
pub struct CommandBuilder {
    name: String,
    kind: NodeKind,
    requirements: Vec<Permission>,
    handler: Option<crate::CommandHandler>,
    children: Vec<CommandBuilder>,
}

/// Declare a literal node matching `name` exactly.
pub fn literal(name: impl Into<String>) -> CommandBuilder {
    CommandBuilder::new(name.into(), NodeKind::Literal)
}

/// Declare an argument node whose tokens are parsed by `argument_type`.
pub fn argument<A>(name: impl Into<String>, argument_type: A) -> CommandBuilder
where
    A: ArgumentType + 'static,
{
    CommandBuilder::new(name.into(), NodeKind::Argument(Arc::new(argument_type)))
}

impl CommandBuilder {
    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            requirements: Vec::new(),
            handler: None,
            children: Vec::new(),
        }
    }

    /// Declare an argument node with a shared argument type.
    pub fn shared_argument(name: impl Into<String>, argument_type: Arc<dyn ArgumentType>) -> Self {
        Self::new(name.into(), NodeKind::Argument(argument_type))
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this declares a literal node.
    pub fn is_literal(&self) -> bool {
        self.kind.is_literal()
    }

    /// Require the executor to satisfy `permission` to use this node.
    pub fn requires(mut self, permission: Permission) -> Self {
        self.requirements.push(permission);
        self
    }

    /// Make input ending at this node run `handler`.
    pub fn executes<F>(mut self, handler: F) -> Self
    where
        F: Fn(&DispatchContext) -> Result<CommandOutput, HandlerError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Add a child node.
    pub fn then(mut self, child: CommandBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Convert into a node, merging children that share a name.
    pub(crate) fn into_node(self, parent_path: &str) -> Result<CommandNode, GrammarError> {
        let mut node = CommandNode {
            name: self.name,
            kind: self.kind,
            requirements: self.requirements,
            handler: self.handler,
            children: Vec::new(),
        };
        let path = node_path(parent_path, &node);

        if node.name.is_empty() {
            return Err(GrammarError::new(GrammarErrorKind::InvalidRegistration(format!(
                "empty node name after '{}'",
                parent_path
            ))));
        }
        if node.kind.is_literal() && node.name.chars().any(char::is_whitespace) {
            return Err(GrammarError::new(GrammarErrorKind::InvalidRegistration(format!(
                "literal '{}' contains whitespace",
                path
            ))));
        }

        for child in self.children {
            let child = child.into_node(&path)?;
            if let Some(existing) = node.child(&child.name) {
                check_merge(existing, &child, &path)?;
            }
            merge_child(&mut node.children, child);
        }
        Ok(node)
    }
}
