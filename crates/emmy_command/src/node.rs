//! Frozen grammar tree nodes.

use crate::{ArgumentType, CommandOutput, DispatchContext, Permission};
use emmy_core::Permissible;
use emmy_error::HandlerError;
use std::fmt;
use std::sync::Arc;

/// Synchronous command handler.
pub type CommandHandler =
    Arc<dyn Fn(&DispatchContext) -> Result<CommandOutput, HandlerError> + Send + Sync>;

/// What a node matches.
#[derive(Clone)]
pub enum NodeKind {
    /// The tree root; matches nothing itself
    Root,
    /// Matches its own name exactly
    Literal,
    /// Matches tokens accepted by the argument type
    Argument(Arc<dyn ArgumentType>),
}

impl NodeKind {
    /// Whether this is a literal node.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal)
    }

    /// The argument type of an argument node.
    pub fn argument_type(&self) -> Option<&Arc<dyn ArgumentType>> {
        match self {
            Self::Argument(argument) => Some(argument),
            _ => None,
        }
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("Root"),
            Self::Literal => f.write_str("Literal"),
            Self::Argument(argument) => write!(f, "Argument({})", argument.describe()),
        }
    }
}

/// A node of a frozen [`crate::GrammarTree`].
///
/// Children are kept in registration order and their names are unique.
#[derive(Clone)]
pub struct CommandNode {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) requirements: Vec<Permission>,
    pub(crate) handler: Option<CommandHandler>,
    pub(crate) children: Vec<CommandNode>,
}

impl CommandNode {
    pub(crate) fn root() -> Self {
        Self {
            name: String::new(),
            kind: NodeKind::Root,
            requirements: Vec::new(),
            handler: None,
            children: Vec::new(),
        }
    }

    /// Node name; the literal text for literals.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the node matches.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Predicates the executor must satisfy.
    pub fn requirements(&self) -> &[Permission] {
        &self.requirements
    }

    /// Children in registration order.
    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// Child with the given name.
    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// The handler, if this node ends an executable path.
    pub fn handler(&self) -> Option<&CommandHandler> {
        self.handler.as_ref()
    }

    /// Whether input may end at this node.
    pub fn is_executable(&self) -> bool {
        self.handler.is_some()
    }

    /// Whether `executor` satisfies every requirement of this node.
    pub fn can_use(&self, executor: &dyn Permissible) -> bool {
        self.requirements
            .iter()
            .all(|requirement| requirement.check(executor))
    }

    /// Usage fragment: the name for literals, `<name:type>` for arguments.
    pub fn usage(&self) -> String {
        match &self.kind {
            NodeKind::Argument(argument) => format!("<{}:{}>", self.name, argument.type_name()),
            _ => self.name.clone(),
        }
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("requirements", &self.requirements)
            .field("executable", &self.is_executable())
            .field("children", &self.children)
            .finish()
    }
}
