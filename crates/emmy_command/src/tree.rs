//! Grammar tree registration and lookup.

use crate::{CommandBuilder, CommandNode, NodeKind};
use emmy_error::{GrammarError, GrammarErrorKind};
use tracing::{debug, info, instrument};

/// Usage path of `node` below `parent_path`.
pub(crate) fn node_path(parent_path: &str, node: &CommandNode) -> String {
    if parent_path.is_empty() {
        node.usage()
    } else {
        format!("{} {}", parent_path, node.usage())
    }
}

/// Check that `incoming` can be merged into `existing`, a node with the same name.
///
/// Nodes cannot be merged when both are executable, when one is a literal and the
/// other an argument, or when two arguments have different types. Children are
/// checked recursively.
pub(crate) fn check_merge(
    existing: &CommandNode,
    incoming: &CommandNode,
    parent_path: &str,
) -> Result<(), GrammarError> {
    let path = node_path(parent_path, incoming);
    let conflicting_kinds = match (&existing.kind, &incoming.kind) {
        (NodeKind::Literal, NodeKind::Literal) => false,
        (NodeKind::Argument(left), NodeKind::Argument(right)) => left.describe() != right.describe(),
        _ => true,
    };
    if conflicting_kinds || (existing.is_executable() && incoming.is_executable()) {
        return Err(GrammarError::new(GrammarErrorKind::DuplicateCommand(path)));
    }
    for child in &incoming.children {
        if let Some(existing_child) = existing.child(&child.name) {
            check_merge(existing_child, child, &path)?;
        }
    }
    Ok(())
}

/// Add `child` to `children`, merging it into a same-named node if present.
///
/// Callers must have run [`check_merge`] first.
pub(crate) fn merge_child(children: &mut Vec<CommandNode>, child: CommandNode) {
    match children.iter_mut().find(|existing| existing.name == child.name) {
        Some(existing) => merge(existing, child),
        None => children.push(child),
    }
}

/// The existing node keeps its own requirements; those of `incoming` are ignored.
fn merge(existing: &mut CommandNode, incoming: CommandNode) {
    if existing.handler.is_none() {
        existing.handler = incoming.handler;
    }
    for child in incoming.children {
        merge_child(&mut existing.children, child);
    }
}

/// Setup-phase owner of the grammar tree.
///
/// Commands are registered once at startup, then [`freeze`](Self::freeze) hands out
/// an immutable [`GrammarTree`].
///
/// # Examples
///
/// ```
/// use emmy_command::{CommandOutput, GrammarTreeBuilder, literal};
/// use emmy_error::GrammarErrorKind;
///
/// let mut builder = GrammarTreeBuilder::new();
/// builder.register(literal("spawn").executes(|_| Ok(CommandOutput::success()))).unwrap();
///
/// let err = builder
///     .register(literal("spawn").executes(|_| Ok(CommandOutput::success())))
///     .unwrap_err();
/// assert_eq!(err.kind, GrammarErrorKind::DuplicateCommand("spawn".to_string()));
/// ```
#[derive(Debug)]
pub struct GrammarTreeBuilder {
    root: CommandNode,
}

impl Default for GrammarTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarTreeBuilder {
    /// Create a builder with an empty root.
    pub fn new() -> Self {
        Self {
            root: CommandNode::root(),
        }
    }

    /// Register a top-level command.
    ///
    /// A command whose name is already registered is merged into the existing one.
    /// Nothing is changed when registration fails.
    ///
    /// # Errors
    ///
    /// - [`GrammarErrorKind::InvalidRegistration`] if `command` is not a literal or
    ///   a node name is empty or a literal contains whitespace
    /// - [`GrammarErrorKind::DuplicateCommand`] if a node collides with an existing
    ///   node that cannot be merged
    #[instrument(skip_all, fields(command = %command.name()))]
    pub fn register(&mut self, command: CommandBuilder) -> Result<(), GrammarError> {
        if !command.is_literal() {
            return Err(GrammarError::new(GrammarErrorKind::InvalidRegistration(format!(
                "top-level node '{}' must be a literal",
                command.name()
            ))));
        }

        let node = command.into_node("")?;
        if let Some(existing) = self.root.child(&node.name) {
            check_merge(existing, &node, "")?;
            debug!("Merging into existing command");
        } else {
            debug!("Registering command");
        }
        merge_child(&mut self.root.children, node);
        Ok(())
    }

    /// End the setup phase.
    pub fn freeze(self) -> GrammarTree {
        info!(commands = self.root.children.len(), "Grammar tree frozen");
        GrammarTree { root: self.root }
    }
}

/// Immutable command grammar shared by dispatchers.
#[derive(Debug)]
pub struct GrammarTree {
    root: CommandNode,
}

impl GrammarTree {
    /// The root node, whose children are the top-level commands.
    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Node reached by following child names from the root.
    ///
    /// An empty path resolves to the root.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarErrorKind::NotFound`] if any name along the path is missing.
    pub fn resolve(&self, path: &[&str]) -> Result<&CommandNode, GrammarError> {
        path.iter().try_fold(&self.root, |node, name| {
            node.child(name).ok_or_else(|| {
                GrammarError::new(GrammarErrorKind::NotFound(path.join(" ")))
            })
        })
    }

    /// Names of the top-level commands in registration order.
    pub fn commands(&self) -> Vec<&str> {
        self.root.children.iter().map(CommandNode::name).collect()
    }

    /// Usage lines for every executable path at or below `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarErrorKind::NotFound`] if `path` does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use emmy_command::{CommandOutput, GrammarTreeBuilder, argument, literal};
    /// use emmy_command::argument::integer;
    ///
    /// let mut builder = GrammarTreeBuilder::new();
    /// builder
    ///     .register(
    ///         literal("xp")
    ///             .then(literal("show").executes(|_| Ok(CommandOutput::success())))
    ///             .then(literal("add").then(
    ///                 argument("amount", integer()).executes(|_| Ok(CommandOutput::success())),
    ///             )),
    ///     )
    ///     .unwrap();
    /// let tree = builder.freeze();
    /// assert_eq!(
    ///     tree.usage(&["xp"]).unwrap(),
    ///     vec!["xp show", "xp add <amount:integer>"]
    /// );
    /// ```
    pub fn usage(&self, path: &[&str]) -> Result<Vec<String>, GrammarError> {
        let mut prefix = String::new();
        let mut node = &self.root;
        for name in path {
            node = node
                .child(name)
                .ok_or_else(|| GrammarError::new(GrammarErrorKind::NotFound(path.join(" "))))?;
            prefix = node_path(&prefix, node);
        }
        let mut lines = Vec::new();
        collect_usage(node, &prefix, &mut lines);
        Ok(lines)
    }
}

fn collect_usage(node: &CommandNode, path: &str, lines: &mut Vec<String>) {
    if node.is_executable() {
        lines.push(path.to_string());
    }
    for child in &node.children {
        collect_usage(child, &node_path(path, child), lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{integer, player, string, word};
    use crate::{CommandOutput, Permission, argument, literal};
    use emmy_cache::{FnResolver, IdentityCacheConfig, ProfileCache};
    use emmy_core::{GameProfile, PlayerName, PlayerSender};
    use emmy_error::ResolutionError;
    use std::sync::Arc;

    fn ok() -> impl Fn(&crate::DispatchContext) -> Result<CommandOutput, emmy_error::HandlerError>
    + Send
    + Sync
    + 'static {
        |_: &crate::DispatchContext| Ok(CommandOutput::success())
    }

    fn profiles() -> Arc<ProfileCache> {
        Arc::new(ProfileCache::new(
            IdentityCacheConfig::default(),
            FnResolver::new(|name: PlayerName| async move {
                Ok::<_, ResolutionError>(GameProfile::offline(name))
            }),
        ))
    }

    #[test]
    fn test_resolve_returns_registered_nodes() {
        let cache = profiles();
        let mut builder = GrammarTreeBuilder::new();
        builder
            .register(literal("tp").then(
                argument("target", player(cache.clone()))
                    .then(argument("destination", player(cache)).executes(ok())),
            ))
            .unwrap();
        let tree = builder.freeze();

        let node = tree.resolve(&["tp", "target", "destination"]).unwrap();
        assert_eq!(node.name(), "destination");
        assert!(node.is_executable());
        assert!(!tree.resolve(&["tp", "target"]).unwrap().is_executable());
        assert!(matches!(tree.resolve(&[]).unwrap().kind(), NodeKind::Root));

        let err = tree.resolve(&["tp", "nobody"]).unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::NotFound("tp nobody".to_string()));
    }

    #[test]
    fn test_disjoint_branches_merge() {
        let mut builder = GrammarTreeBuilder::new();
        builder
            .register(literal("kit").then(literal("list").executes(ok())))
            .unwrap();
        builder
            .register(literal("kit").then(literal("give").then(argument("name", word()).executes(ok()))))
            .unwrap();
        let tree = builder.freeze();
        assert_eq!(tree.commands(), vec!["kit"]);
        let names: Vec<&str> = tree.resolve(&["kit"]).unwrap().children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["list", "give"]);
    }

    #[test]
    fn test_executable_merges_into_non_executable() {
        let mut builder = GrammarTreeBuilder::new();
        builder.register(literal("home").then(literal("set").executes(ok()))).unwrap();
        builder.register(literal("home").executes(ok())).unwrap();
        let tree = builder.freeze();
        assert!(tree.resolve(&["home"]).unwrap().is_executable());
        assert!(tree.resolve(&["home", "set"]).unwrap().is_executable());
    }

    #[test]
    fn test_nested_duplicate_is_rejected_atomically() {
        let mut builder = GrammarTreeBuilder::new();
        builder.register(literal("warp").then(literal("list").executes(ok()))).unwrap();
        let err = builder
            .register(
                literal("warp")
                    .then(literal("create").executes(ok()))
                    .then(literal("list").executes(ok())),
            )
            .unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::DuplicateCommand("warp list".to_string()));

        let tree = builder.freeze();
        assert!(tree.resolve(&["warp", "create"]).is_err());
    }

    #[test]
    fn test_argument_type_mismatch_is_duplicate() {
        let mut builder = GrammarTreeBuilder::new();
        builder
            .register(literal("give").then(argument("amount", integer()).executes(ok())))
            .unwrap();
        let err = builder
            .register(literal("give").then(argument("amount", string()).then(literal("now").executes(ok()))))
            .unwrap_err();
        assert_eq!(err.kind, GrammarErrorKind::DuplicateCommand("give <amount:string>".to_string()));
    }

    #[test]
    fn test_literal_and_argument_with_same_name_conflict() {
        let mut builder = GrammarTreeBuilder::new();
        builder.register(literal("msg").then(literal("all").executes(ok()))).unwrap();
        let err = builder
            .register(literal("msg").then(argument("all", word()).executes(ok())))
            .unwrap_err();
        assert!(matches!(err.kind, GrammarErrorKind::DuplicateCommand(_)));
    }

    #[test]
    fn test_invalid_registrations() {
        let mut builder = GrammarTreeBuilder::new();
        let err = builder.register(argument("name", word()).executes(ok())).unwrap_err();
        assert!(matches!(err.kind, GrammarErrorKind::InvalidRegistration(_)));
        let err = builder.register(literal("two words").executes(ok())).unwrap_err();
        assert!(matches!(err.kind, GrammarErrorKind::InvalidRegistration(_)));
        let err = builder.register(literal("").executes(ok())).unwrap_err();
        assert!(matches!(err.kind, GrammarErrorKind::InvalidRegistration(_)));
    }

    #[test]
    fn test_merge_keeps_existing_requirements() {
        let mut builder = GrammarTreeBuilder::new();
        builder
            .register(literal("admin").requires(Permission::has("a")).then(literal("x").executes(ok())))
            .unwrap();
        builder
            .register(literal("admin").requires(Permission::has("b")).then(literal("y").executes(ok())))
            .unwrap();
        let tree = builder.freeze();

        let admin = tree.resolve(&["admin"]).unwrap();
        assert_eq!(admin.requirements().len(), 1);
        let holder = PlayerSender::new(GameProfile::offline("Holder")).grant("a");
        assert!(admin.can_use(&holder));
        assert!(tree.resolve(&["admin", "y"]).is_ok());
    }

    #[test]
    fn test_usage_for_whole_tree() {
        let mut builder = GrammarTreeBuilder::new();
        builder.register(literal("spawn").executes(ok())).unwrap();
        builder
            .register(literal("msg").then(argument("to", word()).then(argument("text", string()).executes(ok()))))
            .unwrap();
        let tree = builder.freeze();
        assert_eq!(tree.usage(&[]).unwrap(), vec!["spawn", "msg <to:word> <text:string>"]);
        assert!(tree.usage(&["nope"]).is_err());
    }
}
