//! Permission predicates attached to command nodes.

use emmy_core::Permissible;
use std::fmt;
use std::sync::Arc;

/// Predicate over the executor of a command.
///
/// Every node on a matched path must accept the executor before the handler runs.
/// Nodes whose predicate fails are also hidden from suggestions.
///
/// # Examples
///
/// ```
/// use emmy_command::Permission;
/// use emmy_core::{GameProfile, PlayerSender};
///
/// let moderator = Permission::has("emmy.kick").or_has("emmy.admin");
/// let not_muted = Permission::lacks("emmy.muted");
/// let can_kick = moderator.and(not_muted);
///
/// let player = PlayerSender::new(GameProfile::offline("Steve")).grant("emmy.admin");
/// assert!(can_kick.check(&player));
///
/// let muted = player.clone().grant("emmy.muted");
/// assert!(!can_kick.check(&muted));
/// ```
#[derive(Clone)]
pub enum Permission {
    /// Executor holds the node
    Has(String),
    /// Executor does not hold the node
    Lacks(String),
    /// Both predicates hold
    And(Box<Permission>, Box<Permission>),
    /// Either predicate holds
    Or(Box<Permission>, Box<Permission>),
    /// The predicate does not hold
    Not(Box<Permission>),
    /// Arbitrary check
    Custom(Arc<dyn Fn(&dyn Permissible) -> bool + Send + Sync>),
}

impl Permission {
    /// Executor must hold `node`.
    pub fn has(node: impl Into<String>) -> Self {
        Self::Has(node.into())
    }

    /// Executor must not hold `node`.
    pub fn lacks(node: impl Into<String>) -> Self {
        Self::Lacks(node.into())
    }

    /// Predicate backed by a closure.
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&dyn Permissible) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(check))
    }

    /// Both `self` and `other` must hold.
    pub fn and(self, other: Permission) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Either `self` or `other` must hold.
    pub fn or(self, other: Permission) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Inverse of `self`.
    pub fn negate(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// `self` and holding `node`.
    pub fn and_has(self, node: impl Into<String>) -> Self {
        self.and(Self::has(node))
    }

    /// `self` or holding `node`.
    pub fn or_has(self, node: impl Into<String>) -> Self {
        self.or(Self::has(node))
    }

    /// Evaluate the predicate for `executor`.
    pub fn check(&self, executor: &dyn Permissible) -> bool {
        match self {
            Self::Has(node) => executor.has_permission(node),
            Self::Lacks(node) => !executor.has_permission(node),
            Self::And(left, right) => left.check(executor) && right.check(executor),
            Self::Or(left, right) => left.check(executor) || right.check(executor),
            Self::Not(inner) => !inner.check(executor),
            Self::Custom(check) => check(executor),
        }
    }
}

impl fmt::Debug for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Has(node) => f.debug_tuple("Has").field(node).finish(),
            Self::Lacks(node) => f.debug_tuple("Lacks").field(node).finish(),
            Self::And(left, right) => f.debug_tuple("And").field(left).field(right).finish(),
            Self::Or(left, right) => f.debug_tuple("Or").field(left).field(right).finish(),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
