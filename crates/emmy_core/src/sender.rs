//! Command executors.

use crate::GameProfile;
use std::collections::HashSet;

/// Anything that can send commands and be checked for permissions.
///
/// Each host platform wraps its native sender type in an implementation of this
/// trait before handing it to the dispatcher.
pub trait Permissible: Send + Sync {
    /// Display name of the sender.
    fn name(&self) -> &str;

    /// Whether the sender holds the given permission node.
    fn has_permission(&self, node: &str) -> bool;

    /// Identity behind the sender, if it is a player.
    fn profile(&self) -> Option<&GameProfile> {
        None
    }
}

/// The server console, which holds every permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSender;

impl Permissible for ConsoleSender {
    fn name(&self) -> &str {
        "CONSOLE"
    }

    fn has_permission(&self, _node: &str) -> bool {
        true
    }
}

/// A player with an explicit set of granted permission nodes.
///
/// A granted node ending in `.*` covers every node below it; `*` covers everything.
///
/// # Examples
///
/// ```
/// use emmy_core::{GameProfile, Permissible, PlayerSender};
///
/// let player = PlayerSender::new(GameProfile::offline("Steve"))
///     .grant("emmy.teleport.*");
/// assert!(player.has_permission("emmy.teleport.others"));
/// assert!(!player.has_permission("emmy.ban"));
/// ```
#[derive(Debug, Clone)]
pub struct PlayerSender {
    profile: GameProfile,
    permissions: HashSet<String>,
}

impl PlayerSender {
    /// Player without permissions.
    pub fn new(profile: GameProfile) -> Self {
        Self {
            profile,
            permissions: HashSet::new(),
        }
    }

    /// Grant a permission node.
    pub fn grant(mut self, node: impl Into<String>) -> Self {
        self.permissions.insert(node.into());
        self
    }
}

impl Permissible for PlayerSender {
    fn name(&self) -> &str {
        self.profile.name()
    }

    fn has_permission(&self, node: &str) -> bool {
        if self.permissions.contains("*") || self.permissions.contains(node) {
            return true;
        }
        // Walk up the node hierarchy looking for a wildcard grant
        let mut prefix = node;
        while let Some(index) = prefix.rfind('.') {
            prefix = &prefix[..index];
            if self.permissions.contains(&format!("{}.*", prefix)) {
                return true;
            }
        }
        false
    }

    fn profile(&self) -> Option<&GameProfile> {
        Some(&self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_has_everything() {
        assert!(ConsoleSender.has_permission("anything.at.all"));
        assert!(ConsoleSender.profile().is_none());
    }

    #[test]
    fn test_star_grants_all() {
        let player = PlayerSender::new(GameProfile::offline("Op")).grant("*");
        assert!(player.has_permission("emmy.ban"));
    }

    #[test]
    fn test_wildcard_does_not_leak_sideways() {
        let player = PlayerSender::new(GameProfile::offline("Alex")).grant("emmy.tp.*");
        assert!(player.has_permission("emmy.tp.here"));
        assert!(!player.has_permission("emmy.tpa"));
        assert_eq!(player.profile().map(|p| p.name().as_str()), Some("Alex"));
    }
}
