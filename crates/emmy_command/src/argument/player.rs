//! Player name arguments resolved through the identity cache.

use super::{ArgumentType, ArgumentValue, filter_prefix, invalid, span_of};
use crate::Token;
use async_trait::async_trait;
use emmy_cache::ProfileCache;
use emmy_core::{PlayerName, is_valid_username};
use emmy_error::{ArgumentErrorKind, ArgumentResolutionError};
use std::sync::Arc;
use tracing::debug;

/// A player username resolved into a [`emmy_core::GameProfile`].
///
/// Names must match `[A-Za-z0-9_]{1,16}`. Resolution goes through the shared
/// [`ProfileCache`], so repeated or concurrent lookups of one name reach the
/// resolver at most once per TTL. Names differing only in case share an entry.
#[derive(Debug, Clone)]
pub struct PlayerArgument {
    cache: Arc<ProfileCache>,
}

/// A player name looked up in `cache`.
pub fn player(cache: Arc<ProfileCache>) -> PlayerArgument {
    PlayerArgument { cache }
}

fn name(tokens: &[Token]) -> Option<&str> {
    match tokens {
        [token] if is_valid_username(token.text()) => Some(token.text()),
        _ => None,
    }
}

#[async_trait]
impl ArgumentType for PlayerArgument {
    fn type_name(&self) -> &'static str {
        "player"
    }

    fn validate(&self, tokens: &[Token]) -> bool {
        name(tokens).is_some()
    }

    async fn resolve(
        &self,
        argument: &str,
        tokens: &[Token],
    ) -> Result<ArgumentValue, ArgumentResolutionError> {
        let name = name(tokens).ok_or_else(|| invalid(argument, tokens, "a player name"))?;
        debug!(argument, name, "Resolving player argument");
        self.cache
            .get(&PlayerName::from(name))
            .await
            .map(ArgumentValue::Profile)
            .map_err(|err| {
                ArgumentResolutionError::new(
                    argument,
                    span_of(tokens),
                    ArgumentErrorKind::Resolver(err),
                )
            })
    }

    fn suggest(&self, partial: &str) -> Vec<String> {
        let mut names = filter_prefix(self.cache.cached_keys(), partial);
        names.sort_by_key(|name| name.to_lowercase());
        names
    }

    fn examples(&self) -> Vec<String> {
        vec!["Notch".to_string(), "Player_1".to_string()]
    }
}
