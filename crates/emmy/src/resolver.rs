//! Identity resolution without an authentication service.

use async_trait::async_trait;
use emmy_cache::{IdentityCacheConfig, ProfileCache, Resolver};
use emmy_core::{CoreSettings, GameProfile, PlayerName, is_valid_username};
use emmy_error::{ResolutionError, ResolutionErrorKind};
use std::sync::Arc;
use tracing::debug;

/// Resolver that derives each profile from the name alone.
///
/// Every well-formed username resolves to [`GameProfile::offline`]; malformed names
/// are not found.
///
/// # Examples
///
/// ```
/// use emmy::{GameProfile, OfflineProfileResolver, PlayerName, Resolver};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let profile = OfflineProfileResolver.resolve(&PlayerName::from("Steve")).await.unwrap();
/// assert_eq!(profile, GameProfile::offline("Steve"));
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProfileResolver;

#[async_trait]
impl Resolver<PlayerName, GameProfile> for OfflineProfileResolver {
    async fn resolve(&self, name: &PlayerName) -> Result<GameProfile, ResolutionError> {
        if !is_valid_username(name.as_str()) {
            return Err(ResolutionError::new(ResolutionErrorKind::NotFound(name.to_string())));
        }
        debug!(name = %name, "Deriving offline profile");
        Ok(GameProfile::offline(name.as_str()))
    }
}

/// Profile cache sized by `settings` and backed by [`OfflineProfileResolver`].
///
/// Starts the background sweep when `settings` sets an interval and a tokio runtime
/// is running.
pub fn offline_profile_cache(settings: &CoreSettings) -> Arc<ProfileCache> {
    ProfileCache::shared(IdentityCacheConfig::from(settings), OfflineProfileResolver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_name_not_found() {
        let err = OfflineProfileResolver
            .resolve(&PlayerName::from("not a name"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ResolutionErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cache_uses_settings() {
        let settings = CoreSettings::default().with_cache_capacity(2);
        let cache = offline_profile_cache(&settings);
        assert_eq!(*cache.config().capacity(), 2);

        let profile = cache.get(&PlayerName::from("Alex")).await.unwrap();
        assert_eq!(profile.id(), GameProfile::offline("alex").id());
        assert_eq!(cache.stats().resolutions(), 1);
    }
}
