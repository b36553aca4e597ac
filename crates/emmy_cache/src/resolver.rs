//! Resolver trait for cache misses.

use async_trait::async_trait;
use emmy_error::ResolutionError;
use std::future::Future;

/// External collaborator that turns a cache key into a value on a miss.
///
/// Implementations may block on I/O; the cache never holds its internal lock while
/// a resolver runs. Resolvers are responsible for bounding their own latency and
/// should report timeouts as [`emmy_error::ResolutionErrorKind::Timeout`].
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct SessionServerResolver {
///     client: SessionClient,
/// }
///
/// #[async_trait]
/// impl Resolver<PlayerName, GameProfile> for SessionServerResolver {
///     async fn resolve(&self, name: &PlayerName) -> Result<GameProfile, ResolutionError> {
///         self.client.profile_by_name(name).await
///     }
/// }
/// ```
#[async_trait]
pub trait Resolver<K, V>: Send + Sync
where
    K: Send + Sync,
{
    /// Resolve the value for `key`.
    async fn resolve(&self, key: &K) -> Result<V, ResolutionError>;
}

/// Adapts an async closure into a [`Resolver`].
///
/// # Examples
///
/// ```
/// use emmy_cache::{FnResolver, Resolver};
/// use emmy_error::ResolutionError;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let resolver = FnResolver::new(|key: String| async move {
///     Ok::<_, ResolutionError>(key.len())
/// });
/// let len = Resolver::<String, usize>::resolve(&resolver, &"Notch".to_string()).await;
/// assert_eq!(len.unwrap(), 5);
/// # }
/// ```
pub struct FnResolver<F> {
    resolve: F,
}

impl<F> FnResolver<F> {
    /// Wrap `resolve`, which receives an owned copy of the key.
    pub fn new(resolve: F) -> Self {
        Self { resolve }
    }
}

#[async_trait]
impl<K, V, F, Fut> Resolver<K, V> for FnResolver<F>
where
    K: Clone + Send + Sync + 'static,
    V: Send + 'static,
    F: Fn(K) -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, ResolutionError>> + Send,
{
    async fn resolve(&self, key: &K) -> Result<V, ResolutionError> {
        (self.resolve)(key.clone()).await
    }
}
