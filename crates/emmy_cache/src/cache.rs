//! Identity cache implementation.

use crate::{CacheEntry, CacheStats, IdentityCacheConfig, Resolver};
use emmy_core::{GameProfile, PlayerName};
use emmy_error::ResolutionError;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, instrument, trace, warn};

/// Cache of player profiles keyed by case-insensitive username.
pub type ProfileCache = IdentityCache<PlayerName, GameProfile>;

/// Value published to callers waiting on an in-flight resolution.
type Shared<V> = Option<Result<V, ResolutionError>>;

/// A resolution currently running for one key.
struct InFlight<V> {
    id: u64,
    sender: Arc<watch::Sender<Shared<V>>>,
}

struct CacheState<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    in_flight: HashMap<K, InFlight<V>>,
    next_flight: u64,
}

/// What a caller of [`IdentityCache::get`] should do next.
enum Lookup<V> {
    /// A live entry was found
    Hit(V),
    /// Another caller is resolving this key
    Wait(watch::Receiver<Shared<V>>),
    /// This caller owns the resolution
    Lead(u64, Arc<watch::Sender<Shared<V>>>),
}

/// Unregisters an in-flight resolution if its leader is dropped before finishing.
///
/// Waiters observe the closed channel and retry, so one of them takes over.
struct FlightGuard<'a, K: Hash + Eq, V> {
    state: &'a Mutex<CacheState<K, V>>,
    key: &'a K,
    id: u64,
    armed: bool,
}

impl<K: Hash + Eq, V> Drop for FlightGuard<'_, K, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if state
            .in_flight
            .get(self.key)
            .is_some_and(|flight| flight.id == self.id)
        {
            state.in_flight.remove(self.key);
        }
    }
}

/// Bounded, TTL-aware cache with single-flight resolution.
///
/// - At most one resolver call runs per key at a time; concurrent callers for the
///   same key await that call and receive the same result.
/// - Entries older than the TTL are treated as absent and dropped on access.
/// - When full, the least recently used entry is evicted.
/// - Failed resolutions are never stored.
///
/// The internal lock is only held for bookkeeping, never across a resolver call.
///
/// # Example
///
/// ```
/// use emmy_cache::{FnResolver, IdentityCache, IdentityCacheConfig};
/// use emmy_core::GameProfile;
/// use emmy_error::ResolutionError;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache: IdentityCache<String, GameProfile> = IdentityCache::new(
///     IdentityCacheConfig::default(),
///     FnResolver::new(|name: String| async move {
///         Ok::<_, ResolutionError>(GameProfile::offline(name))
///     }),
/// );
///
/// let profile = cache.get(&"Notch".to_string()).await.unwrap();
/// assert_eq!(profile.name(), "Notch");
/// assert_eq!(cache.stats().misses(), 1);
///
/// cache.get(&"Notch".to_string()).await.unwrap();
/// assert_eq!(cache.stats().hits(), 1);
/// # }
/// ```
pub struct IdentityCache<K: Hash + Eq, V> {
    config: IdentityCacheConfig,
    resolver: Arc<dyn Resolver<K, V>>,
    state: Mutex<CacheState<K, V>>,
    stats: CacheStats,
}

impl<K, V> IdentityCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache backed by `resolver`.
    pub fn new<R>(config: IdentityCacheConfig, resolver: R) -> Self
    where
        R: Resolver<K, V> + 'static,
    {
        Self::with_resolver(config, Arc::new(resolver))
    }

    /// Create a cache backed by a shared resolver.
    pub fn with_resolver(config: IdentityCacheConfig, resolver: Arc<dyn Resolver<K, V>>) -> Self {
        let capacity = NonZeroUsize::new(*config.capacity()).unwrap_or_else(|| {
            warn!("Identity cache capacity of 0 raised to 1");
            NonZeroUsize::MIN
        });
        debug!(
            capacity = capacity.get(),
            ttl = ?config.ttl(),
            sweep_interval = ?config.sweep_interval(),
            "Creating new IdentityCache"
        );
        Self {
            config,
            resolver,
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                in_flight: HashMap::new(),
                next_flight: 0,
            }),
            stats: CacheStats::new(),
        }
    }

    /// Create a shared cache and start its sweeper if a sweep interval is configured.
    ///
    /// The sweeper is only started when called from within a Tokio runtime.
    pub fn shared<R>(config: IdentityCacheConfig, resolver: R) -> Arc<Self>
    where
        R: Resolver<K, V> + 'static,
    {
        let interval = *config.sweep_interval();
        let cache = Arc::new(Self::new(config, resolver));
        if let Some(interval) = interval {
            if tokio::runtime::Handle::try_current().is_ok() {
                cache.spawn_sweeper(interval);
            } else {
                warn!("No Tokio runtime available, expired entries will only be dropped on access");
            }
        }
        cache
    }

    /// The cache configuration.
    pub fn config(&self) -> &IdentityCacheConfig {
        &self.config
    }

    /// Counters for this cache.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get the value for `key`, resolving it on a miss.
    ///
    /// If a resolution for `key` is already running, waits for it instead of
    /// starting another. If that resolution is abandoned (its caller was dropped),
    /// one of the waiters starts a fresh one.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error. Nothing is stored, so the next call retries.
    #[instrument(skip(self))]
    pub async fn get(&self, key: &K) -> Result<V, ResolutionError> {
        loop {
            match self.lookup(key) {
                Lookup::Hit(value) => return Ok(value),
                Lookup::Wait(mut receiver) => {
                    trace!("Joining in-flight resolution");
                    let published = receiver
                        .wait_for(Option::is_some)
                        .await
                        .map(|shared| (*shared).clone());
                    match published {
                        Ok(Some(result)) => return result,
                        _ => debug!("In-flight resolution abandoned, retrying"),
                    }
                }
                Lookup::Lead(id, sender) => return self.lead(key, id, sender).await,
            }
        }
    }

    /// Get a live value without resolving.
    pub fn get_if_present(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let ttl = *self.config.ttl();
        let mut state = self.state.lock();
        let expired = match state.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(ttl, now) => {
                entry.touch(now);
                self.stats.record_hit();
                return Some(entry.value().clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            state.entries.pop(key);
            self.stats.record_expirations(1);
        }
        self.stats.record_miss();
        None
    }

    /// Store a value directly, replacing any existing entry.
    pub fn insert(&self, key: K, value: V) {
        let mut state = self.state.lock();
        self.store(&mut state, key, value);
    }

    /// Remove the entry for `key`.
    ///
    /// A resolution already running for `key` still answers its own waiters, but
    /// its result is not stored. Returns whether an entry was removed.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut state = self.state.lock();
        let removed = state.entries.pop(key).is_some();
        if state.in_flight.remove(key).is_some() {
            debug!(key = ?key, "Detached in-flight resolution");
        }
        debug!(key = ?key, removed, "Invalidated entry");
        removed
    }

    /// Remove every entry and detach every running resolution.
    pub fn invalidate_all(&self) {
        let mut state = self.state.lock();
        let count = state.entries.len();
        state.entries.clear();
        state.in_flight.clear();
        debug!(count, "Invalidated all entries");
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = *self.config.ttl();
        let mut state = self.state.lock();
        let expired: Vec<K> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl, now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            state.entries.pop(key);
        }
        if !expired.is_empty() {
            self.stats.record_expirations(expired.len() as u64);
            debug!(count = expired.len(), "Cleaned up expired entries");
        }
        expired.len()
    }

    /// Keys of live entries, most recently used first.
    pub fn cached_keys(&self) -> Vec<K> {
        let now = Instant::now();
        let ttl = *self.config.ttl();
        self.state
            .lock()
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(ttl, now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let ttl = *self.config.ttl();
        self.state
            .lock()
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired(ttl, now))
            .count()
    }

    /// Whether the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys currently being resolved.
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    /// Periodically drop expired entries until the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        debug!(interval = ?interval, "Starting expired entry sweeper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("Identity cache dropped, stopping sweeper");
                    break;
                };
                cache.cleanup_expired();
            }
        })
    }

    fn lookup(&self, key: &K) -> Lookup<V> {
        let now = Instant::now();
        let ttl = *self.config.ttl();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let expired = match state.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(ttl, now) => {
                entry.touch(now);
                self.stats.record_hit();
                trace!("Cache hit");
                return Lookup::Hit(entry.value().clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            state.entries.pop(key);
            self.stats.record_expirations(1);
            trace!("Entry expired");
        }
        self.stats.record_miss();

        if let Some(flight) = state.in_flight.get(key) {
            return Lookup::Wait(flight.sender.subscribe());
        }

        let id = state.next_flight;
        state.next_flight = state.next_flight.wrapping_add(1);
        let (sender, _) = watch::channel(None);
        let sender = Arc::new(sender);
        state.in_flight.insert(
            key.clone(),
            InFlight {
                id,
                sender: Arc::clone(&sender),
            },
        );
        Lookup::Lead(id, sender)
    }

    async fn lead(
        &self,
        key: &K,
        id: u64,
        sender: Arc<watch::Sender<Shared<V>>>,
    ) -> Result<V, ResolutionError> {
        let mut guard = FlightGuard {
            state: &self.state,
            key,
            id,
            armed: true,
        };
        self.stats.record_resolution();
        debug!(flight = id, "Resolving");
        let result = self.resolver.resolve(key).await;
        guard.armed = false;
        self.finish(key, id, result.clone());
        sender.send_replace(Some(result.clone()));
        result
    }

    fn finish(&self, key: &K, id: u64, result: Result<V, ResolutionError>) {
        let mut state = self.state.lock();
        let owned = state
            .in_flight
            .get(key)
            .is_some_and(|flight| flight.id == id);
        if owned {
            state.in_flight.remove(key);
        }
        match result {
            Ok(value) if owned => {
                self.store(&mut state, key.clone(), value);
                debug!(flight = id, "Resolved and stored");
            }
            Ok(_) => debug!(flight = id, "Invalidated during resolution, result not stored"),
            Err(err) => {
                self.stats.record_failure();
                warn!(flight = id, error = %err, "Resolution failed");
            }
        }
    }

    fn store(&self, state: &mut CacheState<K, V>, key: K, value: V) {
        let now = Instant::now();
        let ttl = *self.config.ttl();
        let pushed = state.entries.push(key.clone(), CacheEntry::new(value, now));
        match pushed {
            Some((evicted, _)) if evicted == key => {}
            Some((_, entry)) if entry.is_expired(ttl, now) => self.stats.record_expirations(1),
            Some((evicted, _)) => {
                self.stats.record_eviction();
                debug!(evicted = ?evicted, "Evicted least recently used entry");
            }
            None => {}
        }
    }
}

impl<K: Hash + Eq, V> fmt::Debug for IdentityCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("IdentityCache")
            .field("config", &self.config)
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .field("stats", &self.stats)
            .finish()
    }
}
