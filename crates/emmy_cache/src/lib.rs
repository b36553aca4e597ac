//! Identity caching with TTL, LRU eviction and single-flight resolution.
//!
//! This crate provides the identity cache consulted by the command dispatcher when
//! an argument names a player. Lookups that miss are forwarded to a pluggable
//! [`Resolver`] (for example an authentication service client), and concurrent
//! misses for the same key share a single resolver call.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod config;
mod entry;
mod resolver;
mod stats;

pub use cache::{IdentityCache, ProfileCache};
pub use config::{IdentityCacheConfig, IdentityCacheConfigBuilder};
pub use entry::CacheEntry;
pub use resolver::{FnResolver, Resolver};
pub use stats::CacheStats;
