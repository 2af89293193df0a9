//! Service layer modules.
//!
//! Contains the Redis caching client and the notification writer.

pub mod cache;
pub mod notifications;

pub use cache::RedisCache;
