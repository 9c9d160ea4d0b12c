//! List cache adapters.

mod in_memory;
mod redis;

pub use in_memory::InMemoryListCache;
pub use redis::RedisListCache;
