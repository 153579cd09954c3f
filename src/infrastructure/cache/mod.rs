mod in_memory_cache;

pub use in_memory_cache::{InMemoryCache, MAX_TTL};
