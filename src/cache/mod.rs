// Cache module for repository metadata.
// Stores GitHub API responses on disk so repeated builds avoid the rate limit.

pub mod backend;
pub mod paths;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use paths::default_cache_file;
pub use store::{CacheEntry, CacheMap, CacheStore, EXPIRY_WINDOW, Persisted};
