pub mod entry;
pub mod key;
pub mod store;

pub use entry::CacheEntry;
pub use key::CacheKey;
pub use store::ResultCache;
