//! Structured storage: the `StorageService` implementation, the pluggable
//! `SqlExecutor` it's built on, the content-type registry, and a small LRU
//! query cache.

pub mod cache;
pub mod content_type;
pub mod executor;
pub mod in_memory_executor;
pub mod sql_storage_service;

pub use cache::LruQueryCache;
pub use executor::SqlExecutor;
pub use in_memory_executor::InMemorySqlExecutor;
pub use sql_storage_service::SqlStorageService;
