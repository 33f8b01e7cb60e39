//! Compiled-table cache subsystem.
//!
//! # Data Flow
//! ```text
//! Router::load_cache()
//!     → CacheStore::load() → StoredTable { saved_at, table }
//!     → stale (age > expiry) or malformed → discard, compile from scratch
//!     → fresh → TableSnapshot → CompiledTable (router finalized)
//!
//! Router finalization:
//!     CompiledTable → TableSnapshot → StoredTable → CacheStore::save()
//! ```
//!
//! # Design Decisions
//! - The store only moves opaque JSON values; the router owns the format
//! - Staleness is judged by the router, not the store
//! - Cache failures never fail registration or dispatch

pub mod store;

pub use store::{CacheError, CacheStore, FileCacheStore, MemoryCacheStore, StoredTable};
