//! Offline cache for fetched datasets.
//!
//! Stores the last successful fetch of each dataset as JSON with a
//! timestamp, so the client can show recent data, labelled with its age,
//! when the backend is unreachable.

pub mod manager;

pub use manager::{CacheManager, CachedData};
