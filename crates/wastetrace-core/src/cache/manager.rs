use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::{Account, Entry, Product, UserStats};

/// Consider cached data stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing
/// data.
const CACHE_STALE_MINUTES: i64 = 60;

/// A cached dataset with its fetch timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    /// Human-readable age for display next to offline data.
    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Covers clock skew as well
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// File-per-dataset JSON cache of the last successful fetch.
///
/// Consulted only as an offline fallback for display; never for session or
/// auth decisions.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// Open the cache at the platform cache directory.
    pub fn open_default() -> Result<Self> {
        Self::new(crate::config::cache_dir()?)
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Accounts =====

    pub fn load_accounts(&self) -> Result<Option<CachedData<Vec<Account>>>> {
        self.load("accounts")
    }

    pub fn save_accounts(&self, accounts: &[Account]) -> Result<()> {
        self.save("accounts", &accounts)
    }

    // ===== Entries =====

    pub fn load_entries(&self) -> Result<Option<CachedData<Vec<Entry>>>> {
        self.load("entries")
    }

    pub fn save_entries(&self, entries: &[Entry]) -> Result<()> {
        self.save("entries", &entries)
    }

    // ===== Products =====

    pub fn load_products(&self) -> Result<Option<CachedData<Vec<Product>>>> {
        self.load("products")
    }

    pub fn save_products(&self, products: &[Product]) -> Result<()> {
        self.save("products", &products)
    }

    // ===== User stats =====

    pub fn load_user_stats(&self) -> Result<Option<CachedData<UserStats>>> {
        self.load("user_stats")
    }

    pub fn save_user_stats(&self, stats: &UserStats) -> Result<()> {
        self.save("user_stats", stats)
    }

    /// Remove every cached dataset. Used when switching backends.
    pub fn clear(&self) -> Result<()> {
        for name in ["accounts", "entries", "products", "user_stats"] {
            let path = self.cache_path(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove cache file: {}", name))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_products() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("cache")).unwrap();

        assert!(cache.load_products().unwrap().is_none());

        let products = vec![Product::named("disposable plastic bags")];
        cache.save_products(&products).unwrap();

        let cached = cache.load_products().unwrap().unwrap();
        assert_eq!(cached.data, products);
        assert!(!cached.is_stale());
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_stale_after_threshold() {
        let cached = CachedData {
            data: Vec::<Product>::new(),
            cached_at: Utc::now() - chrono::Duration::minutes(CACHE_STALE_MINUTES + 5),
        };
        assert!(cached.is_stale());
        assert_eq!(cached.age_display(), "1h ago");
    }

    #[test]
    fn test_clear_removes_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("cache")).unwrap();

        cache.save_products(&[Product::named("disposable vehicle tyres")]).unwrap();
        cache.clear().unwrap();
        assert!(cache.load_products().unwrap().is_none());
    }
}
