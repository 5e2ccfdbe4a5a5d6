// Optional result caching
//
// The engine only produces the key; real backends live outside the crate.
// The key is a content fingerprint of the input, deliberately distinct from
// the per-run analysis id.

use crate::model::{DesignContext, DesignSpec};
use crate::synthesis::SynthesizedContext;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// External key-value store for synthesized results
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<SynthesizedContext>;
    async fn set(&self, key: &str, value: SynthesizedContext, ttl: Duration);
}

/// Stable cache key for a design spec + context pair
///
/// SHA-256 over the canonical JSON serialization. Byte-identical input gives
/// the same key across runs and processes; the style bag serializes in sorted
/// key order so hashing is deterministic.
pub fn fingerprint(design_spec: &DesignSpec, design_context: &DesignContext) -> String {
    let mut hasher = Sha256::new();
    if let Ok(bytes) = serde_json::to_vec(design_spec) {
        hasher.update(&bytes);
    }
    if let Ok(bytes) = serde_json::to_vec(design_context) {
        hasher.update(&bytes);
    }
    format!("{:x}", hasher.finalize())
}

/// In-process cache for tests and the CLI
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (SynthesizedContext, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<SynthesizedContext> {
        let entries = self.entries.read().await;
        entries.get(key).and_then(|(value, expires_at)| {
            if Instant::now() < *expires_at {
                Some(value.clone())
            } else {
                None
            }
        })
    }

    async fn set(&self, key: &str, value: SynthesizedContext, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), (value, Instant::now() + ttl));
    }
}
