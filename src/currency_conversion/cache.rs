use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use bigdecimal::BigDecimal;
use tokio::sync::OnceCell;

use super::error::ConversionError;

/// `(from, to, timestamp)` of one upstream hop.
pub type HopKey = (String, String, Option<i64>);

/// Upstream hop rates shared by the conversions of one batch.
///
/// Concurrent lookups of the same hop wait on a single fetch. Failed fetches
/// are not stored, so a later lookup tries again.
#[derive(Debug, Default)]
pub struct HopRateCache {
    entries: Mutex<HashMap<HopKey, Arc<OnceCell<BigDecimal>>>>,
}

impl HopRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hops looked up so far.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: HopKey, fetch: F) -> Result<BigDecimal, ConversionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<BigDecimal, ConversionError>>,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.entry(key).or_default().clone()
        };
        cell.get_or_try_init(fetch).await.cloned()
    }
}
