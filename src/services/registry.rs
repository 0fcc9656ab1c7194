use dashmap::DashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, warn};

use super::cascade::TierCascade;
use crate::error::{StatsError, StatsResult};

/// Shared handle to one symbol's cascade.
pub type SharedCascade = Arc<RwLock<TierCascade>>;

/// Bounded map from symbol name to its cascade.
///
/// Symbols are case-sensitive and are never removed once created.
pub struct SymbolRegistry {
    cascades: DashMap<String, SharedCascade>,
    /// Serializes creation so the symbol cap holds under racing callers.
    creation: Mutex<()>,
    max_symbols: usize,
}

impl SymbolRegistry {
    pub fn new(max_symbols: usize) -> Self {
        Self {
            cascades: DashMap::new(),
            creation: Mutex::new(()),
            max_symbols,
        }
    }

    /// Return the symbol's cascade, creating it if there is room.
    pub fn get_or_create(&self, symbol: &str) -> StatsResult<SharedCascade> {
        if let Some(cascade) = self.lookup(symbol) {
            return Ok(cascade);
        }

        let _guard = self
            .creation
            .lock()
            .map_err(|_| StatsError::Internal("symbol registry lock poisoned".to_string()))?;

        // Another caller may have created it while we waited.
        if let Some(cascade) = self.lookup(symbol) {
            return Ok(cascade);
        }

        if self.cascades.len() >= self.max_symbols {
            warn!(
                "Symbol '{}' rejected: {} symbols already tracked",
                symbol, self.max_symbols
            );
            return Err(StatsError::SymbolCapacityExceeded);
        }

        let cascade: SharedCascade = Arc::new(RwLock::new(TierCascade::new()));
        self.cascades.insert(symbol.to_string(), cascade.clone());
        info!("Tracking new symbol '{}'", symbol);
        Ok(cascade)
    }

    /// Look up an existing symbol.
    pub fn lookup(&self, symbol: &str) -> Option<SharedCascade> {
        self.cascades.get(symbol).map(|entry| entry.value().clone())
    }

    /// Number of tracked symbols.
    pub fn symbol_count(&self) -> usize {
        self.cascades.len()
    }

    /// Tracked symbol names, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.cascades.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        symbols
    }
}
