//! Symbol Constraints Provider
//!
//! TTL cache in front of the gateway's symbol metadata. Snapshots are shared
//! as `Arc<SymbolConstraints>`; a refresh swaps the whole `Arc` under a write
//! lock, so readers never see a partially updated snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;

use crate::application::ports::{GatewayError, TradingGatewayPort};
use crate::domain::shared::Symbol;
use crate::domain::symbol::SymbolConstraints;
use crate::error::Failure;

/// Default time a snapshot is served from cache.
pub const DEFAULT_CONSTRAINTS_TTL: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct CachedConstraints {
    constraints: Arc<SymbolConstraints>,
    fetched_at: Instant,
}

/// Cached access to per-symbol trading constraints.
pub struct SymbolConstraintsProvider<G>
where
    G: TradingGatewayPort,
{
    gateway: Arc<G>,
    ttl: Duration,
    cache: RwLock<HashMap<Symbol, CachedConstraints>>,
}

impl<G> SymbolConstraintsProvider<G>
where
    G: TradingGatewayPort,
{
    /// Create a provider with the default TTL.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_ttl(gateway, DEFAULT_CONSTRAINTS_TTL)
    }

    /// Create a provider with a custom TTL. A zero TTL disables caching.
    #[must_use]
    pub fn with_ttl(gateway: Arc<G>, ttl: Duration) -> Self {
        Self {
            gateway,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get constraints for `symbol`, fetching them if the cache is cold or stale.
    ///
    /// Reads are not retried.
    ///
    /// # Errors
    ///
    /// Returns a failure if the gateway call fails or the snapshot is unusable.
    pub async fn get(&self, symbol: &Symbol) -> Result<Arc<SymbolConstraints>, Failure> {
        if let Some(cached) = self.cached(symbol) {
            return Ok(cached);
        }

        let constraints = self.gateway.get_symbol_constraints(symbol).await?;
        constraints
            .validate()
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;

        let constraints = Arc::new(constraints);
        self.cache.write().insert(
            symbol.clone(),
            CachedConstraints {
                constraints: Arc::clone(&constraints),
                fetched_at: Instant::now(),
            },
        );

        tracing::debug!(
            symbol = %symbol,
            point = %constraints.point,
            digits = constraints.digits,
            volume_step = %constraints.volume_step,
            "Symbol constraints refreshed"
        );

        Ok(constraints)
    }

    /// Drop the cached snapshot for `symbol`.
    pub fn invalidate(&self, symbol: &Symbol) {
        self.cache.write().remove(symbol);
    }

    /// Drop every cached snapshot.
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    fn cached(&self, symbol: &Symbol) -> Option<Arc<SymbolConstraints>> {
        let cache = self.cache.read();
        cache
            .get(symbol)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.constraints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTradingGatewayPort;
    use crate::error::FailureKind;
    use rust_decimal_macros::dec;

    fn eurusd() -> SymbolConstraints {
        SymbolConstraints {
            symbol: Symbol::new("EURUSD"),
            point: dec!(0.00001),
            digits: 5,
            volume_min: dec!(0.01),
            volume_step: dec!(0.01),
            volume_max: dec!(100),
            tick_value: dec!(1),
            tick_size: dec!(0.00001),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_read_is_served_from_cache() {
        let mut gateway = MockTradingGatewayPort::new();
        gateway
            .expect_get_symbol_constraints()
            .times(1)
            .returning(|_| Ok(eurusd()));
        let provider = SymbolConstraintsProvider::new(Arc::new(gateway));
        let symbol = Symbol::new("EURUSD");

        let first = provider.get(&symbol).await.expect("should fetch");
        let second = provider.get(&symbol).await.expect("should hit cache");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_refetched() {
        let mut gateway = MockTradingGatewayPort::new();
        gateway
            .expect_get_symbol_constraints()
            .times(2)
            .returning(|_| Ok(eurusd()));
        let provider =
            SymbolConstraintsProvider::with_ttl(Arc::new(gateway), Duration::from_secs(1));
        let symbol = Symbol::new("EURUSD");

        let first = provider.get(&symbol).await.expect("should fetch");
        tokio::time::advance(Duration::from_secs(2)).await;
        let second = provider.get(&symbol).await.expect("should refetch");

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_forces_refetch() {
        let mut gateway = MockTradingGatewayPort::new();
        gateway
            .expect_get_symbol_constraints()
            .times(2)
            .returning(|_| Ok(eurusd()));
        let provider = SymbolConstraintsProvider::new(Arc::new(gateway));
        let symbol = Symbol::new("EURUSD");

        provider.get(&symbol).await.expect("should fetch");
        provider.invalidate(&symbol);
        provider.get(&symbol).await.expect("should refetch");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unusable_snapshot_is_not_cached() {
        let mut gateway = MockTradingGatewayPort::new();
        gateway
            .expect_get_symbol_constraints()
            .times(2)
            .returning(|_| {
                let mut constraints = eurusd();
                constraints.tick_size = dec!(0);
                Ok(constraints)
            });
        let provider = SymbolConstraintsProvider::new(Arc::new(gateway));
        let symbol = Symbol::new("EURUSD");

        let failure = provider.get(&symbol).await.expect_err("should reject");
        assert_eq!(failure.kind, FailureKind::Business);
        assert_eq!(failure.attempts, 1);
        assert!(provider.get(&symbol).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gateway_error_is_classified() {
        let mut gateway = MockTradingGatewayPort::new();
        gateway
            .expect_get_symbol_constraints()
            .returning(|s| Err(GatewayError::NotFound(s.to_string())));
        let provider = SymbolConstraintsProvider::new(Arc::new(gateway));

        let failure = provider
            .get(&Symbol::new("XXXYYY"))
            .await
            .expect_err("should fail");

        assert_eq!(failure.kind, FailureKind::NotFound);
    }
}
