//! Contract-address resolution.
//!
//! A [`ContractAddressRegistry`] resolves the role to address map once, and
//! [`ContractAddressCache`] holds the validated result for the life of the
//! process. The cache is built at startup and shared by reference.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::ContractsConfig;
use crate::models::{ContractAddresses, ContractRole};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Cannot find {0} address")]
    MissingRole(ContractRole),

    #[error("Contract registry unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ContractAddressRegistry: Send + Sync {
    /// Resolve every role the registry knows about. Addresses may be in any case.
    async fn resolve(&self) -> Result<HashMap<ContractRole, String>, RegistryError>;
}

impl ContractAddresses {
    /// Validate a resolved map. Fails on the first missing required role.
    pub fn from_resolved(mut resolved: HashMap<ContractRole, String>) -> Result<Self, RegistryError> {
        let mut take = |role: ContractRole| resolved.remove(&role).map(|address| address.to_lowercase());
        let mut required = |role: ContractRole| take(role).ok_or(RegistryError::MissingRole(role));

        let attestations = required(ContractRole::Attestations)?;
        let escrow = required(ContractRole::Escrow)?;
        let exchange = required(ContractRole::Exchange)?;
        let governance = required(ContractRole::Governance)?;
        let reserve = required(ContractRole::Reserve)?;

        Ok(Self {
            attestations,
            escrow,
            exchange,
            exchange_eur: resolved.remove(&ContractRole::ExchangeEUR).map(|a| a.to_lowercase()),
            governance,
            reserve,
            accounts: resolved.remove(&ContractRole::Accounts).map(|a| a.to_lowercase()),
        })
    }
}

/// Registry backed by the `[contracts]` configuration section.
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    addresses: HashMap<ContractRole, String>,
}

impl StaticRegistry {
    pub fn new(config: &ContractsConfig) -> Self {
        let addresses = [
            (ContractRole::Accounts, &config.accounts),
            (ContractRole::Attestations, &config.attestations),
            (ContractRole::Escrow, &config.escrow),
            (ContractRole::Exchange, &config.exchange),
            (ContractRole::ExchangeEUR, &config.exchange_eur),
            (ContractRole::Governance, &config.governance),
            (ContractRole::Reserve, &config.reserve),
        ]
        .into_iter()
        .filter_map(|(role, address)| {
            address
                .as_ref()
                .filter(|a| !a.trim().is_empty())
                .map(|a| (role, a.trim().to_string()))
        })
        .collect();
        Self { addresses }
    }
}

#[async_trait]
impl ContractAddressRegistry for StaticRegistry {
    async fn resolve(&self) -> Result<HashMap<ContractRole, String>, RegistryError> {
        Ok(self.addresses.clone())
    }
}

/// Resolves contract addresses on first use and keeps them forever.
pub struct ContractAddressCache {
    registry: Arc<dyn ContractAddressRegistry>,
    addresses: OnceCell<Arc<ContractAddresses>>,
}

impl ContractAddressCache {
    pub fn new(registry: Arc<dyn ContractAddressRegistry>) -> Self {
        Self {
            registry,
            addresses: OnceCell::new(),
        }
    }

    /// The validated address map. A failed resolution is not cached, so the next call retries.
    pub async fn get(&self) -> Result<Arc<ContractAddresses>, RegistryError> {
        self.addresses
            .get_or_try_init(|| async {
                let resolved = self.registry.resolve().await?;
                match ContractAddresses::from_resolved(resolved) {
                    Ok(addresses) => {
                        info!(
                            exchange_eur = addresses.exchange_eur.is_some(),
                            accounts = addresses.accounts.is_some();
                            "Contract addresses resolved"
                        );
                        Ok(Arc::new(addresses))
                    },
                    Err(e) => {
                        warn!(kind = "registry"; "Contract address resolution failed: {}", e);
                        Err(e)
                    },
                }
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config() -> ContractsConfig {
        ContractsConfig {
            attestations: Some("0xA1".to_string()),
            escrow: Some("0xE1".to_string()),
            exchange: Some("0xE2".to_string()),
            exchange_eur: None,
            governance: Some("0x90".to_string()),
            reserve: Some("0x5E".to_string()),
            accounts: Some(" ".to_string()),
        }
    }

    struct CountingRegistry {
        inner: StaticRegistry,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContractAddressRegistry for CountingRegistry {
        async fn resolve(&self) -> Result<HashMap<ContractRole, String>, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve().await
        }
    }

    #[tokio::test]
    async fn test_addresses_are_lowercased_and_optional_roles_absent() {
        let cache = ContractAddressCache::new(Arc::new(StaticRegistry::new(&config())));
        let addresses = cache.get().await.unwrap();
        assert_eq!(addresses.escrow, "0xe1");
        assert_eq!(addresses.reserve, "0x5e");
        assert_eq!(addresses.exchange_eur, None);
        assert_eq!(addresses.accounts, None);
    }

    #[tokio::test]
    async fn test_missing_required_role_is_fatal() {
        let mut config = config();
        config.escrow = None;
        let cache = ContractAddressCache::new(Arc::new(StaticRegistry::new(&config)));
        let err = cache.get().await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot find Escrow address");
    }

    #[tokio::test]
    async fn test_registry_is_resolved_once() {
        let registry = Arc::new(CountingRegistry {
            inner: StaticRegistry::new(&config()),
            calls: AtomicUsize::new(0),
        });
        let cache = ContractAddressCache::new(registry.clone());
        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
    }
}
