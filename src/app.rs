use std::sync::Arc;

use anyhow::Context;
use log::debug;
use url::Url;

use crate::config::AppConfig;
use crate::currency_conversion::{CurrencyConversionApi, HttpRateSource, RateApi};
use crate::registry::{ContractAddressCache, StaticRegistry};
use crate::sources::{BlockscoutClient, KnownAddressDirectory};
use crate::transactions::TokenTransactionsService;

/// The services behind the CLI, wired from configuration.
pub struct AppContext {
    pub feed: TokenTransactionsService,
    pub conversion: Arc<CurrencyConversionApi>,
}

impl AppContext {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let blockscout_url = parse_url(&config.blockscout.url, "blockscout.url")?;
        let source = BlockscoutClient::new(
            blockscout_url,
            config.blockscout.max_retries,
            config.blockscout.timeout(),
        )
        .context("Failed to create Blockscout client")?;

        let rates = &config.exchange_rates;
        let on_chain = HttpRateSource::new(
            parse_url(&rates.on_chain_url, "exchange_rates.on_chain_url")?,
            RateApi::OnChain,
            rates.max_retries,
            rates.timeout(),
        )
        .context("Failed to create on-chain rate client")?;
        let fiat = HttpRateSource::new(
            parse_url(&rates.fiat_url, "exchange_rates.fiat_url")?,
            RateApi::Fiat {
                access_key: rates.fiat_access_key.clone().filter(|k| !k.is_empty()),
            },
            rates.max_retries,
            rates.timeout(),
        )
        .context("Failed to create fiat rate client")?;
        let conversion = Arc::new(CurrencyConversionApi::new(Arc::new(on_chain), Arc::new(fiat)));

        let contracts = Arc::new(ContractAddressCache::new(Arc::new(StaticRegistry::new(
            &config.contracts,
        ))));
        let directory = Arc::new(KnownAddressDirectory::new(&config.known_addresses));
        debug!(known_addresses = directory.len(); "Loaded address directory");

        let feed = TokenTransactionsService::new(
            Arc::new(source),
            contracts,
            directory,
            conversion.clone(),
            config.feed.faucet_address.clone().filter(|a| !a.is_empty()),
        );

        Ok(Self { feed, conversion })
    }
}

fn parse_url(value: &str, key: &str) -> anyhow::Result<Url> {
    Url::parse(value).with_context(|| format!("Invalid URL for {key}: {value}"))
}
