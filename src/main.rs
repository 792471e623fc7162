use std::path::Path;

use anyhow::Context;
use blockchain_api::app::AppContext;
use blockchain_api::cli::{Cli, Commands};
use blockchain_api::config::load_configuration;
use blockchain_api::currency_conversion::ConversionRequest;
use blockchain_api::log::init_logging;
use blockchain_api::transactions::TokenTransactionsQuery;
use blockchain_api::transactions::feed_processor::to_plain_string;
use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Transactions {
            config,
            address,
            token,
            tokens,
            local_currency_code,
        } => {
            let context = build_context(&config)?;
            let query = TokenTransactionsQuery {
                address,
                token,
                tokens,
                local_currency_code,
            };
            let events = context.feed.get_token_transactions(&query).await?;
            println!("{}", serde_json::to_string_pretty(&events)?);
            if context.feed.unknown_transactions() > 0 {
                info!(
                    count = context.feed.unknown_transactions();
                    "Some transactions could not be classified"
                );
            }
            Ok(())
        },
        Commands::ExchangeRate {
            config,
            from,
            to,
            timestamp,
        } => {
            let context = build_context(&config)?;
            let mut request = ConversionRequest::new(from, to);
            request.timestamp = timestamp;
            let rate = context.conversion.get_exchange_rate(&request).await?;
            println!("{}", to_plain_string(&rate));
            Ok(())
        },
    }
}

fn build_context(config_path: &str) -> Result<AppContext, anyhow::Error> {
    let config = load_configuration(Path::new(config_path))
        .with_context(|| format!("Failed to load configuration from {config_path}"))?;
    AppContext::from_config(&config)
}
