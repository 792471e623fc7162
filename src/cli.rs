use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blockchain-api")]
#[command(about = "Token transaction feed and exchange rates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the token feed of an address as JSON
    Transactions {
        #[arg(short, long, help = "Path to the config file", default_value = "data/config.toml")]
        config: String,
        #[arg(short, long, help = "Address to build the feed for")]
        address: String,
        #[arg(short, long, help = "Only report this currency", conflicts_with = "tokens")]
        token: Option<String>,
        #[arg(long, value_delimiter = ',', help = "Comma separated currencies to report (e.g., cUSD,cEUR)")]
        tokens: Option<Vec<String>>,
        #[arg(short, long, help = "Currency to value every amount in (e.g., MXN)")]
        local_currency_code: Option<String>,
    },
    /// Print the exchange rate between two currencies
    ExchangeRate {
        #[arg(short, long, help = "Path to the config file", default_value = "data/config.toml")]
        config: String,
        #[arg(short, long, help = "Currency to convert from")]
        from: String,
        #[arg(short = 'o', long, help = "Currency to convert to")]
        to: String,
        #[arg(long, help = "Milliseconds since the Unix epoch. Defaults to the latest rate")]
        timestamp: Option<i64>,
    },
}
