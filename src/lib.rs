pub mod app;
pub mod cli;
pub mod config;
pub mod currency_conversion;
pub mod http;
pub mod log;
pub mod models;
pub mod registry;
pub mod sources;
pub mod transactions;

pub use crate::app::AppContext;
pub use crate::currency_conversion::{ConversionRequest, CurrencyConversionApi};
pub use crate::transactions::{Event, FeedError, TokenTransactionsQuery, TokenTransactionsService};
