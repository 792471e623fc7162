//! Turns raw transfer records into the token feed of one address.
//!
//! Records are parsed into [`Transaction`]s, classified against the ordered
//! rule table in [`rules`], folded by the [`TransactionAggregator`] so bare
//! contract calls contribute their fees to the transfer that follows, and
//! finally built into [`Event`]s by the [`EventBuilder`].

mod aggregator;
mod builder;
mod classifier;
mod error;
mod formatting;
mod input;
mod processor;
pub mod rules;
mod transaction;
mod transfers;
mod types;

pub use aggregator::TransactionAggregator;
pub use builder::{EventBuilder, IMPLIED_RATE_PAIR, choose_token_to_show_in_exchange, format_fees};
pub use classifier::{ClassifiedTransaction, classify, classify_all};
pub use error::{ClassificationError, FeedError, TransactionParseError};
pub use formatting::{TOKEN_DECIMALS, base_units_to_decimal, parse_base_units, to_plain_string};
pub use input::{Input, method_selector};
pub use processor::{TokenTransactionsQuery, TokenTransactionsService};
pub use rules::{ClassificationContext, TransactionKind};
pub use transaction::Transaction;
pub use transfers::{TransferCollection, TransfersNavigator};
pub use types::{Event, EventType, ExchangeEvent, Fee, FeeType, FormattedFee, LocalAmount, MoneyAmount, TransferEvent};
