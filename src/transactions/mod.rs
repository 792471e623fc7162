//! Token transaction processing.
//!
//! - [`feed_processor`]: classifies raw transfers and builds the token feed

pub mod feed_processor;

pub use feed_processor::{Event, FeedError, TokenTransactionsQuery, TokenTransactionsService};
