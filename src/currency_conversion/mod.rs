//! Exchange rates between token and fiat currency codes.
//!
//! A conversion is split into hops by [`get_conversion_steps`]. Each hop is
//! priced by, in order: a caller-supplied implied rate, the fixed 1:1 pegs,
//! the on-chain oracle for native pairs, or the fiat rate source. The hop
//! rates are multiplied as exact decimals. Batches share one [`HopRateCache`],
//! so a hop common to many requests is fetched once.

mod api;
mod cache;
mod error;
mod sources;
mod steps;

pub use api::{ConversionRequest, CurrencyConversionApi};
pub use cache::{HopKey, HopRateCache};
pub use error::{ConversionError, RateError};
pub use sources::{ExchangeRateQuery, ExchangeRateSource, HttpRateSource, RateApi};
pub use steps::get_conversion_steps;
