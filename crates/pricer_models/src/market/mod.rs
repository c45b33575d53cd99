//! Market and dividend model.
//!
//! - [`DividendPolicy`], [`Dividend`], [`DividendSchedule`]: discrete dividends
//! - [`Market`], [`MarketBuilder`]: validated spot/rate/volatility/horizon snapshot
//! - [`MarketError`]: validation failures

pub mod dividend;
pub mod error;
pub mod model;

pub use dividend::{Dividend, DividendPolicy, DividendSchedule, DEFAULT_LAMBDA};
pub use error::MarketError;
pub use model::{Market, MarketBuilder};
