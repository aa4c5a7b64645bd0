//! DEX domain - XRPL order book liquidity

mod order_book;

pub use order_book::{BookTotals, OrderBookScanner};
