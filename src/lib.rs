#![doc(test(attr(deny(warnings))))]

//! Money Calculator offers a FIFO point ledger and monthly money series
//! (inflation adjustment, foreign exchange) plus a small command shell.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod points;
pub mod series;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Money Calculator tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
