//! Operator client for the civic ledger service.

pub mod utils;

pub use utils::*;
