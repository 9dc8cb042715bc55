//! Service layer
//!
//! The ledger engine and the batch replay component built on it.

pub mod batch;
pub mod ledger;

pub use batch::{BatchProcessor, BatchSummary};
pub use ledger::LedgerService;
