//! Purchase records: which digital goods each identity has paid for.

pub mod error;
pub mod postgres;
pub mod store;

pub use error::StoreError;
pub use postgres::PgPurchaseStore;
pub use store::{MemoryPurchaseStore, PurchaseStore};
