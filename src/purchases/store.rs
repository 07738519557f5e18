use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use tokio::sync::RwLock;

use super::error::StoreError;

/// Per-identity purchased-items sets.
///
/// `grant` must be an atomic, additive set-union: concurrent grants for the
/// same identity never lose an entry, and granting an item twice leaves it
/// present exactly once.
#[async_trait]
pub trait PurchaseStore: Send + Sync + Debug {
    /// Add `item_id` to the identity's purchased-items set
    async fn grant(&self, user_id: &str, item_id: &str) -> Result<(), StoreError>;

    /// Current purchased-items set, sorted
    async fn purchased_items(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// Connectivity probe for the health endpoint
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// In-process store for development and tests.
///
/// User documents are created on first grant.
#[derive(Debug, Default)]
pub struct MemoryPurchaseStore {
    users: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl MemoryPurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PurchaseStore for MemoryPurchaseStore {
    async fn grant(&self, user_id: &str, item_id: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        users
            .entry(user_id.to_string())
            .or_default()
            .insert(item_id.to_string());
        Ok(())
    }

    async fn purchased_items(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
