use crate::domain::model::{Listing, SeenSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Retrieves the current batch of listings from the remote source.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Listing>>;
}

/// Outbound message delivery. Failures are reported, never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

/// Durable storage for the seen-set.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Missing or unreadable storage yields an empty set, never an error.
    async fn load(&self) -> SeenSet;
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn budget_max(&self) -> u32;
    fn poll_interval(&self) -> Duration;
}
