pub mod filter;
pub mod watcher;

pub use crate::domain::model::{Listing, SeenSet};
pub use crate::domain::ports::{ConfigProvider, ListingSource, Notifier, SeenStore};
pub use crate::utils::error::Result;
