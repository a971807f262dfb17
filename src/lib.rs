pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{InliSource, JsonFileStore, TelegramNotifier};
pub use config::EnvConfig;
pub use core::watcher::Watcher;
pub use domain::model::{Listing, SeenSet};
pub use utils::error::{Result, WatchError};
