pub mod inli;
pub mod seen_file;
pub mod telegram;

pub use inli::InliSource;
pub use seen_file::JsonFileStore;
pub use telegram::TelegramNotifier;
