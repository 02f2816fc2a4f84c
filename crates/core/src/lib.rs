pub mod config;
pub mod error;
pub mod signal_bus;
pub mod types;

pub use config::AppConfig;
pub use error::{TaperError, TaperResult};
