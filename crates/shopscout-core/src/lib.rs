pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::ShopscoutConfig;
pub use error::{Result, ShopscoutError};
pub use events::ViewEvent;
pub use types::*;
