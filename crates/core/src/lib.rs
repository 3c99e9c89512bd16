pub mod config;
pub mod error;
pub mod loader;
pub mod types;

pub use config::AppConfig;
pub use error::{DashboardError, DashboardResult};
pub use loader::{load_dataset, read_dataset};
pub use types::{Dataset, MonthKey, Record, SubscriptionType};
