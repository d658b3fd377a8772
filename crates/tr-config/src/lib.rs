pub mod logging;
pub mod query;
pub mod stats;
pub mod trends;
pub mod types;
mod validate;

pub use logging::{LogFormat, LoggingConfig};
pub use query::QueryConfig;
pub use stats::StatsConfig;
pub use trends::TrendsConfig;
pub use types::HumanDuration;
