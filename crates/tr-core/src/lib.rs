#[macro_use]
mod log_macros;

pub mod assemble;
pub mod engine;
pub mod error;
pub mod meta;
pub mod paginate;
pub mod pipeline;
pub mod request;
pub mod rollup;

pub use assemble::{PlainResults, ResultHandler, StatsResults, TrendStatsResponse, TrendsResponse};
pub use engine::{EventResultSet, EventsQuery, QueryEngine, TimeSeries, TimeseriesQuery};
pub use error::{CoreError, CoreReason, CoreResult};
pub use pipeline::{PreparedTrend, TrendsEndpoint, TrendsOutcome};
pub use request::{QueryParams, TrendsRequest};
