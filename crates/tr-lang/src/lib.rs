mod compiler;
mod error;
pub mod explain;
pub mod parse_utils;
pub mod registry;
mod rewrite;
pub mod template;
pub mod window;

pub use compiler::{CompiledTrend, compile_trend, significance_formulas};
pub use error::{TrendError, TrendResult};
pub use registry::{TrendCall, TrendColumn, TrendFunctionSpec, lookup, parse_trend_function};
pub use rewrite::{DEGREES_OF_FREEDOM_TOKEN, T_SCORE_TOKEN, rewrite_query};
pub use window::{DATE_FORMAT, TimeWindow, WindowBounds, split_window};
