#[macro_use]
mod log_macros;

pub mod error;
pub mod fixture;
pub mod replay;
pub mod service;
pub mod tracing_init;

pub use error::{RuntimeError, RuntimeReason, RuntimeResult};
pub use fixture::{EngineCall, Fixture, FixtureEngine};
pub use replay::{ReplayOutput, replay};
pub use service::{Mode, TrendsService};
