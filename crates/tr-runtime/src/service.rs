use std::fmt;
use std::sync::Arc;

use orion_error::compat_prelude::*;
use orion_error::op_context;
use orion_error::prelude::*;

use tr_config::TrendsConfig;
use tr_core::{
    PlainResults, QueryEngine, StatsResults, TrendsEndpoint, TrendsOutcome, TrendsRequest,
};
use tr_lang::explain::{TrendExplanation, explain_trend};

use crate::error::RuntimeResult;

/// Which response flavour to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Ranked events with metadata.
    #[default]
    Plain,
    /// Ranked events plus top-N time series.
    Stats,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both trends endpoints bound to one engine.
pub struct TrendsService {
    engine: Arc<dyn QueryEngine>,
    plain: TrendsEndpoint<PlainResults>,
    stats: TrendsEndpoint<StatsResults>,
}

impl TrendsService {
    pub fn new(config: &TrendsConfig, engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            engine,
            plain: TrendsEndpoint::new(PlainResults, config),
            stats: TrendsEndpoint::new(StatsResults::new(&config.stats, &config.query), config),
        }
    }

    /// Serve one request in the given mode.
    pub async fn handle(&self, mode: Mode, request: &TrendsRequest) -> RuntimeResult<TrendsOutcome> {
        let mut op = op_context!("trends-request").with_auto_log();
        op.record("mode", mode.as_str());
        if let Some(function) = &request.trend_function {
            op.record("trend_function", function.as_str());
        }

        let engine = self.engine.as_ref();
        let outcome = match mode {
            Mode::Plain => self.plain.get(engine, request).await,
            Mode::Stats => self.stats.get(engine, request).await,
        }
        .err_conv()?;

        op.mark_suc();
        Ok(outcome)
    }

    /// Compile a request without querying, for inspection.
    pub fn explain(&self, request: &TrendsRequest) -> RuntimeResult<TrendExplanation> {
        let prepared = self.plain.prepare(request).err_conv()?;
        Ok(explain_trend(&prepared.compiled, &prepared.query))
    }
}
