use orion_error::compat_prelude::*;
use orion_error::prelude::*;
use serde::{Serialize, Serializer};

use tr_config::{HumanDuration, QueryConfig, StatsConfig, TrendsConfig};
use tr_lang::{CompiledTrend, compile_trend, parse_trend_function, rewrite_query, split_window};

use crate::assemble::{ResultHandler, TrendsResponse};
use crate::engine::{EventResultSet, EventsQuery, QueryEngine};
use crate::error::{CoreReason, CoreResult, trend_error};
use crate::paginate::{Cursor, OffsetPaginator, Page};
use crate::request::{QueryParams, TrendsRequest};
use crate::rollup::resolve_rollup;

// ---------------------------------------------------------------------------
// PreparedTrend
// ---------------------------------------------------------------------------

/// A request after window split, compilation and filter rewriting.
#[derive(Debug, Clone)]
pub struct PreparedTrend {
    pub compiled: CompiledTrend,
    /// Caller filter with the significance pseudo-functions expanded.
    pub query: String,
    pub params: QueryParams,
    pub orderby: Vec<String>,
    /// Only resolved for handlers that fetch series.
    pub rollup: Option<HumanDuration>,
    pub paginator: OffsetPaginator,
}

// ---------------------------------------------------------------------------
// TrendsOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum TrendsOutcome {
    /// The caller's scope has no queryable projects. Serialized as `[]`.
    NoProjects,
    Page(Page<TrendsResponse>),
}

impl Serialize for TrendsOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoProjects => serializer.collect_seq(std::iter::empty::<()>()),
            Self::Page(page) => page.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// TrendsEndpoint
// ---------------------------------------------------------------------------

/// Two-step trends pipeline: rank events with the compiled query, then hand
/// the page to a [`ResultHandler`].
pub struct TrendsEndpoint<H> {
    handler: H,
    query: QueryConfig,
    stats: StatsConfig,
}

impl<H: ResultHandler> TrendsEndpoint<H> {
    pub fn new(handler: H, config: &TrendsConfig) -> Self {
        Self {
            handler,
            query: config.query.clone(),
            stats: config.stats.clone(),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Resolve everything that can fail on caller input. No engine call is
    /// made here, so a bad trend function is rejected before any query.
    pub fn prepare(&self, request: &TrendsRequest) -> CoreResult<PreparedTrend> {
        request.validate()?;
        let window = split_window(request.params.start, request.params.end);

        let raw = request
            .trend_function
            .as_deref()
            .unwrap_or(self.query.default_trend_function.as_str());
        let call = parse_trend_function(raw).map_err(trend_error)?;
        let compiled = compile_trend(&call, &window, &request.field).map_err(trend_error)?;

        let query = rewrite_query(
            request.query.as_deref().unwrap_or_default(),
            &compiled.t_score,
            &compiled.degrees_of_freedom,
        );

        let rollup = if self.handler.needs_rollup() {
            Some(resolve_rollup(
                window.duration(),
                request.interval,
                self.stats.max_points,
            )?)
        } else {
            None
        };
        let paginator = OffsetPaginator::new(request.per_page, request.cursor.as_deref())?;

        tr_debug!(
            req,
            trend_function = raw,
            middle = %compiled.bounds.middle,
            expressions = compiled.expressions.len(),
            "trend compiled"
        );

        Ok(PreparedTrend {
            compiled,
            query,
            params: request.params.clone(),
            orderby: request.orderby(),
            rollup,
            paginator,
        })
    }

    /// Step one: run the ranked query for the current page.
    pub async fn rank(
        &self,
        engine: &dyn QueryEngine,
        prepared: &PreparedTrend,
    ) -> CoreResult<(EventResultSet, Cursor, Cursor)> {
        let window = prepared.paginator.window();
        let request = EventsQuery {
            selected_columns: prepared.compiled.expressions.clone(),
            query: prepared.query.clone(),
            params: prepared.params.clone(),
            orderby: prepared.orderby.clone(),
            offset: window.offset,
            limit: window.limit,
            referrer: self.query.events_referrer.clone(),
        };

        let mut events = engine
            .query(&request)
            .await
            .inspect_err(|e| tr_warn!(query, error = %e, "events query failed"))
            .owe(CoreReason::UpstreamQuery)?;
        let (next, prev) = prepared.paginator.finish(&mut events.data);
        Ok((events, next, prev))
    }

    /// Run the full pipeline for one request.
    #[tracing::instrument(
        name = "trends.get",
        skip_all,
        fields(projects = request.params.project_ids.len())
    )]
    pub async fn get(
        &self,
        engine: &dyn QueryEngine,
        request: &TrendsRequest,
    ) -> CoreResult<TrendsOutcome> {
        if !request.params.has_projects() {
            tr_info!(req, "no accessible projects, returning empty result");
            return Ok(TrendsOutcome::NoProjects);
        }

        let prepared = self.prepare(request)?;
        let (events, next, prev) = self.rank(engine, &prepared).await?;
        let ranked = events.len();

        // Step two only starts once the ranked page is complete.
        let results = self.handler.on_results(engine, &prepared, events).await?;

        tr_info!(
            req,
            trend_function = %prepared.compiled.call.raw,
            ranked,
            has_next = next.has_results,
            "trends request complete"
        );
        Ok(TrendsOutcome::Page(Page {
            results,
            next,
            prev,
        }))
    }
}
