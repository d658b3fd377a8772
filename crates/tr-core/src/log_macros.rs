//! Domain-aware logging macros.
//!
//! Each macro injects a `domain` field so events can be filtered by the part
//! of the request they belong to: `req` (pipeline steps), `query` (primary
//! engine call), `stats` (top-N time-series enrichment).
//!
//! ```ignore
//! tr_info!(req, trend_function = %raw, "trend compiled");
//! tr_warn!(query, error = %e, "events query failed");
//! tr_debug!(stats, keys = n, "fetching top-event series");
//! ```

#[doc(hidden)]
macro_rules! tr_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        tracing::$level!(domain = stringify!($domain), $($field)*)
    };
}

macro_rules! tr_warn {
    ($domain:ident, $($rest:tt)*) => {
        tr_log!(warn, $domain, $($rest)*)
    };
}

macro_rules! tr_info {
    ($domain:ident, $($rest:tt)*) => {
        tr_log!(info, $domain, $($rest)*)
    };
}

macro_rules! tr_debug {
    ($domain:ident, $($rest:tt)*) => {
        tr_log!(debug, $domain, $($rest)*)
    };
}
