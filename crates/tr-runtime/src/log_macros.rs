//! Domain-aware logging macros for the runtime: `sys` (process setup) and
//! `conf` (config and fixture loading).

#[doc(hidden)]
macro_rules! tr_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        tracing::$level!(domain = stringify!($domain), $($field)*)
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
