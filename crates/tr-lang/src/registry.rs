use std::fmt;

use crate::error::{TrendError, TrendResult};
use crate::parse_utils::function_call;
use crate::template::Template;

use winnow::Parser;

/// Registry entry: the expression template and the alias prefix its output
/// column is tagged with (the window index is appended to the prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendFunctionSpec {
    pub name: &'static str,
    pub template: &'static str,
    pub alias: Option<&'static str>,
}

impl TrendFunctionSpec {
    /// Alias of the evaluation in window `index`, e.g. `percentile_range_1`.
    pub fn alias_for(&self, index: u8) -> Option<String> {
        self.alias.map(|prefix| format!("{prefix}{index}"))
    }
}

// ---------------------------------------------------------------------------
// TrendColumn dispatch table
// ---------------------------------------------------------------------------

/// Every known trend column. The first group is caller-selectable through
/// `trendFunction`; `Percentage`, `TScore` and `DegreesOfFreedom` are
/// orchestration-only formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendColumn {
    P50,
    P75,
    P95,
    P99,
    Avg,
    UserMisery,
    CountRange,
    VarianceRange,
    Percentage,
    TScore,
    DegreesOfFreedom,
}

impl TrendColumn {
    pub const ALL: [TrendColumn; 11] = [
        Self::P50,
        Self::P75,
        Self::P95,
        Self::P99,
        Self::Avg,
        Self::UserMisery,
        Self::CountRange,
        Self::VarianceRange,
        Self::Percentage,
        Self::TScore,
        Self::DegreesOfFreedom,
    ];

    pub fn spec(self) -> &'static TrendFunctionSpec {
        match self {
            Self::P50 => &P50,
            Self::P75 => &P75,
            Self::P95 => &P95,
            Self::P99 => &P99,
            Self::Avg => &AVG,
            Self::UserMisery => &USER_MISERY,
            Self::CountRange => &COUNT_RANGE,
            Self::VarianceRange => &VARIANCE_RANGE,
            Self::Percentage => &PERCENTAGE,
            Self::TScore => &T_SCORE,
            Self::DegreesOfFreedom => &DEGREES_OF_FREEDOM,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn is_selectable(self) -> bool {
        !matches!(
            self,
            Self::Percentage | Self::TScore | Self::DegreesOfFreedom
        )
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Caller arguments the template consumes positionally.
    pub fn arity(self) -> TrendResult<usize> {
        Ok(Template::parse(self.spec().template)?.positional_arity())
    }
}

impl fmt::Display for TrendColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const DURATION_PERCENTILE_ALIAS: &str = "percentile_range_";

const P50: TrendFunctionSpec = TrendFunctionSpec {
    name: "p50",
    template: "percentile_range(transaction.duration, 0.5, {start}, {end}, {index})",
    alias: Some(DURATION_PERCENTILE_ALIAS),
};
const P75: TrendFunctionSpec = TrendFunctionSpec {
    name: "p75",
    template: "percentile_range(transaction.duration, 0.75, {start}, {end}, {index})",
    alias: Some(DURATION_PERCENTILE_ALIAS),
};
const P95: TrendFunctionSpec = TrendFunctionSpec {
    name: "p95",
    template: "percentile_range(transaction.duration, 0.95, {start}, {end}, {index})",
    alias: Some(DURATION_PERCENTILE_ALIAS),
};
const P99: TrendFunctionSpec = TrendFunctionSpec {
    name: "p99",
    template: "percentile_range(transaction.duration, 0.99, {start}, {end}, {index})",
    alias: Some(DURATION_PERCENTILE_ALIAS),
};
const AVG: TrendFunctionSpec = TrendFunctionSpec {
    name: "avg",
    template: "avg_range(transaction.duration, {start}, {end}, {index})",
    alias: Some("avg_range_"),
};
const USER_MISERY: TrendFunctionSpec = TrendFunctionSpec {
    name: "user_misery",
    template: "user_misery_range({}, {start}, {end}, {index})",
    alias: Some("user_misery_range_"),
};
const COUNT_RANGE: TrendFunctionSpec = TrendFunctionSpec {
    name: "count_range",
    template: "count_range({start}, {end}, {index})",
    alias: Some("count_range_"),
};
const VARIANCE_RANGE: TrendFunctionSpec = TrendFunctionSpec {
    name: "variance_range",
    template: "variance_range(transaction.duration, {start}, {end}, {index})",
    alias: Some("variance_range_"),
};
const PERCENTAGE: TrendFunctionSpec = TrendFunctionSpec {
    name: "percentage",
    template: "percentage({alias}2, {alias}1)",
    alias: None,
};
const T_SCORE: TrendFunctionSpec = TrendFunctionSpec {
    name: "t_score",
    template: "t_score({avg}1, {avg}2, {variance}1, {variance}2, {count}1, {count}2)",
    alias: None,
};
const DEGREES_OF_FREEDOM: TrendFunctionSpec = TrendFunctionSpec {
    name: "degrees_of_freedom",
    template: "degrees_of_freedom({variance}1, {variance}2, {count}1, {count}2)",
    alias: None,
};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolve a caller-selectable trend column by bare name.
///
/// `input` is what gets reported in the error, typically the raw
/// `trendFunction` value.
pub fn lookup(name: &str, input: &str) -> TrendResult<TrendColumn> {
    TrendColumn::from_name(name)
        .filter(|c| c.is_selectable())
        .ok_or_else(|| TrendError::Unsupported {
            input: input.to_string(),
        })
}

/// A parsed `trendFunction` value such as `p95()` or `user_misery(300)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendCall {
    pub raw: String,
    pub column: TrendColumn,
    pub args: Vec<String>,
}

/// Parse and resolve a `trendFunction` request value.
///
/// Malformed syntax and unknown names both report the raw input. Missing
/// positional arguments are reported as [`TrendError::Arity`] so the request
/// is rejected before any query is issued.
pub fn parse_trend_function(raw: &str) -> TrendResult<TrendCall> {
    let (name, args) = function_call.parse(raw).map_err(|_| TrendError::Syntax {
        input: raw.to_string(),
    })?;
    let column = lookup(name, raw)?;

    let expected = column.arity()?;
    if args.len() < expected {
        return Err(TrendError::Arity {
            name: column.name(),
            expected,
            got: args.len(),
        });
    }

    Ok(TrendCall {
        raw: raw.to_string(),
        column,
        args: args.into_iter().map(String::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_parses() {
        for col in TrendColumn::ALL {
            let t = Template::parse(col.spec().template).unwrap();
            if col.is_selectable() {
                let mut names: Vec<_> = t.named_placeholders().collect();
                names.sort_unstable();
                assert_eq!(names, vec!["end", "index", "start"], "{col}");
                assert!(col.spec().alias.is_some(), "{col}");
            } else {
                assert_eq!(t.positional_arity(), 0, "{col}");
                assert!(col.spec().alias.is_none(), "{col}");
            }
        }
    }

    #[test]
    fn names_are_unique() {
        for a in TrendColumn::ALL {
            assert_eq!(TrendColumn::from_name(a.name()), Some(a));
        }
    }

    #[test]
    fn lookup_selectable() {
        assert_eq!(lookup("p95", "p95()").unwrap(), TrendColumn::P95);
        assert_eq!(lookup("count_range", "count_range()").unwrap(), TrendColumn::CountRange);
    }

    #[test]
    fn lookup_rejects_orchestration_formulas() {
        for name in ["t_score", "degrees_of_freedom", "percentage"] {
            let err = lookup(name, "x()").unwrap_err();
            assert_eq!(err, TrendError::Unsupported { input: "x()".into() });
        }
    }

    #[test]
    fn parse_unknown_function() {
        let err = parse_trend_function("foo()").unwrap_err();
        assert_eq!(err, TrendError::Unsupported { input: "foo()".into() });
        assert_eq!(err.to_string(), "foo() is not a supported trend function");
    }

    #[test]
    fn parse_bad_syntax() {
        let err = parse_trend_function("p95").unwrap_err();
        assert_eq!(err, TrendError::Syntax { input: "p95".into() });
    }

    #[test]
    fn parse_with_argument() {
        let call = parse_trend_function("user_misery(300)").unwrap();
        assert_eq!(call.column, TrendColumn::UserMisery);
        assert_eq!(call.args, vec!["300"]);
    }

    #[test]
    fn parse_missing_argument() {
        let err = parse_trend_function("user_misery()").unwrap_err();
        assert_eq!(
            err,
            TrendError::Arity {
                name: "user_misery",
                expected: 1,
                got: 0
            }
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn alias_for_window() {
        assert_eq!(
            TrendColumn::P95.spec().alias_for(2).as_deref(),
            Some("percentile_range_2")
        );
        assert_eq!(TrendColumn::TScore.spec().alias_for(1), None);
    }
}
