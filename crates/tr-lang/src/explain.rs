use std::fmt;

use crate::compiler::CompiledTrend;

/// Human-readable breakdown of a compiled trend query.
#[derive(Debug)]
pub struct TrendExplanation {
    pub trend_function: String,
    pub before: (String, String),
    pub after: (String, String),
    pub selected: Vec<String>,
    /// `(role, expression)` pairs for the generated columns.
    pub columns: Vec<(&'static str, String)>,
    pub query: String,
}

const ROLES: [&str; 12] = [
    "metric (before)",
    "metric (after)",
    "delta",
    "count (before)",
    "count (after)",
    "percentage",
    "variance (before)",
    "variance (after)",
    "avg (before)",
    "avg (after)",
    "t_score",
    "degrees_of_freedom",
];

pub fn explain_trend(compiled: &CompiledTrend, query: &str) -> TrendExplanation {
    let b = &compiled.bounds;
    TrendExplanation {
        trend_function: compiled.call.raw.clone(),
        before: (b.start.clone(), b.middle.clone()),
        after: (b.middle.clone(), b.end.clone()),
        selected: compiled.selected_columns.clone(),
        columns: ROLES
            .iter()
            .copied()
            .zip(compiled.trend_expressions().iter().cloned())
            .collect(),
        query: query.to_string(),
    }
}

impl fmt::Display for TrendExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trend: {}", self.trend_function)?;
        writeln!(f, "  Before: {} .. {}", self.before.0, self.before.1)?;
        writeln!(f, "  After:  {} .. {}", self.after.0, self.after.1)?;
        if self.selected.is_empty() {
            writeln!(f, "  Fields: (none)")?;
        } else {
            writeln!(f, "  Fields: {}", self.selected.join(", "))?;
        }
        writeln!(f, "  Columns:")?;
        let width = self.columns.iter().map(|(r, _)| r.len()).max().unwrap_or(0);
        for (role, expr) in &self.columns {
            writeln!(f, "    {role:<width$}  {expr}")?;
        }
        if self.query.is_empty() {
            writeln!(f, "  Query: (none)")
        } else {
            writeln!(f, "  Query: {}", self.query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile_trend, parse_trend_function, split_window};

    #[test]
    fn explain_lists_every_generated_column() {
        let call = parse_trend_function("p99()").unwrap();
        let window = split_window(
            "2020-01-01T00:00:00Z".parse().unwrap(),
            "2020-01-03T00:00:00Z".parse().unwrap(),
        );
        let compiled = compile_trend(&call, &window, &["transaction".into()]).unwrap();
        let expl = explain_trend(&compiled, "");

        assert_eq!(expl.columns.len(), 12);
        assert_eq!(expl.columns[2].0, "delta");
        assert_eq!(expl.columns[2].1, "minus(percentile_range_2, percentile_range_1)");

        let text = expl.to_string();
        assert!(text.starts_with("Trend: p99()\n"));
        assert!(text.contains("Before: 2020-01-01T00:00:00 .. 2020-01-02T00:00:00"));
        assert!(text.contains("Fields: transaction"));
        assert!(text.contains("Query: (none)"));
    }
}
