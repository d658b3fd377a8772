use crate::error::{TrendError, TrendResult};
use crate::registry::{TrendCall, TrendColumn};
use crate::template::Template;
use crate::window::{TimeWindow, WindowBounds};


/// Number of expressions the compiler appends after the caller's columns.
pub const TREND_EXPRESSION_COUNT: usize = 12;

/// The fully expanded query for one trends request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTrend {
    pub call: TrendCall,
    pub window: TimeWindow,
    pub bounds: WindowBounds,
    /// Caller-requested pass-through columns, unmodified.
    pub selected_columns: Vec<String>,
    /// `selected_columns` followed by the trend expressions, in engine order.
    pub expressions: Vec<String>,
    pub t_score: String,
    pub degrees_of_freedom: String,
}

impl CompiledTrend {
    /// The compiler-generated expressions without the caller's columns.
    pub fn trend_expressions(&self) -> &[String] {
        &self.expressions[self.selected_columns.len()..]
    }
}

/// Compile a resolved trend call against a split window.
///
/// The output order is fixed:
///
/// ```text
/// [...selected, metric@1, metric@2, delta, count@1, count@2, percentage,
///  variance@1, variance@2, avg@1, avg@2, t_score, degrees_of_freedom]
/// ```
///
/// Auxiliary count/variance/avg columns are computed regardless of the
/// chosen metric; the significance test always runs on the raw duration
/// distribution.
pub fn compile_trend(
    call: &TrendCall,
    window: &TimeWindow,
    selected_columns: &[String],
) -> TrendResult<CompiledTrend> {
    let bounds = window.bounds();
    let args: Vec<&str> = call.args.iter().map(String::as_str).collect();

    let metric_alias = alias_prefix(call.column)?;
    let (t_score, degrees_of_freedom) = significance_formulas()?;

    let mut expressions = Vec::with_capacity(selected_columns.len() + TREND_EXPRESSION_COUNT);
    expressions.extend(selected_columns.iter().cloned());

    // Before / after evaluations of the chosen metric plus their delta.
    expressions.push(evaluate(call.column, &args, &bounds.start, &bounds.middle, "1")?);
    expressions.push(evaluate(call.column, &args, &bounds.middle, &bounds.end, "2")?);
    expressions.push(format!("minus({metric_alias}2, {metric_alias}1)"));

    expressions.push(evaluate(TrendColumn::CountRange, &[], &bounds.start, &bounds.middle, "1")?);
    expressions.push(evaluate(TrendColumn::CountRange, &[], &bounds.middle, &bounds.end, "2")?);
    expressions.push(render_formula(
        TrendColumn::Percentage,
        &[("alias", alias_prefix(TrendColumn::CountRange)?)],
    )?);

    for aux in [TrendColumn::VarianceRange, TrendColumn::Avg] {
        expressions.push(evaluate(aux, &[], &bounds.start, &bounds.middle, "1")?);
        expressions.push(evaluate(aux, &[], &bounds.middle, &bounds.end, "2")?);
    }

    expressions.push(t_score.clone());
    expressions.push(degrees_of_freedom.clone());

    Ok(CompiledTrend {
        call: call.clone(),
        window: *window,
        bounds,
        selected_columns: selected_columns.to_vec(),
        expressions,
        t_score,
        degrees_of_freedom,
    })
}

/// Expand the `t_score` and `degrees_of_freedom` formulas against the
/// avg/variance/count aliases. Independent of the chosen metric and window.
pub fn significance_formulas() -> TrendResult<(String, String)> {
    let avg = alias_prefix(TrendColumn::Avg)?;
    let variance = alias_prefix(TrendColumn::VarianceRange)?;
    let count = alias_prefix(TrendColumn::CountRange)?;
    let keywords = [("avg", avg), ("variance", variance), ("count", count)];

    let t_score = render_formula(TrendColumn::TScore, &keywords)?;
    let dof = render_formula(TrendColumn::DegreesOfFreedom, &keywords)?;
    Ok((t_score, dof))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn evaluate(
    column: TrendColumn,
    args: &[&str],
    start: &str,
    end: &str,
    index: &str,
) -> TrendResult<String> {
    let template = Template::parse(column.spec().template)?;
    if args.len() < template.positional_arity() {
        return Err(TrendError::Arity {
            name: column.name(),
            expected: template.positional_arity(),
            got: args.len(),
        });
    }
    template.render(args, &[("start", start), ("end", end), ("index", index)])
}

fn render_formula(column: TrendColumn, keywords: &[(&str, &str)]) -> TrendResult<String> {
    Template::parse(column.spec().template)?.render(&[], keywords)
}

fn alias_prefix(column: TrendColumn) -> TrendResult<&'static str> {
    column.spec().alias.ok_or_else(|| TrendError::Template {
        template: column.spec().template.to_string(),
        detail: format!("{column} has no alias"),
    })
}
