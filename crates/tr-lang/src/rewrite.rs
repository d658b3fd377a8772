use crate::parse_utils::{is_ident_char, quoted_literal};

pub const T_SCORE_TOKEN: &str = "t_score()";
pub const DEGREES_OF_FREEDOM_TOKEN: &str = "degrees_of_freedom()";

/// Replace the `t_score()` and `degrees_of_freedom()` pseudo-functions in a
/// caller filter with their expanded formulas.
///
/// Every occurrence is replaced, except inside `"..."` literals and where
/// the token is the tail of a longer identifier (`my_t_score()`). The rest
/// of the filter is passed through byte for byte.
pub fn rewrite_query(filter: &str, t_score: &str, degrees_of_freedom: &str) -> String {
    let mut out = String::with_capacity(filter.len());
    let mut rest = filter;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        if c == '"' {
            // quoted_literal only backtracks on a non-quote start.
            if let Ok(lit) = quoted_literal(&mut rest) {
                out.push_str(lit);
                prev = lit.chars().last();
                continue;
            }
        }

        let at_boundary = !prev.is_some_and(is_ident_char);
        let replacement = if !at_boundary {
            None
        } else if rest.starts_with(T_SCORE_TOKEN) {
            Some((T_SCORE_TOKEN.len(), t_score))
        } else if rest.starts_with(DEGREES_OF_FREEDOM_TOKEN) {
            Some((DEGREES_OF_FREEDOM_TOKEN.len(), degrees_of_freedom))
        } else {
            None
        };

        match replacement {
            Some((len, formula)) => {
                out.push_str(formula);
                rest = &rest[len..];
                prev = Some(')');
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
                prev = Some(c);
            }
        }
    }
    out
}
