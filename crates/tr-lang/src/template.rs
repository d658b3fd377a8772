//! Expression templates with `{}` / `{N}` positional and `{name}` keyword
//! placeholders.
//!
//! Positional placeholders are filled from the caller's trend-function
//! arguments; keyword placeholders (`start`, `end`, `index`, `alias`, ...)
//! are filled by the compiler. `{{` and `}}` render literal braces.

use winnow::combinator::{alt, delimited, repeat};
use winnow::prelude::*;
use winnow::token::{literal, take_till, take_while};

use crate::error::{TrendError, TrendResult};
use crate::parse_utils::ident;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    /// `{}` (auto-numbered) or `{N}`.
    Positional(usize),
    Named(&'a str),
}

/// A parsed template. Cheap to build; templates are short.
#[derive(Debug, Clone)]
pub struct Template<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

#[derive(Clone)]
enum RawSegment<'a> {
    Literal(&'a str),
    Auto,
    Index(usize),
    Named(&'a str),
}

fn raw_segment<'a>(input: &mut &'a str) -> ModalResult<RawSegment<'a>> {
    alt((
        literal("{{").value(RawSegment::Literal("{")),
        literal("}}").value(RawSegment::Literal("}")),
        literal("{}").value(RawSegment::Auto),
        delimited(
            "{",
            take_while(1.., |c: char| c.is_ascii_digit()).try_map(str::parse::<usize>),
            "}",
        )
        .map(RawSegment::Index),
        delimited("{", ident, "}").map(RawSegment::Named),
        take_till(1.., ['{', '}']).map(RawSegment::Literal),
    ))
    .parse_next(input)
}

impl<'a> Template<'a> {
    pub fn parse(source: &'a str) -> TrendResult<Self> {
        let raw: Vec<RawSegment<'a>> = repeat(0.., raw_segment)
            .parse(source)
            .map_err(|e| TrendError::Template {
                template: source.to_string(),
                detail: format!("unbalanced braces near offset {}", e.offset()),
            })?;

        let mut next_auto = 0;
        let segments = raw
            .into_iter()
            .map(|seg| match seg {
                RawSegment::Literal(s) => Segment::Literal(s),
                RawSegment::Auto => {
                    next_auto += 1;
                    Segment::Positional(next_auto - 1)
                }
                RawSegment::Index(i) => Segment::Positional(i),
                RawSegment::Named(n) => Segment::Named(n),
            })
            .collect();
        Ok(Self { source, segments })
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Number of positional arguments the template consumes.
    pub fn positional_arity(&self) -> usize {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Positional(i) => Some(i + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Names of all keyword placeholders, in order of appearance.
    pub fn named_placeholders(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Named(n) => Some(*n),
            _ => None,
        })
    }

    /// Substitute placeholders. Surplus positional arguments are ignored; a
    /// keyword absent from `named` is a template error.
    pub fn render(&self, positional: &[&str], named: &[(&str, &str)]) -> TrendResult<String> {
        let mut out = String::with_capacity(self.source.len() + 32);
        for seg in &self.segments {
            match seg {
                Segment::Literal(s) => out.push_str(s),
                Segment::Positional(i) => {
                    let arg = positional.get(*i).ok_or_else(|| TrendError::Template {
                        template: self.source.to_string(),
                        detail: format!("missing positional argument {i}"),
                    })?;
                    out.push_str(arg);
                }
                Segment::Named(name) => {
                    let (_, value) = named
                        .iter()
                        .find(|(k, _)| k == name)
                        .ok_or_else(|| TrendError::Template {
                            template: self.source.to_string(),
                            detail: format!("no value for placeholder {{{name}}}"),
                        })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
