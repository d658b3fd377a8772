use winnow::ascii::multispace0;
use winnow::combinator::eof;
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, take_till, take_while};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

pub fn ident<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    // First character must be alphabetic or underscore (not digit).
    if !input.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    take_while(1.., is_ident_char).parse_next(input)
}

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Function calls
// ---------------------------------------------------------------------------

/// Parse a whole `name(arg, arg, ...)` call.
///
/// Arguments are opaque: everything between the parentheses is split on `,`,
/// trimmed, and empty pieces are dropped. Nested parentheses are rejected.
pub fn function_call<'a>(input: &mut &'a str) -> ModalResult<(&'a str, Vec<&'a str>)> {
    multispace0.parse_next(input)?;
    let name = ident.parse_next(input)?;
    multispace0.parse_next(input)?;
    literal("(").parse_next(input)?;
    let body = take_till(0.., ['(', ')']).parse_next(input)?;
    literal(")")
        .context(StrContext::Expected(StrContextValue::Description(
            "closing parenthesis",
        )))
        .parse_next(input)?;
    multispace0.parse_next(input)?;
    eof.parse_next(input)?;

    let args = body
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    Ok((name, args))
}

// ---------------------------------------------------------------------------
// Quoted literals
// ---------------------------------------------------------------------------

/// Consume a double-quoted literal, honouring backslash escapes, and return
/// the raw slice including the quotes. An apostrophe is ordinary text.
///
/// An unterminated literal swallows the rest of the input.
pub fn quoted_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let start = *input;
    if !input.starts_with('"') {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let mut escaped = false;
    let mut end = start.len();
    for (i, c) in start.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            end = i + c.len_utf8();
            break;
        }
    }
    *input = &start[end..];
    Ok(&start[..end])
}
