/// Errors raised while resolving and compiling a trend function.
///
/// Everything except [`TrendError::Template`] is caused by caller input and
/// should be reported back as a client error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrendError {
    #[error("{input} is not a valid trend function")]
    Syntax { input: String },
    #[error("{input} is not a supported trend function")]
    Unsupported { input: String },
    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("malformed template {template:?}: {detail}")]
    Template { template: String, detail: String },
}

impl TrendError {
    /// True when the error stems from the caller's request rather than a
    /// broken registry entry.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Template { .. })
    }
}

pub type TrendResult<T> = Result<T, TrendError>;
