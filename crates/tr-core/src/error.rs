use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};
use tr_lang::TrendError;

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum CoreReason {
    #[error("unsupported trend function")]
    UnsupportedTrendFunction,
    #[error("upstream query error")]
    UpstreamQuery,
    #[error("invalid request")]
    InvalidRequest,
    #[error("trend registry error")]
    Registry,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for CoreReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::UnsupportedTrendFunction => 3001,
            Self::UpstreamQuery => 3002,
            Self::InvalidRequest => 3003,
            Self::Registry => 3004,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

impl CoreReason {
    /// Errors the caller can fix by changing the request (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedTrendFunction | Self::InvalidRequest)
    }
}

pub type CoreError = StructError<CoreReason>;
pub type CoreResult<T> = Result<T, CoreError>;

/// Convert a compile-stage error. Caller-caused errors become
/// `UnsupportedTrendFunction`; a broken registry template is `Registry`.
pub(crate) fn trend_error(e: TrendError) -> CoreError {
    let reason = if e.is_client_error() {
        CoreReason::UnsupportedTrendFunction
    } else {
        CoreReason::Registry
    };
    StructError::from(reason).with_detail(e.to_string())
}

pub(crate) fn invalid_request(detail: impl Into<String>) -> CoreError {
    StructError::from(CoreReason::InvalidRequest).with_detail(detail.into())
}
