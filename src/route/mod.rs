pub mod context;
pub mod interceptor;
pub mod manager;
pub mod next;
pub mod parser;
pub mod pattern;
pub mod table;

use std::{fmt::Display, sync::Arc};

use crate::observer::RouteErrorCode;

pub use context::{DispatchTarget, RouteContext, RouteRequest, RouteResult, RouteSource};
pub use interceptor::{interceptor_fn, FnInterceptor, Interceptor, WithPriority, DEFAULT_PRIORITY};
pub use manager::InterceptorManager;
pub use next::{Next, Terminal};
pub use parser::{build_url, decode_component, encode_component, ParseError, ParsedRoute};
pub use pattern::{find_best_match, normalize, RouteMatch, RoutePattern};
pub use table::{
    ActionCallback, ActionEntry, ActionHandler, ActionRoute, PageEntry, PageRoute, PageTarget,
    PlatformPage, RouteLookup, RouteTable, ACTION_PREFIX,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub enum Error {
    RouteNotFound { url: String },
    RouteBlocked { url: String, reason: String },
    ParamValidation { key: String, message: String },
    Navigation(Arc<anyhow::Error>),
    /// Reserved, the pipeline never raises it on its own.
    InterceptorTimeout { name: String },
    Parse { url: String, kind: ParseError },
    RedirectLimit { url: String, limit: usize },
    Unknown(Arc<anyhow::Error>),
}

impl Error {
    pub fn navigation(error: impl Into<anyhow::Error>) -> Self {
        Self::Navigation(Arc::new(error.into()))
    }

    pub fn unknown(error: impl Into<anyhow::Error>) -> Self {
        Self::Unknown(Arc::new(error.into()))
    }

    pub fn param<K: AsRef<str>, M: Into<String>>(key: K, message: M) -> Self {
        Self::ParamValidation {
            key: key.as_ref().to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> RouteErrorCode {
        match self {
            Self::RouteNotFound { .. } => RouteErrorCode::RouteNotFound,
            Self::RouteBlocked { .. } => RouteErrorCode::RouteBlocked,
            Self::ParamValidation { .. } => RouteErrorCode::ParamValidationFailed,
            Self::Navigation(_) => RouteErrorCode::NavigationFailed,
            Self::InterceptorTimeout { .. } => RouteErrorCode::InterceptorTimeout,
            Self::Parse { .. } => RouteErrorCode::ProtocolParseFailure,
            Self::RedirectLimit { .. } | Self::Unknown(_) => RouteErrorCode::Unknown,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Self::Unknown(Arc::new(value))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RouteNotFound { url } => write!(f, "Route not found: {url}"),
            Self::RouteBlocked { url, reason } => {
                write!(f, "Route blocked: {url}, reason: {reason}")
            }
            Self::ParamValidation { message, .. } => message.fmt(f),
            Self::Navigation(cause) => write!(f, "Navigation failed: {cause}"),
            Self::InterceptorTimeout { name } => write!(f, "Interceptor timed out: {name}"),
            Self::Parse { url, kind } => write!(f, "Failed to parse url {url}: {kind}"),
            Self::RedirectLimit { url, limit } => {
                write!(f, "Gave up on {url} after {limit} redirects")
            }
            Self::Unknown(cause) => cause.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Navigation(cause) | Self::Unknown(cause) => {
                let cause: &anyhow::Error = cause;
                Some(&**cause)
            }
            _ => None,
        }
    }
}
