use serde::Serialize;

use crate::route::{Error, RouteContext, RouteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteErrorCode {
    RouteNotFound,
    RouteBlocked,
    ParamValidationFailed,
    NavigationFailed,
    InterceptorTimeout,
    ProtocolParseFailure,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct RouteError {
    pub code: RouteErrorCode,
    pub message: String,
    pub url: String,
    pub cause: Option<Error>,
}

impl RouteError {
    /// Describes a failed route, successes and pending redirects yield `None`.
    pub fn from_result(result: &RouteResult, url: &str) -> Option<Self> {
        let (code, message, cause) = match result {
            RouteResult::Success(_) | RouteResult::Redirect { .. } => return None,
            RouteResult::NotFound(url) => (
                RouteErrorCode::RouteNotFound,
                format!("Route not found: {url}"),
                None,
            ),
            RouteResult::Blocked(reason) => (RouteErrorCode::RouteBlocked, reason.clone(), None),
            RouteResult::Error(error) => (error.code(), error.to_string(), Some(error.clone())),
        };
        Some(Self {
            code,
            message,
            url: url.to_string(),
            cause,
        })
    }
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

/// Completion hook for callers that prefer callbacks over awaiting a result.
pub trait RouteCallback: Send + Sync {
    fn on_success(&self, context: &RouteContext);
    fn on_error(&self, error: RouteError);
}

type SuccessFn = Box<dyn Fn(&RouteContext) + Send + Sync>;
type ErrorFn = Box<dyn Fn(RouteError) + Send + Sync>;

/// [RouteCallback] built from optional closures.
#[derive(Default)]
pub struct SimpleRouteCallback {
    on_success: Option<SuccessFn>,
    on_error: Option<ErrorFn>,
}

impl SimpleRouteCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_success<F: Fn(&RouteContext) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn with_error<F: Fn(RouteError) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl RouteCallback for SimpleRouteCallback {
    fn on_success(&self, context: &RouteContext) {
        if let Some(on_success) = &self.on_success {
            on_success(context);
        }
    }

    fn on_error(&self, error: RouteError) {
        if let Some(on_error) = &self.on_error {
            on_error(error);
        }
    }
}
