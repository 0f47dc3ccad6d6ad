use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Error, ParsedRoute};
use crate::{observer::RouteResultType, params::Params, platform::NavigationOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    #[default]
    Internal,
    Deeplink,
    Push,
    H5,
    Other,
}

impl FromStr for RouteSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "internal" => Ok(Self::Internal),
            "deeplink" => Ok(Self::Deeplink),
            "push" => Ok(Self::Push),
            "h5" => Ok(Self::H5),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown route source: {s}")),
        }
    }
}

/// What the dispatcher ended up doing for a successful route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchTarget {
    Page { page_id: String },
    Action { action_name: String },
}

/// Everything an interceptor or handler knows about the route being opened.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteContext {
    pub url: String,
    pub parsed_route: ParsedRoute,
    pub params: Params,
    pub source: RouteSource,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
    pub target: Option<DispatchTarget>,
}

impl RouteContext {
    pub fn new(
        url: String,
        parsed_route: ParsedRoute,
        params: Params,
        source: RouteSource,
    ) -> Self {
        Self {
            url,
            parsed_route,
            params,
            source,
            timestamp: Utc::now().timestamp_millis(),
            target: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.parsed_route.path
    }

    /// Copy of the context with `params` merged on top of the current ones.
    pub fn with_params(&self, params: Params) -> Self {
        let mut context = self.clone();
        context.params.extend(params);
        context
    }

    pub fn with_param<K: Into<String>, V: Into<Value>>(&self, key: K, value: V) -> Self {
        let mut context = self.clone();
        context.params.insert(key.into(), value.into());
        context
    }
}

#[derive(Debug, Clone)]
pub enum RouteResult {
    Success(RouteContext),
    Redirect { url: String, params: Params },
    Blocked(String),
    Error(Error),
    NotFound(String),
}

impl RouteResult {
    pub fn redirect<S: Into<String>>(url: S) -> Self {
        Self::Redirect {
            url: url.into(),
            params: Params::new(),
        }
    }

    pub fn blocked<S: Into<String>>(reason: S) -> Self {
        Self::Blocked(reason.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn kind(&self) -> RouteResultType {
        match self {
            Self::Success(_) => RouteResultType::Success,
            Self::Redirect { .. } => RouteResultType::Redirect,
            Self::Blocked(_) => RouteResultType::Blocked,
            Self::Error(_) => RouteResultType::Error,
            Self::NotFound(_) => RouteResultType::NotFound,
        }
    }
}

/// A request to open a URL with extra parameters and navigation options.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub url: String,
    pub params: Params,
    pub options: NavigationOptions,
    pub source: RouteSource,
}

impl RouteRequest {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            params: Params::new(),
            options: NavigationOptions::default(),
            source: RouteSource::default(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    pub fn with_param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: NavigationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_source(mut self, source: RouteSource) -> Self {
        self.source = source;
        self
    }
}

impl From<&str> for RouteRequest {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for RouteRequest {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}
