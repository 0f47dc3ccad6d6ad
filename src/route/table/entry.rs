use std::{any::Any, fmt::Debug, sync::Arc};

use serde_json::Value;

use crate::{fallback::FallbackConfig, params::Params};

/// Opaque page object produced for the platform navigator.
pub type PlatformPage = Box<dyn Any + Send>;

type PageFactory = dyn Fn(&Params) -> PlatformPage + Send + Sync;

#[derive(Clone)]
pub struct PageTarget(Arc<PageFactory>);

impl PageTarget {
    pub fn new<F, P>(create: F) -> Self
    where
        F: Fn(&Params) -> P + Send + Sync + 'static,
        P: Any + Send,
    {
        Self(Arc::new(move |params| Box::new(create(params)) as PlatformPage))
    }

    pub fn create(&self, params: &Params) -> PlatformPage {
        (self.0)(params)
    }
}

impl Debug for PageTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PageTarget")
    }
}

#[derive(Debug, Clone)]
pub struct PageRoute {
    pub target: PageTarget,
    pub page_id: Option<String>,
    pub fallback: Option<FallbackConfig>,
}

impl PageRoute {
    pub fn new(target: PageTarget) -> Self {
        Self {
            target,
            page_id: None,
            fallback: None,
        }
    }

    pub fn with_page_id<S: Into<String>>(mut self, page_id: S) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackConfig) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRoute {
    pub action_name: String,
}

impl ActionRoute {
    pub fn new<S: Into<String>>(action_name: S) -> Self {
        Self {
            action_name: action_name.into(),
        }
    }
}

/// Receives the outcome an action reports while it runs.
pub trait ActionCallback: Send + Sync {
    fn on_success(&self, result: Option<Value>);
    fn on_error(&self, error: anyhow::Error);
}

pub trait ActionHandler: Send + Sync {
    fn execute(&self, params: &Params, callback: &dyn ActionCallback) -> anyhow::Result<()>;
}

impl<F> ActionHandler for F
where
    F: Fn(&Params, &dyn ActionCallback) -> anyhow::Result<()> + Send + Sync,
{
    fn execute(&self, params: &Params, callback: &dyn ActionCallback) -> anyhow::Result<()> {
        self(params, callback)
    }
}

#[derive(Debug)]
pub struct PageEntry {
    pub pattern: String,
    pub route: PageRoute,
}

impl PageEntry {
    /// Identifier handed to the navigator, the pattern unless a page id is set.
    pub fn page_id(&self) -> &str {
        self.route.page_id.as_deref().unwrap_or(&self.pattern)
    }
}

pub struct ActionEntry {
    pub pattern: String,
    pub route: ActionRoute,
    pub handler: Arc<dyn ActionHandler>,
}

impl Debug for ActionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEntry")
            .field("pattern", &self.pattern)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}
