use std::sync::Arc;

use super::{Router, RouterConfig};
use crate::{
    fallback::{DefaultFallbackHandler, FallbackHandler},
    observer::{ObserverManager, RouteObserver},
    platform::Navigator,
    route::{
        ActionHandler, ActionRoute, Interceptor, InterceptorManager, PageRoute, RouteTable,
        WithPriority,
    },
};

/// A builder for a router.
pub struct RouterBuilder {
    table: Arc<RouteTable>,
    interceptors: InterceptorManager,
    observers: ObserverManager,
    fallback: Arc<dyn FallbackHandler>,
    navigator: Option<Arc<dyn Navigator>>,
    config: RouterConfig,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RouteTable::new()),
            interceptors: InterceptorManager::new(),
            observers: ObserverManager::new(),
            fallback: Arc::new(DefaultFallbackHandler),
            navigator: None,
            config: RouterConfig::default(),
        }
    }

    /// Share an existing route table instead of starting with an empty one.
    pub fn with_table(mut self, table: Arc<RouteTable>) -> Self {
        self.table = table;
        self
    }

    pub fn register_page(self, pattern: &str, route: PageRoute) -> Self {
        self.table.register_page(pattern, route);
        self
    }

    pub fn register_action<H>(self, action_name: &str, handler: H) -> Self
    where
        H: ActionHandler + 'static,
    {
        self.table
            .register_action(action_name, ActionRoute::new(action_name), Arc::new(handler));
        self
    }

    /// Register a global interceptor with the given priority, overriding its own.
    pub fn register_interceptor<I>(self, priority: i32, interceptor: I) -> Self
    where
        I: Interceptor + 'static,
    {
        self.register_global_interceptor(WithPriority::new(priority, interceptor))
    }

    pub fn register_global_interceptor<I: Interceptor + 'static>(self, interceptor: I) -> Self {
        self.interceptors.add_global_interceptor(Arc::new(interceptor));
        self
    }

    /// Register an interceptor that only runs for paths matching `pattern`.
    pub fn register_local_interceptor<I>(self, pattern: &str, interceptor: I) -> Self
    where
        I: Interceptor + 'static,
    {
        self.interceptors.add_interceptor(pattern, Arc::new(interceptor));
        self
    }

    pub fn register_observer<O: RouteObserver + 'static>(self, observer: O) -> Self {
        self.observers.add_observer(Arc::new(observer));
        self
    }

    pub fn with_navigator<N: Navigator + 'static>(mut self, navigator: N) -> Self {
        self.navigator = Some(Arc::new(navigator));
        self
    }

    /// Set the fallback handler.
    /// The default handler ignores every failure.
    pub fn with_fallback<F: FallbackHandler + 'static>(mut self, fallback: F) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the scheme used when building URLs.
    /// The default scheme is `app`
    pub fn with_default_scheme<S: Into<String>>(mut self, scheme: S) -> Self {
        self.config.default_scheme = scheme.into();
        self
    }

    /// Set how many redirects a single open may follow.
    /// The default limit is 8
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    pub fn build(self) -> Router {
        Router::new(
            self.table,
            Arc::new(self.interceptors),
            Arc::new(self.observers),
            self.fallback,
            self.navigator,
            self.config,
        )
    }
}
