use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use essentials::{debug, error, info, warn};
use futures::{future::BoxFuture, FutureExt};
use serde_json::Value;
use tokio::task::JoinHandle;

use super::{RouteRegistry, RouterBuilder, RouterConfig};
use crate::{
    fallback::{FallbackAction, FallbackHandler},
    observer::{ObserverManager, RouteCallback, RouteError, RouteObserver},
    params::Params,
    platform::{LoggingCallback, NavMode, NavigationOptions, Navigator},
    route::{
        build_url, ActionEntry, DispatchTarget, Error, Interceptor, InterceptorManager, PageEntry,
        ParsedRoute, Result, RouteContext, RouteLookup, RouteMatch, RouteRequest, RouteResult,
        RouteTable, Terminal,
    },
};

/// Entry point for opening route URLs.
///
/// Cloning is cheap, clones share routes, interceptors and observers.
#[derive(Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    interceptors: Arc<InterceptorManager>,
    observers: Arc<ObserverManager>,
    fallback: Arc<dyn FallbackHandler>,
    navigator: Option<Arc<dyn Navigator>>,
    config: Arc<RouterConfig>,
}

impl Default for Router {
    fn default() -> Self {
        RouterBuilder::new().build()
    }
}

impl Router {
    pub(crate) fn new(
        table: Arc<RouteTable>,
        interceptors: Arc<InterceptorManager>,
        observers: Arc<ObserverManager>,
        fallback: Arc<dyn FallbackHandler>,
        navigator: Option<Arc<dyn Navigator>>,
        config: RouterConfig,
    ) -> Self {
        Self {
            table,
            interceptors,
            observers,
            fallback,
            navigator,
            config: Arc::new(config),
        }
    }

    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn registry(&self) -> RouteRegistry {
        RouteRegistry::new(self.table.clone())
    }

    pub fn interceptors(&self) -> &InterceptorManager {
        &self.interceptors
    }

    pub fn observers(&self) -> &ObserverManager {
        &self.observers
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn add_global_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.add_global_interceptor(interceptor);
    }

    pub fn remove_global_interceptor(&self, interceptor: &Arc<dyn Interceptor>) -> bool {
        self.interceptors.remove_global_interceptor(interceptor)
    }

    pub fn add_interceptor(&self, pattern: &str, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.add_interceptor(pattern, interceptor);
    }

    pub fn remove_interceptor(&self, pattern: &str, interceptor: &Arc<dyn Interceptor>) -> bool {
        self.interceptors.remove_interceptor(pattern, interceptor)
    }

    pub fn add_observer(&self, observer: Arc<dyn RouteObserver>) {
        self.observers.add_observer(observer);
    }

    pub fn remove_observer(&self, observer: &Arc<dyn RouteObserver>) -> bool {
        self.observers.remove_observer(observer)
    }

    /// Whether `url` parses and resolves to a registered route.
    /// Interceptors are not consulted.
    pub fn can_open(&self, url: &str) -> bool {
        ParsedRoute::parse_or_none(url).is_some_and(|route| self.table.can_open(&route))
    }

    /// Builds a URL with the configured default scheme.
    pub fn build_url<I, K, V>(&self, path: &str, query: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        build_url(&self.config.default_scheme, path, query)
    }

    pub async fn open<R: Into<RouteRequest>>(&self, request: R) -> RouteResult {
        self.open_at_depth(request.into(), 0).await
    }

    pub async fn open_with_callback<R: Into<RouteRequest>>(
        &self,
        request: R,
        callback: &dyn RouteCallback,
    ) -> RouteResult {
        let request = request.into();
        let url = request.url.clone();
        let result = self.open(request).await;
        deliver(&result, &url, callback);
        result
    }

    /// Opens the route on a spawned task, must be called inside a tokio runtime.
    pub fn launch<R: Into<RouteRequest>>(
        &self,
        request: R,
        callback: Option<Arc<dyn RouteCallback>>,
    ) -> JoinHandle<RouteResult> {
        let router = self.clone();
        let request = request.into();
        tokio::spawn(async move {
            let url = request.url.clone();
            let result = router.open(request).await;
            if let Some(callback) = callback {
                deliver(&result, &url, callback.as_ref());
            }
            result
        })
    }

    pub fn pop(&self, result: Option<Value>) {
        match &self.navigator {
            Some(navigator) => navigator.pop(result),
            None => warn!("Navigator not set, cannot pop"),
        }
    }

    pub fn pop_to(&self, page_id: &str, result: Option<Value>) {
        match &self.navigator {
            Some(navigator) => navigator.pop_to(page_id, result),
            None => warn!(page_id, "Navigator not set, cannot pop"),
        }
    }

    pub fn pop_to_root(&self) {
        match &self.navigator {
            Some(navigator) => navigator.pop_to_root(),
            None => warn!("Navigator not set, cannot pop to root"),
        }
    }

    fn open_at_depth(&self, request: RouteRequest, depth: usize) -> BoxFuture<'_, RouteResult> {
        async move {
            if depth > self.config.max_redirects {
                warn!(url = %request.url, depth, "Redirect limit reached");
                return RouteResult::Error(Error::RedirectLimit {
                    url: request.url,
                    limit: self.config.max_redirects,
                });
            }
            let parsed = match ParsedRoute::parse(&request.url) {
                Ok(parsed) => parsed,
                Err(kind) => {
                    error!(url = %request.url, "Failed to parse route url: {}", kind);
                    return RouteResult::Error(Error::Parse {
                        url: request.url,
                        kind,
                    });
                }
            };
            let mut params: Params = parsed
                .query_params
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            params.extend(request.params.clone());
            let context = RouteContext::new(request.url.clone(), parsed, params, request.source);
            debug!(url = %context.url, source = ?context.source, depth, "Opening route");
            self.observers.notify_route_start(&context);

            let terminal = Arc::new(Dispatcher {
                table: self.table.clone(),
                navigator: self.navigator.clone(),
                options: request.options.clone(),
            });
            let outcome = AssertUnwindSafe(self.interceptors.execute_chain(
                context.clone(),
                terminal,
                Some(self.observers.clone()),
            ))
            .catch_unwind()
            .await;
            let result = match outcome {
                Ok(Ok(result)) => result,
                Ok(Err(err)) => RouteResult::Error(err),
                Err(panic) => {
                    let message = panic_message(&*panic);
                    error!(url = %context.url, "Route panicked: {}", message);
                    RouteResult::Error(Error::unknown(anyhow!("Route panicked: {}", message)))
                }
            };

            let result = match result {
                RouteResult::Redirect { url, params } => {
                    info!(from = %context.url, to = %url, "Following redirect");
                    let mut merged = request.params;
                    merged.extend(params);
                    let redirect = RouteRequest {
                        url,
                        params: merged,
                        options: request.options,
                        source: request.source,
                    };
                    self.open_at_depth(redirect, depth + 1).await
                }
                result => {
                    let fallback = AssertUnwindSafe(self.apply_fallback(&context, &result, depth))
                        .catch_unwind()
                        .await;
                    if let Err(panic) = fallback {
                        let message = panic_message(&*panic);
                        error!(url = %context.url, "Fallback panicked: {}", message);
                    }
                    result
                }
            };

            self.observers.notify_route_complete(&context, &result);
            info!(url = %context.url, result = ?result.kind(), "Route completed");
            result
        }
        .boxed()
    }

    async fn apply_fallback(&self, context: &RouteContext, result: &RouteResult, depth: usize) {
        let action = match result {
            RouteResult::NotFound(_) => self.fallback.on_route_not_found(context),
            RouteResult::Error(err) => self.fallback.on_route_error(context, err),
            _ => return,
        };
        match action {
            FallbackAction::NavigateTo(url) if url == context.url => {
                warn!(url = %url, "Fallback points at the failing route, skipping")
            }
            FallbackAction::NavigateTo(url) => {
                warn!(from = %context.url, to = %url, "Falling back");
                let fallback = self.open_at_depth(RouteRequest::new(url), depth + 1).await;
                debug!(result = ?fallback.kind(), "Fallback route completed");
            }
            FallbackAction::ShowError(message) => {
                error!(url = %context.url, "Route failed: {}", message)
            }
            FallbackAction::Ignore => {}
            FallbackAction::Custom(handler) => handler(),
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("table", &self.table)
            .field("interceptors", &self.interceptors)
            .field("observers", &self.observers)
            .field("navigator", &self.navigator.is_some())
            .field("config", &self.config)
            .finish()
    }
}

fn deliver(result: &RouteResult, url: &str, callback: &dyn RouteCallback) {
    match (result, RouteError::from_result(result, url)) {
        (RouteResult::Success(context), _) => callback.on_success(context),
        (_, Some(error)) => callback.on_error(error),
        _ => {}
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Resolves the route once every interceptor has let it through.
struct Dispatcher {
    table: Arc<RouteTable>,
    navigator: Option<Arc<dyn Navigator>>,
    options: NavigationOptions,
}

#[async_trait]
impl Terminal for Dispatcher {
    async fn handle(&self, context: RouteContext) -> Result<RouteResult> {
        Ok(match self.table.lookup(&context.parsed_route) {
            Some(RouteLookup::Page(entry, matched)) => self.dispatch_page(context, &entry, matched),
            Some(RouteLookup::Action(entry, matched)) => {
                self.dispatch_action(context, &entry, matched)
            }
            None => {
                debug!(url = %context.url, "No route matched");
                RouteResult::NotFound(context.url)
            }
        })
    }
}

impl Dispatcher {
    fn dispatch_page(
        &self,
        context: RouteContext,
        entry: &PageEntry,
        matched: RouteMatch,
    ) -> RouteResult {
        if let Some(fallback) = entry.route.fallback.as_ref().filter(|it| it.should_apply()) {
            match &fallback.action {
                FallbackAction::NavigateTo(url) if *url != context.url => {
                    debug!(pattern = %entry.pattern, to = %url, "Page fallback redirects");
                    return RouteResult::redirect(url.clone());
                }
                FallbackAction::ShowError(message) => {
                    error!(pattern = %entry.pattern, "Page fallback: {}", message);
                    return RouteResult::Blocked(message.clone());
                }
                FallbackAction::Custom(handler) => {
                    handler();
                    return RouteResult::blocked("page fallback");
                }
                FallbackAction::NavigateTo(_) | FallbackAction::Ignore => {}
            }
        }
        let Some(navigator) = &self.navigator else {
            error!(url = %context.url, "Navigator not set, cannot open page");
            return RouteResult::Error(Error::navigation(anyhow!("Navigator not set")));
        };
        let mut context = with_path_params(context, &matched);
        let page_id = entry.page_id().to_string();
        debug!(page_id = %page_id, nav_mode = ?self.options.nav_mode, "Navigating");
        let navigated = match self.options.nav_mode {
            NavMode::Push => navigator.push(&page_id, &context.params, &self.options),
            NavMode::Present => navigator.present(&page_id, &context.params, &self.options),
        };
        match navigated {
            Ok(()) => {
                context.target = Some(DispatchTarget::Page { page_id });
                RouteResult::Success(context)
            }
            Err(err) => {
                error!(page_id = %page_id, "Navigation failed: {:#}", err);
                RouteResult::Error(Error::navigation(err))
            }
        }
    }

    fn dispatch_action(
        &self,
        context: RouteContext,
        entry: &ActionEntry,
        matched: RouteMatch,
    ) -> RouteResult {
        let mut context = with_path_params(context, &matched);
        let action_name = entry.route.action_name.clone();
        debug!(action = %action_name, "Executing action");
        let callback = LoggingCallback::new(&action_name);
        match entry.handler.execute(&context.params, &callback) {
            Ok(()) => {
                context.target = Some(DispatchTarget::Action { action_name });
                RouteResult::Success(context)
            }
            Err(err) => {
                error!(action = %action_name, "Action failed: {:#}", err);
                RouteResult::Error(Error::unknown(err))
            }
        }
    }
}

/// Path parameters win over query and caller supplied ones.
fn with_path_params(mut context: RouteContext, matched: &RouteMatch) -> RouteContext {
    for (key, value) in &matched.path_params {
        context
            .params
            .insert(key.clone(), Value::String(value.clone()));
    }
    context.parsed_route.fill_path_params(matched);
    context
}
