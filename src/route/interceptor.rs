use std::future::Future;

use async_trait::async_trait;

use super::{Next, Result, RouteContext, RouteResult};

pub const DEFAULT_PRIORITY: i32 = 100;

/// Interceptor is a hook that runs before a route is dispatched.
/// It can pass the context on with [Next::run], possibly modified,
/// or short-circuit the chain by returning its own [RouteResult].
/// Interceptors with a lower [Interceptor::priority] run first.
/// Register one with [crate::RouterBuilder::register_global_interceptor]
/// or [crate::RouterBuilder::register_local_interceptor].
#[async_trait]
pub trait Interceptor: Send + Sync {
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returning an error ends the route with [RouteResult::Error].
    async fn intercept(&self, context: RouteContext, next: Next) -> Result<RouteResult>;
}

/// Runs the wrapped interceptor with a different priority.
pub struct WithPriority<I> {
    priority: i32,
    inner: I,
}

impl<I: Interceptor> WithPriority<I> {
    pub fn new(priority: i32, inner: I) -> Self {
        Self { priority, inner }
    }
}

#[async_trait]
impl<I: Interceptor> Interceptor for WithPriority<I> {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn intercept(&self, context: RouteContext, next: Next) -> Result<RouteResult> {
        self.inner.intercept(context, next).await
    }
}

pub struct FnInterceptor<F> {
    name: String,
    priority: i32,
    handler: F,
}

pub fn interceptor_fn<S, F, Fut>(name: S, priority: i32, handler: F) -> FnInterceptor<F>
where
    S: Into<String>,
    F: Fn(RouteContext, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RouteResult>> + Send + 'static,
{
    FnInterceptor {
        name: name.into(),
        priority,
        handler,
    }
}

#[async_trait]
impl<F, Fut> Interceptor for FnInterceptor<F>
where
    F: Fn(RouteContext, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RouteResult>> + Send + 'static,
{
    fn priority(&self) -> i32 {
        self.priority
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn intercept(&self, context: RouteContext, next: Next) -> Result<RouteResult> {
        (self.handler)(context, next).await
    }
}
