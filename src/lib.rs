//! In-app URL router.
//!
//! Route URLs look like `scheme://path?query`. Pages and actions are
//! registered against path patterns (`order/detail/:orderId`, `payment/*`),
//! interceptors may rewrite, redirect or block a route before it is
//! dispatched, and unresolved routes go through a fallback handler.
//!
//! # Example usage
//!
//! ```
//! use anyhow::Result;
//! use approuter::{
//!     interceptor_fn, NavigationOptions, Navigator, PageRoute, PageTarget, Params, Router,
//!     RouteResult,
//! };
//! use serde_json::Value;
//!
//! struct Screens;
//!
//! impl Navigator for Screens {
//!     fn push(&self, page_id: &str, params: &Params, _: &NavigationOptions) -> Result<()> {
//!         println!("push {page_id} {params:?}");
//!         Ok(())
//!     }
//!
//!     fn present(&self, page_id: &str, params: &Params, _: &NavigationOptions) -> Result<()> {
//!         println!("present {page_id} {params:?}");
//!         Ok(())
//!     }
//!
//!     fn pop(&self, _: Option<Value>) {}
//!     fn pop_to(&self, _: &str, _: Option<Value>) {}
//!     fn pop_to_root(&self) {}
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! essentials::install();
//! let router = Router::builder()
//!     .with_navigator(Screens)
//!     .register_page(
//!         "order/detail/:orderId",
//!         PageRoute::new(PageTarget::new(|_: &Params| ())).with_page_id("OrderDetail"),
//!     )
//!     .register_local_interceptor(
//!         "payment/*",
//!         interceptor_fn("login", 10, |_, _| async {
//!             Ok(RouteResult::redirect("app://login"))
//!         }),
//!     )
//!     .build();
//!
//! let result = router.open("app://order/detail/123?from=list").await;
//! assert!(result.is_success());
//! # }
//! ```
pub mod app;
pub mod fallback;
pub mod observer;
pub mod params;
pub mod platform;
pub mod route;
pub(crate) mod utils;

pub use app::{RouteDefinition, RouteRegistry, Router, RouterBuilder, RouterConfig};
pub use fallback::{
    DefaultFallbackHandler, FallbackAction, FallbackConfig, FallbackHandler, FallbackManager,
};
pub use observer::{
    EventObserver, ObserverManager, RouteCallback, RouteError, RouteErrorCode, RouteEvent,
    RouteObserver, RouteResultType, SimpleRouteCallback,
};
pub use params::{ObjectStore, Params, ParamsExt};
pub use platform::{ActionExecutor, NavMode, NavigationOptions, Navigator, TableActionExecutor};
pub use route::{
    interceptor_fn, ActionCallback, ActionHandler, ActionRoute, DispatchTarget, Error, Interceptor,
    InterceptorManager, Next, PageRoute, PageTarget, ParsedRoute, Result, RouteContext,
    RouteMatch, RoutePattern, RouteRequest, RouteResult, RouteSource, RouteTable,
};
