use std::{process, sync::Arc};

use anyhow::{anyhow, Result};
use approuter::{
    interceptor_fn, route::encode_component, ActionCallback, EventObserver, FallbackAction,
    FallbackManager, NavMode, NavigationOptions, Navigator, PageRoute, PageTarget, Params,
    RouteRequest, RouteResult, RouteSource, RouteTable, Router, RouterConfig,
};
use essentials::{error, info};
use serde_json::Value;
use structopt::StructOpt;

/// Resolve a route URL against a demo route table.
#[derive(Debug, StructOpt)]
#[structopt(name = "approuter")]
struct Opt {
    /// Route URL to open, e.g. app://order/detail/42?from=list
    url: String,

    /// Extra parameter in key=value form, may be repeated
    #[structopt(short, long = "param", parse(try_from_str = parse_param))]
    params: Vec<(String, String)>,

    /// Present the page modally instead of pushing it
    #[structopt(long)]
    present: bool,

    /// Where the URL came from: internal, deeplink, push, h5 or other
    #[structopt(long, default_value = "internal")]
    source: RouteSource,

    /// Let the login guard through
    #[structopt(long)]
    logged_in: bool,
}

fn parse_param(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{value}`"))
}

/// Builds pages from the route table and logs what would be shown.
struct LogNavigator {
    table: Arc<RouteTable>,
}

impl LogNavigator {
    fn build(&self, page_id: &str, params: &Params) -> Result<String> {
        let entry = self
            .table
            .page_by_id(page_id)
            .ok_or_else(|| anyhow!("No page registered as {page_id}"))?;
        entry
            .route
            .target
            .create(params)
            .downcast::<String>()
            .map(|page| *page)
            .map_err(|_| anyhow!("Page {page_id} is not a demo page"))
    }
}

impl Navigator for LogNavigator {
    fn push(&self, page_id: &str, params: &Params, options: &NavigationOptions) -> Result<()> {
        let page = self.build(page_id, params)?;
        info!(page = %page, animated = options.animated, "push");
        Ok(())
    }

    fn present(&self, page_id: &str, params: &Params, options: &NavigationOptions) -> Result<()> {
        let page = self.build(page_id, params)?;
        info!(page = %page, style = ?options.present_style, "present");
        Ok(())
    }

    fn pop(&self, result: Option<Value>) {
        info!(result = ?result, "pop");
    }

    fn pop_to(&self, page_id: &str, result: Option<Value>) {
        info!(page_id, result = ?result, "pop to");
    }

    fn pop_to_root(&self) {
        info!("pop to root");
    }
}

fn page(page_id: &str) -> PageRoute {
    let name = page_id.to_string();
    PageRoute::new(PageTarget::new(move |params: &Params| format!("{name} {params:?}")))
        .with_page_id(page_id)
}

fn build_router(config: RouterConfig, logged_in: bool) -> Router {
    let login_url = format!("{}://login", config.default_scheme);
    let fallback = Arc::new(FallbackManager::new());
    fallback.set_global_fallback(FallbackAction::show_error("Page not found"));
    fallback.set_global_error_fallback(FallbackAction::show_error("Something went wrong"));

    let table = Arc::new(RouteTable::new());

    Router::builder()
        .with_config(config)
        .with_table(table.clone())
        .with_navigator(LogNavigator { table })
        .with_fallback(fallback)
        .register_page("home", page("Home"))
        .register_page("login", page("Login"))
        .register_page("order/detail/:orderId", page("OrderDetail"))
        .register_page("payment/*", page("Payment"))
        .register_action("showToast", |params: &Params, callback: &dyn ActionCallback| {
            info!(params = ?params, "toast");
            callback.on_success(params.get("message").cloned());
            Ok(())
        })
        .register_local_interceptor(
            "payment/*",
            interceptor_fn("login-guard", 10, move |context, next| {
                let login_url = login_url.clone();
                async move {
                    if logged_in {
                        return next.run(context).await;
                    }
                    let target = encode_component(&context.url);
                    Ok(RouteResult::redirect(format!("{login_url}?redirect={target}")))
                }
            }),
        )
        .register_observer(EventObserver::logging())
        .build()
}

#[tokio::main]
async fn main() {
    essentials::install();
    let opt = Opt::from_args();
    let config = match RouterConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{:#}", err);
            process::exit(2);
        }
    };
    let router = build_router(config, opt.logged_in);

    let nav_mode = if opt.present { NavMode::Present } else { NavMode::Push };
    let request = opt
        .params
        .into_iter()
        .fold(RouteRequest::new(opt.url), |request, (key, value)| {
            request.with_param(key, value)
        })
        .with_source(opt.source)
        .with_options(NavigationOptions::default().with_nav_mode(nav_mode));

    match router.open(request).await {
        RouteResult::Success(context) => println!("opened {} {:?}", context.url, context.target),
        RouteResult::Redirect { url, .. } => println!("redirect to {url}"),
        RouteResult::Blocked(reason) => {
            println!("blocked: {reason}");
            process::exit(1);
        }
        RouteResult::NotFound(url) => {
            println!("not found: {url}");
            process::exit(1);
        }
        RouteResult::Error(err) => {
            println!("error: {err}");
            process::exit(1);
        }
    }
}
