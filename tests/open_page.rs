
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use approuter::{
    DispatchTarget, Error, NavigationOptions, Navigator, PageRoute, PageTarget, Params,
    ParsedRoute, RouteRequest, RouteResult, RouteTable, Router,
};
use helper::{page, params, setup, NavCall, RecordingAction, RecordingNavigator};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Navigator that builds each page from the shared route table.
struct PageBuilder {
    table: Arc<RouteTable>,
    shown: Mutex<Vec<String>>,
}

impl PageBuilder {
    fn show(&self, page_id: &str, params: &Params) -> anyhow::Result<()> {
        let entry = self
            .table
            .page_by_id(page_id)
            .ok_or_else(|| anyhow!("unknown page {page_id}"))?;
        let page = entry
            .route
            .target
            .create(params)
            .downcast::<String>()
            .map_err(|_| anyhow!("unexpected page type"))?;
        self.shown.lock().unwrap().push(*page);
        Ok(())
    }
}

impl Navigator for PageBuilder {
    fn push(
        &self,
        page_id: &str,
        params: &Params,
        _options: &NavigationOptions,
    ) -> anyhow::Result<()> {
        self.show(page_id, params)
    }

    fn present(
        &self,
        page_id: &str,
        params: &Params,
        _options: &NavigationOptions,
    ) -> anyhow::Result<()> {
        self.show(page_id, params)
    }

    fn pop(&self, _result: Option<Value>) {}

    fn pop_to(&self, _page_id: &str, _result: Option<Value>) {}

    fn pop_to_root(&self) {}
}

#[tokio::test]
async fn should_push_page_with_path_and_query_params() {
    let ctx = setup(|builder| builder.register_page("order/detail/:orderId", page("OrderDetail")));

    let result = ctx.router.open("app://order/detail/123?from=list").await;

    let RouteResult::Success(context) = result else {
        panic!("expected success, got {result:?}");
    };
    let expected = params(&[("orderId", json!("123")), ("from", json!("list"))]);
    assert_eq!(context.params, expected);
    assert_eq!(
        context.target,
        Some(DispatchTarget::Page {
            page_id: "OrderDetail".to_string()
        })
    );
    assert_eq!(ctx.navigator.calls(), vec![NavCall::Push("OrderDetail".to_string(), expected)]);
}

#[tokio::test]
async fn should_keep_typed_params_from_request() {
    let ctx = setup(|builder| builder.register_page("order/:id", page("Order")));

    let request = RouteRequest::new("app://order/7?count=2")
        .with_param("count", 3)
        .with_param("id", "from-request");
    ctx.router.open(request).await;

    assert_eq!(
        ctx.navigator.calls(),
        vec![NavCall::Push(
            "Order".to_string(),
            params(&[("id", json!("7")), ("count", json!(3))])
        )]
    );
}

#[tokio::test]
async fn should_present_when_requested() {
    let ctx = setup(|builder| builder.register_page("settings", page("Settings")));

    let request = RouteRequest::new("app://settings").with_options(NavigationOptions::present());
    let result = ctx.router.open(request).await;

    assert!(result.is_success());
    assert_eq!(
        ctx.navigator.calls(),
        vec![NavCall::Present("Settings".to_string(), Default::default())]
    );
}

#[tokio::test]
async fn should_use_pattern_when_page_id_missing() {
    let ctx = setup(|builder| {
        builder.register_page(
            "/home",
            approuter::PageRoute::new(approuter::PageTarget::new(|_: &approuter::Params| ())),
        )
    });

    ctx.router.open("app:///home").await;

    assert_eq!(ctx.navigator.pushed(), vec!["home".to_string()]);
}

#[tokio::test]
async fn should_prefer_literal_pattern() {
    let ctx = setup(|builder| {
        builder
            .register_page("user/:id", page("UserDetail"))
            .register_page("user/profile", page("UserProfile"))
    });

    ctx.router.open("app://user/profile").await;
    ctx.router.open("app://user/42").await;

    assert_eq!(
        ctx.navigator.pushed(),
        vec!["UserProfile".to_string(), "UserDetail".to_string()]
    );
}

#[tokio::test]
async fn should_fail_without_navigator() {
    let router = Router::builder().register_page("home", page("Home")).build();

    let result = router.open("app://home").await;

    assert!(matches!(result, RouteResult::Error(Error::Navigation(_))));
}

#[tokio::test]
async fn should_report_navigator_failure() {
    let navigator = RecordingNavigator::failing();
    let router = Router::builder()
        .with_navigator(navigator)
        .register_page("home", page("Home"))
        .build();

    let result = router.open("app://home").await;

    let RouteResult::Error(error) = result else {
        panic!("expected error, got {result:?}");
    };
    assert_eq!(error.to_string(), "Navigation failed: screen unavailable");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_path() {
    let ctx = setup(|builder| builder.register_page("home", page("Home")));

    let result = ctx.router.open("app://missing/page").await;

    assert!(matches!(result, RouteResult::NotFound(url) if url == "app://missing/page"));
    assert!(ctx.navigator.calls().is_empty());
}

#[tokio::test]
async fn should_reject_malformed_url() {
    let ctx = setup(|builder| builder.register_page("home", page("Home")));

    let result = ctx.router.open("invalid").await;

    assert!(matches!(result, RouteResult::Error(Error::Parse { .. })));
    assert!(!ctx.router.can_open("invalid"));
}

#[tokio::test]
async fn should_run_action_instead_of_page() {
    let action = RecordingAction::default();
    let ctx = setup(|builder| {
        builder
            .register_page("action/showToast", page("ToastPage"))
            .register_action("showToast", action.clone())
    });

    let result = ctx.router.open("app://action/showToast?message=hi").await;

    let RouteResult::Success(context) = result else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(
        context.target,
        Some(DispatchTarget::Action {
            action_name: "showToast".to_string()
        })
    );
    assert_eq!(action.calls(), vec![params(&[("message", json!("hi"))])]);
    assert!(ctx.navigator.calls().is_empty());
}

#[tokio::test]
async fn should_report_failing_action() {
    let ctx = setup(|builder| builder.register_action("share", RecordingAction::failing()));

    let result = ctx.router.open("app://action/share").await;

    let RouteResult::Error(error) = result else {
        panic!("expected error, got {result:?}");
    };
    assert_eq!(error.to_string(), "action failed");
}

#[tokio::test]
async fn should_answer_can_open_without_dispatching() {
    let ctx = setup(|builder| builder.register_page("payment/*", page("Payment")));

    assert!(ctx.router.can_open("app://payment/card/visa"));
    assert!(!ctx.router.can_open("app://order"));
    assert!(ctx.navigator.calls().is_empty());
}

#[tokio::test]
async fn should_register_routes_at_runtime() {
    let ctx = setup(|builder| builder);

    ctx.router.registry().register_page("late", page("Late"));
    let result = ctx.router.open("app://late").await;

    assert!(result.is_success());
    assert!(ctx.router.registry().unregister_page("late"));
    assert!(matches!(ctx.router.open("app://late").await, RouteResult::NotFound(_)));
}

#[tokio::test]
async fn should_forward_pop_calls() {
    let ctx = setup(|builder| builder);

    ctx.router.pop(Some(json!({"ok": true})));
    ctx.router.pop_to("Home", None);
    ctx.router.pop_to_root();
    Router::default().pop(None);

    assert_eq!(
        ctx.navigator.calls(),
        vec![
            NavCall::Pop(Some(json!({"ok": true}))),
            NavCall::PopTo("Home".to_string()),
            NavCall::PopToRoot
        ]
    );
}

#[tokio::test]
async fn should_build_urls_with_default_scheme() {
    let router = Router::builder().with_default_scheme("shop").build();

    let url = router.build_url("search", [("q", "red shoes")]);

    assert_eq!(url, "shop://search?q=red%20shoes");
    let parsed = ParsedRoute::parse(&url).unwrap();
    assert_eq!(parsed.query_params.get("q").map(String::as_str), Some("red shoes"));
}

#[tokio::test]
async fn should_build_page_from_registered_target() {
    let table = Arc::new(RouteTable::new());
    let navigator = Arc::new(PageBuilder {
        table: table.clone(),
        shown: Mutex::new(Vec::new()),
    });
    let target = PageTarget::new(|params: &Params| {
        let id = params.get("orderId").and_then(Value::as_str).unwrap_or_default();
        format!("OrderDetail #{id}")
    });
    let router = Router::builder()
        .with_table(table)
        .with_navigator(navigator.clone())
        .register_page(
            "order/detail/:orderId",
            PageRoute::new(target).with_page_id("OrderDetail"),
        )
        .build();

    let result = router.open("app://order/detail/42").await;

    assert!(result.is_success());
    assert_eq!(*navigator.shown.lock().unwrap(), vec!["OrderDetail #42".to_string()]);
}
