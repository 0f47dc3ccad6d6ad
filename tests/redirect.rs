
use approuter::{
    interceptor_fn, route::encode_component, Error, Next, RouteContext, RouteRequest,
    RouteResult,
};
use helper::{page, params, setup, NavCall, RecordingObserver};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn should_follow_redirect_to_new_page() {
    let ctx = setup(|builder| {
        builder
            .register_page("old/page", page("Old"))
            .register_page("new/page", page("New"))
            .register_local_interceptor(
                "old/page",
                interceptor_fn("moved", 10, |_, _| async {
                    Ok(RouteResult::redirect("app://new/page"))
                }),
            )
    });

    let result = ctx.router.open("app://old/page").await;

    let RouteResult::Success(context) = result else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(context.url, "app://new/page");
    assert_eq!(ctx.navigator.pushed(), vec!["New".to_string()]);
}

#[tokio::test]
async fn should_merge_request_and_redirect_params() {
    let ctx = setup(|builder| {
        builder
            .register_page("login", page("Login"))
            .register_page("payment/*", page("Payment"))
            .register_local_interceptor(
                "payment/*",
                interceptor_fn("login", 10, |context: RouteContext, _: Next| async move {
                    Ok(RouteResult::Redirect {
                        url: format!("app://login?redirect={}", encode_component(&context.url)),
                        params: helper::params(&[("reason", json!("auth"))]),
                    })
                }),
            )
    });

    let request = RouteRequest::new("app://payment/card").with_param("amount", 20);
    ctx.router.open(request).await;

    assert_eq!(
        ctx.navigator.calls(),
        vec![NavCall::Push(
            "Login".to_string(),
            params(&[
                ("amount", json!(20)),
                ("reason", json!("auth")),
                ("redirect", json!("app://payment/card")),
            ])
        )]
    );
}

#[tokio::test]
async fn should_stop_redirect_loop() {
    let observer = RecordingObserver::default();
    let ctx = setup(|builder| {
        builder
            .with_max_redirects(3)
            .register_observer(observer.clone())
            .register_page("a", page("A"))
            .register_page("b", page("B"))
            .register_local_interceptor(
                "a",
                interceptor_fn("to-b", 1, |_, _| async { Ok(RouteResult::redirect("app://b")) }),
            )
            .register_local_interceptor(
                "b",
                interceptor_fn("to-a", 1, |_, _| async { Ok(RouteResult::redirect("app://a")) }),
            )
    });

    let result = ctx.router.open("app://a").await;

    assert!(matches!(
        result,
        RouteResult::Error(Error::RedirectLimit { ref url, limit: 3 }) if url == "app://a"
    ));
    assert!(ctx.navigator.calls().is_empty());
    let starts = observer
        .events()
        .into_iter()
        .filter(|event| event.starts_with("start"))
        .count();
    assert_eq!(starts, 4);
}

#[tokio::test]
async fn should_notify_completion_after_redirect_resolves() {
    let observer = RecordingObserver::default();
    let ctx = setup(|builder| {
        builder
            .register_observer(observer.clone())
            .register_page("new", page("New"))
            .register_local_interceptor(
                "old",
                interceptor_fn("moved", 10, |_, _| async {
                    Ok(RouteResult::redirect("app://new"))
                }),
            )
    });

    ctx.router.open("app://old").await;

    assert_eq!(
        observer.events(),
        vec![
            "start app://old".to_string(),
            "interceptor moved".to_string(),
            "start app://new".to_string(),
            "complete app://new Success".to_string(),
            "complete app://old Success".to_string(),
        ]
    );
}
