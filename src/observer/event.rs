use chrono::Utc;
use essentials::{info, warn};
use serde::Serialize;

use super::RouteObserver;
use crate::route::{DispatchTarget, RouteContext, RouteResult, RouteSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteResultType {
    Success,
    Redirect,
    Blocked,
    Error,
    NotFound,
}

/// Flat record of one finished route, meant for analytics sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEvent {
    pub url: String,
    pub source: RouteSource,
    pub result_type: RouteResultType,
    pub duration_ms: i64,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl RouteEvent {
    pub fn from_result(context: &RouteContext, result: &RouteResult) -> Self {
        let now = Utc::now().timestamp_millis();
        let mut event = Self {
            url: context.url.clone(),
            source: context.source,
            result_type: result.kind(),
            duration_ms: (now - context.timestamp).max(0),
            timestamp: now,
            page_id: None,
            action_name: None,
            error_message: None,
            redirect_url: None,
        };
        match result {
            RouteResult::Success(done) => match &done.target {
                Some(DispatchTarget::Page { page_id }) => event.page_id = Some(page_id.clone()),
                Some(DispatchTarget::Action { action_name }) => {
                    event.action_name = Some(action_name.clone())
                }
                None => {}
            },
            RouteResult::Redirect { url, .. } => event.redirect_url = Some(url.clone()),
            RouteResult::Blocked(reason) => event.error_message = Some(reason.clone()),
            RouteResult::Error(error) => event.error_message = Some(error.to_string()),
            RouteResult::NotFound(_) => {}
        }
        event
    }
}

/// Turns every completed route into a [RouteEvent] handed to `sink`.
pub struct EventObserver<F> {
    sink: F,
}

impl<F> EventObserver<F>
where
    F: Fn(RouteEvent) + Send + Sync,
{
    pub fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl EventObserver<fn(RouteEvent)> {
    /// Writes each event as a JSON log line.
    pub fn logging() -> Self {
        Self { sink: log_event }
    }
}

fn log_event(event: RouteEvent) {
    match serde_json::to_string(&event) {
        Ok(json) => info!(target: "route_event", "{}", json),
        Err(err) => warn!(url = %event.url, "Failed to serialize route event: {}", err),
    }
}

impl<F> RouteObserver for EventObserver<F>
where
    F: Fn(RouteEvent) + Send + Sync,
{
    fn on_route_complete(&self, context: &RouteContext, result: &RouteResult) {
        (self.sink)(RouteEvent::from_result(context, result));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::route::ParsedRoute;

    fn context(url: &str) -> RouteContext {
        RouteContext::new(
            url.to_string(),
            ParsedRoute::parse(url).unwrap(),
            Default::default(),
            RouteSource::Deeplink,
        )
    }

    #[test]
    fn records_dispatched_page() {
        let start = context("app://order/1");
        let mut done = start.clone();
        done.target = Some(DispatchTarget::Page {
            page_id: "OrderDetail".to_string(),
        });
        let event = RouteEvent::from_result(&start, &RouteResult::Success(done));
        assert_eq!(event.result_type, RouteResultType::Success);
        assert_eq!(event.page_id.as_deref(), Some("OrderDetail"));
        assert_eq!(event.source, RouteSource::Deeplink);
        assert!(event.duration_ms >= 0);
    }

    #[test]
    fn serializes_only_present_fields() {
        let event = RouteEvent::from_result(
            &context("app://pay"),
            &RouteResult::redirect("app://login"),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["resultType"], "REDIRECT");
        assert_eq!(json["redirectUrl"], "app://login");
        assert_eq!(json["source"], "deeplink");
        assert!(json.get("pageId").is_none());
    }

    #[test]
    fn forwards_events_to_sink() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let observer =
            EventObserver::new(move |event: RouteEvent| sink.lock().unwrap().push(event));
        observer.on_route_complete(&context("app://x"), &RouteResult::blocked("nope"));
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].error_message.as_deref(), Some("nope"));
    }
}
