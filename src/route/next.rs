use std::{fmt::Debug, sync::Arc, time::Instant};

use async_trait::async_trait;
use essentials::debug;

use super::{Interceptor, Result, RouteContext, RouteResult};
use crate::{observer::ObserverManager, utils::Also};

/// End of the interceptor chain, it produces the result once every
/// interceptor has passed the context on.
#[async_trait]
pub trait Terminal: Send + Sync {
    async fn handle(&self, context: RouteContext) -> Result<RouteResult>;
}

#[async_trait]
impl<F> Terminal for F
where
    F: Fn(RouteContext) -> RouteResult + Send + Sync,
{
    async fn handle(&self, context: RouteContext) -> Result<RouteResult> {
        Ok((self)(context))
    }
}

/// Cursor into an interceptor chain.
pub struct Next {
    interceptors: Arc<[Arc<dyn Interceptor>]>,
    index: usize,
    terminal: Arc<dyn Terminal>,
    observers: Option<Arc<ObserverManager>>,
}

impl Next {
    /// Chain ordered by ascending priority, ties keep the given order.
    pub fn chain(
        mut interceptors: Vec<Arc<dyn Interceptor>>,
        terminal: Arc<dyn Terminal>,
    ) -> Self {
        interceptors.sort_by_key(|interceptor| interceptor.priority());
        Self {
            interceptors: interceptors.into(),
            index: 0,
            terminal,
            observers: None,
        }
    }

    pub fn with_observers(mut self, observers: Arc<ObserverManager>) -> Self {
        self.observers = Some(observers);
        self
    }

    /// Interceptors still ahead of this cursor.
    pub fn remaining(&self) -> usize {
        self.interceptors.len().saturating_sub(self.index)
    }

    pub async fn run(self, context: RouteContext) -> Result<RouteResult> {
        let Some(interceptor) = self.interceptors.get(self.index).cloned() else {
            debug!(url = %context.url, "terminal -->");
            return self
                .terminal
                .handle(context)
                .await
                .also(|r| debug!(result = ?r.as_ref().map(RouteResult::kind), "terminal <--"));
        };
        let next = Next {
            interceptors: self.interceptors.clone(),
            index: self.index + 1,
            terminal: self.terminal.clone(),
            observers: self.observers.clone(),
        };
        debug!(interceptor = interceptor.name(), url = %context.url, "-->");
        let snapshot = self.observers.as_ref().map(|_| context.clone());
        let started = Instant::now();
        let result = interceptor.intercept(context, next).await;
        if let (Some(observers), Some(context)) = (&self.observers, snapshot) {
            let elapsed = started.elapsed();
            observers.notify_interceptor_executed(interceptor.as_ref(), &context, elapsed);
        }
        result.also(|r| {
            debug!(
                interceptor = interceptor.name(),
                result = ?r.as_ref().map(RouteResult::kind),
                "<--"
            )
        })
    }
}

impl Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::route::{interceptor_fn, ParsedRoute, RouteSource};

    fn context(url: &str) -> RouteContext {
        RouteContext::new(
            url.to_string(),
            ParsedRoute::parse(url).unwrap(),
            Default::default(),
            RouteSource::Internal,
        )
    }

    fn recording(
        name: &'static str,
        priority: i32,
        log: Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn Interceptor> {
        Arc::new(interceptor_fn(name, priority, move |context, next: Next| {
            log.lock().unwrap().push(name);
            next.run(context)
        }))
    }

    fn success() -> Arc<dyn Terminal> {
        Arc::new(RouteResult::Success)
    }

    #[tokio::test]
    async fn runs_in_priority_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Next::chain(
            vec![
                recording("c", 100, log.clone()),
                recording("a", 10, log.clone()),
                recording("b", 50, log.clone()),
            ],
            success(),
        );
        assert_eq!(chain.remaining(), 3);
        let result = chain.run(context("app://home")).await.unwrap();
        assert!(result.is_success());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn equal_priorities_keep_given_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Next::chain(
            vec![
                recording("first", 1, log.clone()),
                recording("second", 1, log.clone()),
            ],
            success(),
        );
        chain.run(context("app://home")).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn empty_chain_calls_terminal() {
        let result = Next::chain(Vec::new(), success())
            .run(context("app://home"))
            .await
            .unwrap();
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn short_circuit_skips_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let blocker: Arc<dyn Interceptor> =
            Arc::new(interceptor_fn("blocker", 1, |_, _| async {
                Ok(RouteResult::blocked("Not logged in"))
            }));
        let calls = Arc::new(Mutex::new(0));
        let counted = calls.clone();
        let terminal: Arc<dyn Terminal> = Arc::new(move |context: RouteContext| {
            *counted.lock().unwrap() += 1;
            RouteResult::Success(context)
        });
        let result = Next::chain(vec![blocker, recording("later", 5, log.clone())], terminal)
            .run(context("app://home"))
            .await
            .unwrap();
        assert!(matches!(result, RouteResult::Blocked(reason) if reason == "Not logged in"));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn modified_context_reaches_terminal() {
        let tagger: Arc<dyn Interceptor> =
            Arc::new(interceptor_fn("tagger", 1, |context: RouteContext, next: Next| {
                next.run(context.with_param("isLoggedIn", true))
            }));
        let result = Next::chain(vec![tagger], success())
            .run(context("app://home"))
            .await
            .unwrap();
        match result {
            RouteResult::Success(context) => {
                assert_eq!(
                    context.params.get("isLoggedIn"),
                    Some(&serde_json::json!(true))
                )
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
