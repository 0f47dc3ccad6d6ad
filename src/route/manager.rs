use std::sync::{Arc, RwLock};

use essentials::debug;

use super::{
    pattern::{normalize, RoutePattern},
    Interceptor, Next, Result, RouteContext, RouteResult, Terminal,
};
use crate::{
    observer::ObserverManager,
    utils::{read, write},
};

#[derive(Clone)]
struct LocalInterceptor {
    pattern: String,
    interceptor: Arc<dyn Interceptor>,
}

/// Global interceptors run for every route, local ones only when their
/// pattern matches the path being opened.
#[derive(Default)]
pub struct InterceptorManager {
    global: RwLock<Vec<Arc<dyn Interceptor>>>,
    local: RwLock<Vec<LocalInterceptor>>,
}

impl InterceptorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        debug!(
            interceptor = interceptor.name(),
            priority = interceptor.priority(),
            "Adding global interceptor"
        );
        write(&self.global).push(interceptor);
    }

    /// Removes the first registration of this exact interceptor.
    pub fn remove_global_interceptor(&self, interceptor: &Arc<dyn Interceptor>) -> bool {
        let mut global = write(&self.global);
        match global.iter().position(|it| Arc::ptr_eq(it, interceptor)) {
            Some(index) => {
                global.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn add_interceptor(&self, pattern: &str, interceptor: Arc<dyn Interceptor>) {
        let pattern = normalize(pattern).to_string();
        debug!(interceptor = interceptor.name(), pattern = %pattern, "Adding local interceptor");
        write(&self.local).push(LocalInterceptor {
            pattern,
            interceptor,
        });
    }

    pub fn remove_interceptor(&self, pattern: &str, interceptor: &Arc<dyn Interceptor>) -> bool {
        let pattern = normalize(pattern);
        let mut local = write(&self.local);
        let before = local.len();
        local.retain(|it| !(it.pattern == pattern && Arc::ptr_eq(&it.interceptor, interceptor)));
        local.len() != before
    }

    /// Drops every interceptor bound to `pattern`, returning how many were removed.
    pub fn remove_all_interceptors(&self, pattern: &str) -> usize {
        let pattern = normalize(pattern);
        let mut local = write(&self.local);
        let before = local.len();
        local.retain(|it| it.pattern != pattern);
        before - local.len()
    }

    pub fn applicable_interceptors(&self, path: &str) -> Vec<Arc<dyn Interceptor>> {
        let mut interceptors = read(&self.global).clone();
        interceptors.extend(
            read(&self.local)
                .iter()
                .filter(|it| it.pattern.is_match(path))
                .map(|it| it.interceptor.clone()),
        );
        interceptors.sort_by_key(|interceptor| interceptor.priority());
        interceptors
    }

    pub async fn execute_chain(
        &self,
        context: RouteContext,
        terminal: Arc<dyn Terminal>,
        observers: Option<Arc<ObserverManager>>,
    ) -> Result<RouteResult> {
        let chain = Next::chain(self.applicable_interceptors(context.path()), terminal);
        match observers {
            Some(observers) => chain.with_observers(observers).run(context).await,
            None => chain.run(context).await,
        }
    }

    pub fn global_count(&self) -> usize {
        read(&self.global).len()
    }

    pub fn local_count(&self) -> usize {
        read(&self.local).len()
    }

    /// Distinct patterns with local interceptors, in registration order.
    pub fn local_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = Vec::new();
        for it in read(&self.local).iter() {
            if !patterns.contains(&it.pattern) {
                patterns.push(it.pattern.clone());
            }
        }
        patterns
    }

    pub fn clear(&self) {
        write(&self.global).clear();
        write(&self.local).clear();
    }
}

impl std::fmt::Debug for InterceptorManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorManager")
            .field("global", &self.global_count())
            .field("local", &self.local_patterns())
            .finish()
    }
}
