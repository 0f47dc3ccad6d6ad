mod callback;
mod event;

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{Arc, RwLock},
    time::Duration,
};

use essentials::{debug, error};

use crate::{
    route::{Interceptor, RouteContext, RouteResult},
    utils::{read, write},
};

pub use callback::{RouteCallback, RouteError, RouteErrorCode, SimpleRouteCallback};
pub use event::{EventObserver, RouteEvent, RouteResultType};

/// Observers watch routes being opened without influencing them.
pub trait RouteObserver: Send + Sync {
    fn on_route_start(&self, _context: &RouteContext) {}

    fn on_route_complete(&self, _context: &RouteContext, _result: &RouteResult) {}

    fn on_interceptor_executed(
        &self,
        _interceptor: &dyn Interceptor,
        _context: &RouteContext,
        _duration: Duration,
    ) {
    }
}

#[derive(Default)]
pub struct ObserverManager {
    observers: RwLock<Vec<Arc<dyn RouteObserver>>>,
}

impl ObserverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding the same observer twice has no effect.
    pub fn add_observer(&self, observer: Arc<dyn RouteObserver>) {
        let mut observers = write(&self.observers);
        if !observers.iter().any(|it| Arc::ptr_eq(it, &observer)) {
            observers.push(observer);
        }
    }

    pub fn remove_observer(&self, observer: &Arc<dyn RouteObserver>) -> bool {
        let mut observers = write(&self.observers);
        let before = observers.len();
        observers.retain(|it| !Arc::ptr_eq(it, observer));
        observers.len() != before
    }

    pub fn clear(&self) {
        write(&self.observers).clear();
    }

    pub fn len(&self) -> usize {
        read(&self.observers).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify_route_start(&self, context: &RouteContext) {
        self.each("route_start", |observer| observer.on_route_start(context));
    }

    pub fn notify_route_complete(&self, context: &RouteContext, result: &RouteResult) {
        self.each("route_complete", |observer| {
            observer.on_route_complete(context, result)
        });
    }

    pub fn notify_interceptor_executed(
        &self,
        interceptor: &dyn Interceptor,
        context: &RouteContext,
        duration: Duration,
    ) {
        self.each("interceptor_executed", |observer| {
            observer.on_interceptor_executed(interceptor, context, duration)
        });
    }

    // Works on a snapshot so observers may add or remove observers while notified.
    fn each(&self, event: &str, notify: impl Fn(&dyn RouteObserver)) {
        let observers = read(&self.observers).clone();
        if !observers.is_empty() {
            debug!(event, observers = observers.len(), "Notifying observers");
        }
        for observer in observers {
            if catch_unwind(AssertUnwindSafe(|| notify(observer.as_ref()))).is_err() {
                error!(event, "Route observer panicked");
            }
        }
    }
}

impl std::fmt::Debug for ObserverManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverManager")
            .field("observers", &self.len())
            .finish()
    }
}
