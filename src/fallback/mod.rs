mod manager;

use std::{fmt::Debug, sync::Arc};

use crate::route::{Error, RouteContext};

pub use manager::FallbackManager;

/// What to do when a route cannot be served.
#[derive(Clone, Default)]
pub enum FallbackAction {
    NavigateTo(String),
    ShowError(String),
    #[default]
    Ignore,
    Custom(Arc<dyn Fn() + Send + Sync>),
}

impl FallbackAction {
    pub fn navigate_to<S: Into<String>>(url: S) -> Self {
        Self::NavigateTo(url.into())
    }

    pub fn show_error<S: Into<String>>(message: S) -> Self {
        Self::ShowError(message.into())
    }

    pub fn custom<F: Fn() + Send + Sync + 'static>(handler: F) -> Self {
        Self::Custom(Arc::new(handler))
    }
}

impl Debug for FallbackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NavigateTo(url) => f.debug_tuple("NavigateTo").field(url).finish(),
            Self::ShowError(message) => f.debug_tuple("ShowError").field(message).finish(),
            Self::Ignore => f.write_str("Ignore"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl PartialEq for FallbackAction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NavigateTo(a), Self::NavigateTo(b)) => a == b,
            (Self::ShowError(a), Self::ShowError(b)) => a == b,
            (Self::Ignore, Self::Ignore) => true,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

type Condition = Arc<dyn Fn() -> bool + Send + Sync>;

/// A fallback applied only while its condition holds.
#[derive(Clone)]
pub struct FallbackConfig {
    condition: Condition,
    pub action: FallbackAction,
}

impl FallbackConfig {
    pub fn new<F>(condition: F, action: FallbackAction) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            condition: Arc::new(condition),
            action,
        }
    }

    pub fn always(action: FallbackAction) -> Self {
        Self::new(|| true, action)
    }

    pub fn should_apply(&self) -> bool {
        (self.condition)()
    }
}

impl Debug for FallbackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackConfig")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

pub trait FallbackHandler: Send + Sync {
    fn on_route_not_found(&self, context: &RouteContext) -> FallbackAction;
    fn on_route_error(&self, context: &RouteContext, error: &Error) -> FallbackAction;
}

impl<T: FallbackHandler + ?Sized> FallbackHandler for Arc<T> {
    fn on_route_not_found(&self, context: &RouteContext) -> FallbackAction {
        (**self).on_route_not_found(context)
    }

    fn on_route_error(&self, context: &RouteContext, error: &Error) -> FallbackAction {
        (**self).on_route_error(context, error)
    }
}

/// Ignores every failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFallbackHandler;

impl FallbackHandler for DefaultFallbackHandler {
    fn on_route_not_found(&self, _context: &RouteContext) -> FallbackAction {
        FallbackAction::Ignore
    }

    fn on_route_error(&self, _context: &RouteContext, _error: &Error) -> FallbackAction {
        FallbackAction::Ignore
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn condition_is_evaluated_each_time() {
        let enabled = Arc::new(AtomicBool::new(false));
        let flag = enabled.clone();
        let config = FallbackConfig::new(
            move || flag.load(Ordering::SeqCst),
            FallbackAction::navigate_to("app://home"),
        );
        assert!(!config.should_apply());
        enabled.store(true, Ordering::SeqCst);
        assert!(config.should_apply());
        assert!(FallbackConfig::always(FallbackAction::Ignore).should_apply());
    }

    #[test]
    fn actions_compare_by_value_or_identity() {
        assert_eq!(FallbackAction::navigate_to("a"), FallbackAction::NavigateTo("a".into()));
        assert_eq!(FallbackAction::default(), FallbackAction::Ignore);
        let custom = FallbackAction::custom(|| {});
        assert_eq!(custom.clone(), custom);
        assert!(custom != FallbackAction::custom(|| {}));
    }
}
