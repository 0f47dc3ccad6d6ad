use std::sync::RwLock;

use essentials::debug;

use super::{FallbackAction, FallbackConfig, FallbackHandler};
use crate::{
    route::{normalize, Error, RouteContext, RoutePattern},
    utils::{read, write},
};

#[derive(Debug, Clone)]
struct PatternRule {
    pattern: String,
    config: FallbackConfig,
}

/// [FallbackHandler] with global defaults and per pattern rules.
///
/// Rules are checked in the order they were added, the first rule whose
/// pattern matches the failing path and whose condition holds decides the
/// action. Without one the global action for the failure kind is used.
#[derive(Debug, Default)]
pub struct FallbackManager {
    not_found: RwLock<FallbackAction>,
    error: RwLock<FallbackAction>,
    rules: RwLock<Vec<PatternRule>>,
}

impl FallbackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_global_fallback(&self, action: FallbackAction) {
        *write(&self.not_found) = action;
    }

    pub fn set_global_error_fallback(&self, action: FallbackAction) {
        *write(&self.error) = action;
    }

    pub fn add_pattern_fallback(&self, pattern: &str, action: FallbackAction) {
        self.add_rule(pattern, FallbackConfig::always(action));
    }

    pub fn add_conditional_fallback<F>(&self, pattern: &str, condition: F, action: FallbackAction)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.add_rule(pattern, FallbackConfig::new(condition, action));
    }

    fn add_rule(&self, pattern: &str, config: FallbackConfig) {
        write(&self.rules).push(PatternRule {
            pattern: normalize(pattern).to_string(),
            config,
        });
    }

    /// Removes every rule registered for `pattern`.
    pub fn remove_pattern_fallback(&self, pattern: &str) -> usize {
        let pattern = normalize(pattern);
        let mut rules = write(&self.rules);
        let before = rules.len();
        rules.retain(|rule| rule.pattern != pattern);
        before - rules.len()
    }

    pub fn clear_pattern_fallbacks(&self) {
        write(&self.rules).clear();
    }

    pub fn rule_count(&self) -> usize {
        read(&self.rules).len()
    }

    fn resolve(&self, context: &RouteContext, global: &RwLock<FallbackAction>) -> FallbackAction {
        // Conditions are user code, they run without the lock held.
        let rules = read(&self.rules).clone();
        let path = context.path();
        rules
            .into_iter()
            .find(|rule| rule.pattern.is_match(path) && rule.config.should_apply())
            .map(|rule| {
                debug!(
                    pattern = %rule.pattern,
                    action = ?rule.config.action,
                    "Pattern fallback applies"
                );
                rule.config.action
            })
            .unwrap_or_else(|| read(global).clone())
    }
}

impl FallbackHandler for FallbackManager {
    fn on_route_not_found(&self, context: &RouteContext) -> FallbackAction {
        self.resolve(context, &self.not_found)
    }

    fn on_route_error(&self, context: &RouteContext, _error: &Error) -> FallbackAction {
        self.resolve(context, &self.error)
    }
}
