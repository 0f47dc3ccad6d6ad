use std::sync::Arc;

use crate::route::{ActionHandler, ActionRoute, PageRoute, RouteTable, ACTION_PREFIX};

/// A route declared up front and registered in bulk.
pub enum RouteDefinition {
    Page {
        pattern: String,
        route: PageRoute,
    },
    Action {
        route: ActionRoute,
        handler: Arc<dyn ActionHandler>,
    },
}

impl RouteDefinition {
    pub fn page<S: Into<String>>(pattern: S, route: PageRoute) -> Self {
        Self::Page {
            pattern: pattern.into(),
            route,
        }
    }

    pub fn action<S: Into<String>, H: ActionHandler + 'static>(action_name: S, handler: H) -> Self {
        Self::Action {
            route: ActionRoute::new(action_name),
            handler: Arc::new(handler),
        }
    }
}

/// Registration facade over a shared [RouteTable].
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    table: Arc<RouteTable>,
}

impl RouteRegistry {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn register_page(&self, pattern: &str, route: PageRoute) -> &Self {
        self.table.register_page(pattern, route);
        self
    }

    pub fn register_action<H>(&self, action_name: &str, handler: H) -> &Self
    where
        H: ActionHandler + 'static,
    {
        self.register_action_with(action_name, ActionRoute::new(action_name), handler)
    }

    pub fn register_action_with<H: ActionHandler + 'static>(
        &self,
        action_name: &str,
        route: ActionRoute,
        handler: H,
    ) -> &Self {
        self.table
            .register_action(action_name, route, Arc::new(handler));
        self
    }

    pub fn register_all<I: IntoIterator<Item = RouteDefinition>>(&self, definitions: I) -> &Self {
        for definition in definitions {
            match definition {
                RouteDefinition::Page { pattern, route } => {
                    self.table.register_page(&pattern, route)
                }
                RouteDefinition::Action { route, handler } => {
                    let action_name = route.action_name.clone();
                    self.table.register_action(&action_name, route, handler)
                }
            }
        }
        self
    }

    /// Accepts a page pattern, an `action/<name>` pattern or a bare action name.
    pub fn is_registered(&self, pattern: &str) -> bool {
        self.table.contains(pattern) || self.table.contains(&format!("{ACTION_PREFIX}{pattern}"))
    }

    pub fn unregister_page(&self, pattern: &str) -> bool {
        self.table.remove_page(pattern)
    }

    pub fn unregister_action(&self, action_name: &str) -> bool {
        self.table.remove_action(action_name)
    }
}
