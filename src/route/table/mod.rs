mod entry;

use std::sync::{Arc, RwLock};

use essentials::debug;
use indexmap::IndexMap;

use super::{
    parser::ParsedRoute,
    pattern::{find_best_match, normalize, RouteMatch},
};
use crate::utils::{read, write};

pub use entry::{
    ActionCallback, ActionEntry, ActionHandler, ActionRoute, PageEntry, PageRoute, PageTarget,
    PlatformPage,
};

/// Paths under this prefix are looked up among actions first.
pub const ACTION_PREFIX: &str = "action/";

#[derive(Debug, Clone)]
pub enum RouteLookup {
    Page(Arc<PageEntry>, RouteMatch),
    Action(Arc<ActionEntry>, RouteMatch),
}

/// Registered page and action routes.
///
/// Registration order is kept, it decides which pattern wins when two
/// patterns match a path with the same score.
#[derive(Debug, Default)]
pub struct RouteTable {
    pages: RwLock<IndexMap<String, Arc<PageEntry>>>,
    actions: RwLock<IndexMap<String, Arc<ActionEntry>>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page, replacing any page with the same pattern in place.
    pub fn register_page(&self, pattern: &str, route: PageRoute) {
        let pattern = normalize(pattern).to_string();
        debug!(pattern = %pattern, page_id = ?route.page_id, "Registering page route");
        let entry = Arc::new(PageEntry {
            pattern: pattern.clone(),
            route,
        });
        write(&self.pages).insert(pattern, entry);
    }

    pub fn register_action(
        &self,
        action_name: &str,
        route: ActionRoute,
        handler: Arc<dyn ActionHandler>,
    ) {
        let pattern = format!("{ACTION_PREFIX}{action_name}");
        debug!(pattern = %pattern, "Registering action route");
        let entry = Arc::new(ActionEntry {
            pattern: pattern.clone(),
            route,
            handler,
        });
        write(&self.actions).insert(pattern, entry);
    }

    pub fn lookup(&self, route: &ParsedRoute) -> Option<RouteLookup> {
        let path = route.path.as_str();
        if path.starts_with(ACTION_PREFIX) {
            let actions = read(&self.actions);
            if let Some((entry, matched)) = best_entry(&actions, path) {
                return Some(RouteLookup::Action(entry, matched));
            }
        }
        let pages = read(&self.pages);
        best_entry(&pages, path).map(|(entry, matched)| RouteLookup::Page(entry, matched))
    }

    pub fn can_open(&self, route: &ParsedRoute) -> bool {
        self.lookup(route).is_some()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        let pattern = normalize(pattern);
        read(&self.pages).contains_key(pattern) || read(&self.actions).contains_key(pattern)
    }

    pub fn page(&self, pattern: &str) -> Option<Arc<PageEntry>> {
        read(&self.pages).get(normalize(pattern)).cloned()
    }

    /// Finds the page a navigator was asked to show.
    pub fn page_by_id(&self, page_id: &str) -> Option<Arc<PageEntry>> {
        read(&self.pages)
            .values()
            .find(|entry| entry.page_id() == page_id)
            .cloned()
    }

    pub fn action(&self, action_name: &str) -> Option<Arc<ActionEntry>> {
        read(&self.actions)
            .get(&format!("{ACTION_PREFIX}{action_name}"))
            .cloned()
    }

    pub fn remove_page(&self, pattern: &str) -> bool {
        write(&self.pages).shift_remove(normalize(pattern)).is_some()
    }

    pub fn remove_action(&self, action_name: &str) -> bool {
        write(&self.actions)
            .shift_remove(&format!("{ACTION_PREFIX}{action_name}"))
            .is_some()
    }

    pub fn clear(&self) {
        write(&self.pages).clear();
        write(&self.actions).clear();
    }

    pub fn len(&self) -> usize {
        read(&self.pages).len() + read(&self.actions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn page_patterns(&self) -> Vec<String> {
        read(&self.pages).keys().cloned().collect()
    }

    pub fn action_patterns(&self) -> Vec<String> {
        read(&self.actions).keys().cloned().collect()
    }
}

fn best_entry<T>(
    entries: &IndexMap<String, Arc<T>>,
    path: &str,
) -> Option<(Arc<T>, RouteMatch)> {
    let matched = find_best_match(path, entries.keys().map(String::as_str))?;
    let entry = entries.get(&matched.pattern)?.clone();
    Some((entry, matched))
}
