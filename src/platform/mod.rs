//! Seams to the host UI layer.
//!
//! The router never touches screens itself. Pages are handed to a
//! [Navigator] and actions run through [ActionHandler]s, both supplied by
//! the platform embedding the router.

use std::sync::Arc;

use anyhow::anyhow;
use essentials::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    params::Params,
    route::{ActionCallback, RouteTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavMode {
    #[default]
    Push,
    Present,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationOptions {
    pub animated: bool,
    pub present_style: Option<String>,
    pub nav_mode: NavMode,
    pub extras: Params,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            animated: true,
            present_style: None,
            nav_mode: NavMode::Push,
            extras: Params::new(),
        }
    }
}

impl NavigationOptions {
    pub fn present() -> Self {
        Self::default().with_nav_mode(NavMode::Present)
    }

    pub fn with_nav_mode(mut self, nav_mode: NavMode) -> Self {
        self.nav_mode = nav_mode;
        self
    }

    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn with_present_style<S: Into<String>>(mut self, style: S) -> Self {
        self.present_style = Some(style.into());
        self
    }
}

pub trait Navigator: Send + Sync {
    fn push(
        &self,
        page_id: &str,
        params: &Params,
        options: &NavigationOptions,
    ) -> anyhow::Result<()>;
    fn present(
        &self,
        page_id: &str,
        params: &Params,
        options: &NavigationOptions,
    ) -> anyhow::Result<()>;
    fn pop(&self, result: Option<Value>);
    fn pop_to(&self, page_id: &str, result: Option<Value>);
    fn pop_to_root(&self);
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn push(
        &self,
        page_id: &str,
        params: &Params,
        options: &NavigationOptions,
    ) -> anyhow::Result<()> {
        (**self).push(page_id, params, options)
    }

    fn present(
        &self,
        page_id: &str,
        params: &Params,
        options: &NavigationOptions,
    ) -> anyhow::Result<()> {
        (**self).present(page_id, params, options)
    }

    fn pop(&self, result: Option<Value>) {
        (**self).pop(result)
    }

    fn pop_to(&self, page_id: &str, result: Option<Value>) {
        (**self).pop_to(page_id, result)
    }

    fn pop_to_root(&self) {
        (**self).pop_to_root()
    }
}

pub trait ActionExecutor: Send + Sync {
    fn execute(
        &self,
        action_name: &str,
        params: &Params,
        callback: Option<&dyn ActionCallback>,
    ) -> anyhow::Result<()>;

    fn can_execute(&self, action_name: &str) -> bool;
}

/// Runs actions registered in a [RouteTable] by name.
#[derive(Debug, Clone)]
pub struct TableActionExecutor {
    table: Arc<RouteTable>,
}

impl TableActionExecutor {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }
}

impl ActionExecutor for TableActionExecutor {
    fn execute(
        &self,
        action_name: &str,
        params: &Params,
        callback: Option<&dyn ActionCallback>,
    ) -> anyhow::Result<()> {
        let entry = self
            .table
            .action(action_name)
            .ok_or_else(|| anyhow!("Action not registered: {}", action_name))?;
        let logging = LoggingCallback::new(action_name);
        entry.handler.execute(params, callback.unwrap_or(&logging))
    }

    fn can_execute(&self, action_name: &str) -> bool {
        self.table.action(action_name).is_some()
    }
}

/// Callback that only logs what the action reported.
pub(crate) struct LoggingCallback<'a> {
    action_name: &'a str,
}

impl<'a> LoggingCallback<'a> {
    pub(crate) fn new(action_name: &'a str) -> Self {
        Self { action_name }
    }
}

impl ActionCallback for LoggingCallback<'_> {
    fn on_success(&self, result: Option<Value>) {
        debug!(action = self.action_name, result = ?result, "Action succeeded");
    }

    fn on_error(&self, err: anyhow::Error) {
        error!(action = self.action_name, "Action failed: {:#}", err);
    }
}
