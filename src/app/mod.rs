mod builder;
mod config;
mod registry;
mod router;

pub use builder::RouterBuilder;
pub use config::{RouterConfig, DEFAULT_MAX_REDIRECTS, DEFAULT_SCHEME};
pub use registry::{RouteDefinition, RouteRegistry};
pub use router::Router;
