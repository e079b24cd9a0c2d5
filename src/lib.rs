//! Path-based redirects, resolved through a chain of lookups.
//!
//! Each resolver either answers a path with a target URL (sent back as `302 Found`)
//! or hands the untouched request to the next handler in line:
//!
//! ```text
//! store (redb) -> rule file (YAML) -> static map -> greeting
//! ```

pub mod body;
pub mod chain;
pub mod config;
pub mod err;
pub mod handler;
pub mod hello;
pub mod opt;
pub mod resolve;
pub mod serve;
pub mod server;

pub use handler::{handler_fn, BoxedHandler, Handler};
pub use resolve::map::{map_handler, MapResolver};
pub use resolve::rules::{yaml_handler, Rule, RuleSetError};
pub use resolve::store::{store_handler, StoreResolver};
pub use resolve::{Redirect, Resolve};
