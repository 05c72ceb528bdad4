//! Request router for a serverless function fronting a single-table user store.
//!
//! Two resources are served: `notes` (placeholder handlers) and `users`
//! (point lookup, scan and upsert against a [`store::UserStore`]). Requests
//! arrive from the Lambda Runtime API ([`lambda`]), as a raw proxy event
//! ([`Dispatcher::handle_event`]) or through the local HTTP host in [`server`].

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod lambda;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::handler::Dispatcher;
pub use crate::http::{ApiRequest, ApiResponse};
