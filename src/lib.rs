//! A tiny per-request HTTP router in the style of Express.
//!
//! One [`http::router::Router`] is built for every inbound request. Routes are
//! registered in program order with `get`/`post`/`put`/`patch`/`delete` (or
//! `handle` for any method); the first registration whose method and pattern
//! match runs its handler with a read-only [`http::context::Request`] and a
//! chainable [`http::res::Response`].

pub mod error;
pub mod http;
pub mod server;

pub use error::{RequestError, RouteError, RouteResult};
