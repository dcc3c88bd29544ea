//! # fetch_rs
//!
//! An extensible fetch pipeline: an ordered chain of named middleware
//! wrapped around a terminal network [`Transport`], so cross-cutting
//! request behaviors (auth headers, retries, caching) compose without
//! touching call sites.
//!
//! A [`Dispatcher`] owns the installed middleware list. Each fetch builds a
//! private chain (the installed entries plus a terminal transport link)
//! and hands the request to the first link. Every link decides whether to
//! forward to the rest of the chain via [`Next::run`] or to answer the
//! request itself, which skips everything after it, transport included.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use fetch_rs::{Dispatcher, MiddlewareDescriptor, forward};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fetch_rs::FetchError> {
//!     let mut dispatcher = Dispatcher::default();
//!
//!     dispatcher.register(MiddlewareDescriptor::new(
//!         "auth",
//!         |mut request: fetch_rs::Request,
//!          next: Option<fetch_rs::Next>,
//!          _options: Option<fetch_rs::MiddlewareOptions>| {
//!             request.headers_mut().insert(
//!                 hyper::header::AUTHORIZATION,
//!                 hyper::header::HeaderValue::from_static("Bearer token"),
//!             );
//!             forward(request, next)
//!         },
//!     ))?;
//!
//!     let response = dispatcher.fetch("http://localhost:8080/data", None).await?;
//!     println!("{}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Scoped middleware
//!
//! [`Dispatcher::with_added`] and [`Dispatcher::with_removed`] derive a new
//! dispatcher and never mutate the receiver, so one call site can adjust
//! the chain for itself while everyone else keeps the original behavior.
//!
//! ## The default instance
//!
//! A process-wide dispatcher backed by [`HyperTransport`] is available
//! through the free functions [`fetch`], [`register`], [`with_added`] and
//! [`with_removed`]. It is created on first use, lives for the process, and
//! is reset only by replacing it wholesale via [`replace_default`].
//! Anything that should not share process state constructs its own
//! [`Dispatcher`] instead; behavior is identical.

mod chain;
mod dispatcher;
mod error;
mod middleware;
mod request;
mod response;
mod transport;

pub use chain::{Next, forward};
pub use dispatcher::{Dispatcher, Placement};
pub use error::FetchError;
pub use middleware::{Middleware, MiddlewareDescriptor, MiddlewareFuture, MiddlewareOptions};
pub use request::{FetchTarget, Request, RequestOptions};
pub use response::{Body, Response, empty_body, full_body};
pub use transport::{HyperTransport, Transport};

use futures_util::future::BoxFuture;
use once_cell::sync::Lazy;
use std::sync::RwLock;

// Process-wide default dispatcher, created on first use.
static DEFAULT_DISPATCHER: Lazy<RwLock<Dispatcher>> =
    Lazy::new(|| RwLock::new(Dispatcher::default()));

/// Runs a fetch through the process-wide default dispatcher.
pub fn fetch(
    target: impl Into<FetchTarget>,
    options: Option<RequestOptions>,
) -> BoxFuture<'static, Result<Response, FetchError>> {
    DEFAULT_DISPATCHER.read().unwrap().fetch(target, options)
}

/// Installs a middleware on the process-wide default dispatcher.
pub fn register(descriptor: MiddlewareDescriptor) -> Result<(), FetchError> {
    DEFAULT_DISPATCHER.write().unwrap().register(descriptor)
}

/// Derives from the process-wide default dispatcher with `descriptor`
/// added. The default instance is untouched.
pub fn with_added(
    descriptor: MiddlewareDescriptor,
    placement: Placement,
) -> Result<Dispatcher, FetchError> {
    DEFAULT_DISPATCHER
        .read()
        .unwrap()
        .with_added(descriptor, placement)
}

/// Derives from the process-wide default dispatcher with every entry named
/// `name` removed. The default instance is untouched.
pub fn with_removed(name: &str) -> Result<Dispatcher, FetchError> {
    DEFAULT_DISPATCHER.read().unwrap().with_removed(name)
}

/// Snapshot of the process-wide default dispatcher.
pub fn default_dispatcher() -> Dispatcher {
    DEFAULT_DISPATCHER.read().unwrap().clone()
}

/// Replaces the process-wide default dispatcher: the way to install a
/// custom transport, or to clear every registered middleware at once.
pub fn replace_default(dispatcher: Dispatcher) {
    *DEFAULT_DISPATCHER.write().unwrap() = dispatcher;
}
