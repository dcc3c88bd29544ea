use crate::chain;
use crate::error::FetchError;
use crate::middleware::{self, Entry, MiddlewareDescriptor};
use crate::request::{self, FetchTarget, RequestOptions};
use crate::response::Response;
use crate::transport::{HyperTransport, Transport};
use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Where [`Dispatcher::with_added`] places the new middleware relative to
/// the already-installed entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// After all installed entries (the default).
    #[default]
    Append,
    /// Before all installed entries.
    Prepend,
}

/// Ordered middleware pipeline around a terminal [`Transport`].
///
/// [`register`](Dispatcher::register) mutates the receiver and applies to
/// every later fetch through it. [`with_added`](Dispatcher::with_added) and
/// [`with_removed`](Dispatcher::with_removed) never touch the receiver:
/// they derive a new dispatcher with a copied entry list, so a call site
/// can scope extra middleware to itself without affecting anyone sharing
/// the original.
#[derive(Clone)]
pub struct Dispatcher {
    entries: Vec<Entry>,
    transport: Arc<dyn Transport>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(HyperTransport::new())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("middlewares", &self.middleware_names().collect::<Vec<_>>())
            .finish()
    }
}

impl Dispatcher {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            entries: Vec::new(),
            transport: Arc::new(transport),
        }
    }

    /// Installs a middleware at the end of this dispatcher's list.
    ///
    /// Fails with [`FetchError::InvalidArgument`] if the descriptor does
    /// not verify.
    pub fn register(&mut self, descriptor: MiddlewareDescriptor) -> Result<(), FetchError> {
        let entry = middleware::verify(descriptor)?;
        log::debug!("registered middleware `{}`", entry.name);
        self.entries.push(entry);
        Ok(())
    }

    /// Returns a new dispatcher with `descriptor` added, leaving this one
    /// untouched.
    pub fn with_added(
        &self,
        descriptor: MiddlewareDescriptor,
        placement: Placement,
    ) -> Result<Dispatcher, FetchError> {
        let entry = middleware::verify(descriptor)?;
        let mut derived = self.clone();
        match placement {
            Placement::Prepend => derived.entries.insert(0, entry),
            Placement::Append => derived.entries.push(entry),
        }

        Ok(derived)
    }

    /// Returns a new dispatcher without any entry named `name`, leaving
    /// this one untouched. A name that matches nothing yields a plain copy,
    /// not an error.
    pub fn with_removed(&self, name: &str) -> Result<Dispatcher, FetchError> {
        if name.is_empty() {
            return Err(FetchError::invalid(
                "Middleware name must be a non-empty string",
            ));
        }

        let mut derived = self.clone();
        derived.entries.retain(|entry| entry.name != name);
        Ok(derived)
    }

    /// Runs the chain: every installed middleware in registration order,
    /// then the transport.
    ///
    /// The future resolves to whatever the chain produces: the transport's
    /// response untouched when every link forwards, or the synthesized
    /// result of a short-circuiting link. Malformed input (an unparseable
    /// URL) surfaces as an `Err` from the future, never as a panic, so
    /// callers await this uniformly.
    pub fn fetch(
        &self,
        target: impl Into<FetchTarget>,
        options: Option<RequestOptions>,
    ) -> BoxFuture<'static, Result<Response, FetchError>> {
        // Snapshot before anything runs, so registrations landing while
        // this call is in flight cannot reshape its chain.
        let head = chain::build(&self.entries, self.transport.clone());
        let target = target.into();

        Box::pin(async move {
            let request = request::into_request(target, options)?;
            head.run(request).await
        })
    }

    /// Number of installed middleware entries.
    pub fn middleware_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn middleware_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}
