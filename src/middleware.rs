use crate::chain::Next;
use crate::error::FetchError;
use crate::request::Request;
use crate::response::Response;
use futures_util::future::BoxFuture;
use std::any::Any;
use std::sync::Arc;

pub type MiddlewareFuture = BoxFuture<'static, Result<Response, FetchError>>;

/// Opaque per-registration options, handed back to the handler verbatim
/// (the same `Arc`) on every invocation.
pub type MiddlewareOptions = Arc<dyn Any + Send + Sync>;

/// Trait for chain middleware.
///
/// A middleware receives the request, a continuation bound to the remainder
/// of the chain, and whatever options it was registered with. Calling
/// [`Next::run`] hands control to the following link; dropping `next`
/// short-circuits the chain, and this handler's return value becomes the
/// chain's result. `next` is `None` only for the last link of a chain.
pub trait Middleware: Send + Sync + 'static {
    fn handle(
        &self,
        request: Request,
        next: Option<Next>,
        options: Option<MiddlewareOptions>,
    ) -> MiddlewareFuture;
}

/// Blanket impl for closures or functions that match the handler signature.
impl<F, Fut> Middleware for F
where
    F: Fn(Request, Option<Next>, Option<MiddlewareOptions>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, FetchError>> + Send + 'static,
{
    fn handle(
        &self,
        request: Request,
        next: Option<Next>,
        options: Option<MiddlewareOptions>,
    ) -> MiddlewareFuture {
        Box::pin((self)(request, next, options))
    }
}

/// A named middleware registration.
///
/// What callers hand to [`register`](crate::Dispatcher::register) and
/// [`with_added`](crate::Dispatcher::with_added).
pub struct MiddlewareDescriptor {
    pub name: String,
    pub handler: Arc<dyn Middleware>,
    pub options: Option<MiddlewareOptions>,
}

impl MiddlewareDescriptor {
    pub fn new(name: impl Into<String>, handler: impl Middleware) -> Self {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
            options: None,
        }
    }

    /// Attaches opaque options passed to the handler on every invocation.
    pub fn with_options(mut self, options: MiddlewareOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// An installed middleware entry.
///
/// Cloning is shallow: handler and options are shared, which is what makes
/// the per-fetch chain snapshot cheap.
#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) name: String,
    handler: Arc<dyn Middleware>,
    options: Option<MiddlewareOptions>,
}

impl Entry {
    pub(crate) fn new(
        name: impl Into<String>,
        handler: Arc<dyn Middleware>,
        options: Option<MiddlewareOptions>,
    ) -> Self {
        Self {
            name: name.into(),
            handler,
            options,
        }
    }

    pub(crate) fn invoke(&self, request: Request, next: Option<Next>) -> MiddlewareFuture {
        log::trace!("invoking middleware `{}`", self.name);
        self.handler.handle(request, next, self.options.clone())
    }
}

/// Checks a descriptor before installation.
///
/// The handler being callable is enforced by the type system; what remains
/// to verify at runtime is the name.
pub(crate) fn verify(descriptor: MiddlewareDescriptor) -> Result<Entry, FetchError> {
    if descriptor.name.is_empty() {
        return Err(FetchError::invalid(
            "Middleware name must be a non-empty string",
        ));
    }

    Ok(Entry::new(
        descriptor.name,
        descriptor.handler,
        descriptor.options,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::forward;

    fn passthrough() -> impl Middleware {
        |request: Request, next: Option<Next>, _options: Option<MiddlewareOptions>| {
            forward(request, next)
        }
    }

    #[test]
    fn verify_accepts_a_named_descriptor() {
        let entry = verify(MiddlewareDescriptor::new("auth", passthrough())).unwrap();
        assert_eq!(entry.name, "auth");
        assert!(entry.options.is_none());
    }

    #[test]
    fn verify_rejects_an_empty_name() {
        let result = verify(MiddlewareDescriptor::new("", passthrough()));
        assert!(matches!(result, Err(FetchError::InvalidArgument(_))));
    }

    #[test]
    fn verify_keeps_options() {
        let options: MiddlewareOptions = Arc::new(42u32);
        let descriptor =
            MiddlewareDescriptor::new("configured", passthrough()).with_options(options.clone());

        let entry = verify(descriptor).unwrap();
        assert!(Arc::ptr_eq(entry.options.as_ref().unwrap(), &options));
    }
}
