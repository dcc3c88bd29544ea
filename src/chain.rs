use crate::error::FetchError;
use crate::middleware::{Entry, MiddlewareFuture};
use crate::request::Request;
use crate::transport::{Transport, terminal_entry};
use std::sync::Arc;

/// Continuation over the remainder of a per-fetch chain.
///
/// A `Next` is an immutable view of the chain plus a cursor. It is consumed
/// by value: once a handler calls [`run`](Next::run) (or drops it), there is
/// no way back into earlier links. Traversal is single-pass and
/// forward-only.
pub struct Next {
    chain: Arc<[Entry]>,
    cursor: usize,
}

impl Next {
    /// Invokes the link at the cursor, handing it a continuation over the
    /// links after it. The last link receives no continuation.
    pub fn run(self, request: Request) -> MiddlewareFuture {
        let next = if self.cursor + 1 < self.chain.len() {
            Some(Next {
                chain: self.chain.clone(),
                cursor: self.cursor + 1,
            })
        } else {
            None
        };

        self.chain[self.cursor].invoke(request, next)
    }
}

/// Forwards the request to the rest of the chain, failing if this was the
/// last link. Convenience for passthrough-style handlers.
pub fn forward(request: Request, next: Option<Next>) -> MiddlewareFuture {
    match next {
        Some(next) => next.run(request),
        None => Box::pin(async { Err(FetchError::invalid("No further chain link to forward to")) }),
    }
}

/// Builds the runtime chain for one fetch: a snapshot of the installed
/// entries with the terminal transport link appended, positioned at link 0.
pub(crate) fn build(entries: &[Entry], transport: Arc<dyn Transport>) -> Next {
    let mut chain = Vec::with_capacity(entries.len() + 1);
    chain.extend_from_slice(entries);
    chain.push(terminal_entry(transport));

    Next {
        chain: chain.into(),
        cursor: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{MiddlewareDescriptor, MiddlewareOptions, verify};
    use crate::response::Response;
    use async_trait::async_trait;
    use hyper::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct CountingTransport {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn send(&self, _request: Request) -> Result<Response, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(hyper::Response::builder()
                .status(StatusCode::OK)
                .body(crate::response::full_body("ok"))
                .unwrap())
        }
    }

    fn request() -> Request {
        hyper::Request::builder()
            .uri("/path/to/data")
            .body(http_body_util::Full::new(bytes::Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn bare_chain_reaches_the_transport() {
        let transport = CountingTransport::default();
        let head = build(&[], Arc::new(transport.clone()));

        let response = head.run(request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn links_before_the_terminal_receive_a_continuation() {
        let saw_next = Arc::new(AtomicUsize::new(0));
        let entry = verify(MiddlewareDescriptor::new("probe", {
            let saw_next = saw_next.clone();
            move |request: Request, next: Option<Next>, _options: Option<MiddlewareOptions>| {
                if next.is_some() {
                    saw_next.fetch_add(1, Ordering::SeqCst);
                }
                forward(request, next)
            }
        }))
        .unwrap();

        let transport = CountingTransport::default();
        build(&[entry], Arc::new(transport.clone()))
            .run(request())
            .await
            .unwrap();

        assert_eq!(saw_next.load(Ordering::SeqCst), 1);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forward_without_a_continuation_fails() {
        let result = forward(request(), None).await;
        assert!(matches!(result, Err(FetchError::InvalidArgument(_))));
    }
}
