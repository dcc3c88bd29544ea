use crate::chain::Next;
use crate::error::FetchError;
use crate::middleware::{Entry, Middleware, MiddlewareFuture, MiddlewareOptions};
use crate::request::Request;
use crate::response::Response;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;

/// Terminal network capability invoked by the last link of every chain.
///
/// The pipeline never interprets what comes back: the transport's response,
/// or its error, is the chain's result as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

/// Production transport backed by the hyper client.
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(FetchError::transport)?;

        Ok(response.map(BodyExt::boxed))
    }
}

/// Synthetic last chain link: hands the request to the transport. It never
/// receives a usable continuation and has no options.
struct TerminalLink {
    transport: Arc<dyn Transport>,
}

impl Middleware for TerminalLink {
    fn handle(
        &self,
        request: Request,
        _next: Option<Next>,
        _options: Option<MiddlewareOptions>,
    ) -> MiddlewareFuture {
        log::debug!("{} {}", request.method(), request.uri());
        let transport = self.transport.clone();
        Box::pin(async move { transport.send(request).await })
    }
}

pub(crate) fn terminal_entry(transport: Arc<dyn Transport>) -> Entry {
    Entry::new("transport", Arc::new(TerminalLink { transport }), None)
}
