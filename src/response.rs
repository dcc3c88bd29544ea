use bytes::Bytes;
use http_body_util::{BodyExt, Full, combinators::BoxBody};
use hyper::Response as HyperResponse;

/// Boxed response body.
///
/// The terminal transport hands back a streaming hyper body; middleware that
/// answers a request itself uses an in-memory one. Boxing lets both flow
/// through the same chain.
pub type Body = BoxBody<Bytes, hyper::Error>;

/// Aliased response type produced by the chain.
pub type Response = HyperResponse<Body>;

/// Builds an in-memory body, for middleware that synthesizes a response
/// instead of forwarding to the rest of the chain.
pub fn full_body(data: impl Into<Bytes>) -> Body {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

/// An empty body.
pub fn empty_body() -> Body {
    full_body(Bytes::new())
}
