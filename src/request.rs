use crate::error::FetchError;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request as HyperRequest, Uri,
    header::{HeaderMap, HeaderValue, IntoHeaderName},
};

/// Aliased request type flowing through the chain.
///
/// By the time any middleware runs, the input has been normalized into one
/// of these.
pub type Request = HyperRequest<Full<Bytes>>;

/// Accepted inputs to a fetch: a URL to build a request from, or a request
/// that is already fully formed.
#[derive(Debug)]
pub enum FetchTarget {
    Url(String),
    Request(Request),
}

impl From<&str> for FetchTarget {
    fn from(url: &str) -> Self {
        FetchTarget::Url(url.to_string())
    }
}

impl From<String> for FetchTarget {
    fn from(url: String) -> Self {
        FetchTarget::Url(url)
    }
}

impl From<Uri> for FetchTarget {
    fn from(uri: Uri) -> Self {
        FetchTarget::Url(uri.to_string())
    }
}

impl From<Request> for FetchTarget {
    fn from(request: Request) -> Self {
        FetchTarget::Request(request)
    }
}

/// Init options applied when a [`FetchTarget::Url`] is normalized into a
/// [`Request`]. Ignored for prebuilt requests.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    method: Option<Method>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request method. Defaults to `GET`.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Inserts a header, replacing any previous value for the same name.
    pub fn header<K: IntoHeaderName, V: Into<HeaderValue>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key, value.into());
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body and sets the content type.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)
            .map_err(|e| FetchError::invalid(format!("Failed to serialize JSON body: {e}")))?;
        Ok(self
            .header(
                hyper::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(json))
    }
}

/// Normalizes a fetch input into a fully-formed [`Request`].
///
/// Prebuilt requests pass through untouched (`options` does not apply to
/// them). A URL is parsed and combined with `options`; anything that cannot
/// be turned into a request fails with [`FetchError::InvalidArgument`].
pub(crate) fn into_request(
    target: FetchTarget,
    options: Option<RequestOptions>,
) -> Result<Request, FetchError> {
    let url = match target {
        FetchTarget::Request(request) => return Ok(request),
        FetchTarget::Url(url) => url,
    };

    let uri: Uri = url
        .parse()
        .map_err(|_| FetchError::invalid(format!("Invalid input argument(s) supplied: {url:?}")))?;

    let options = options.unwrap_or_default();
    let mut builder = HyperRequest::builder()
        .method(options.method.unwrap_or(Method::GET))
        .uri(uri);

    if let Some(headers) = builder.headers_mut() {
        headers.extend(options.headers);
    }

    builder
        .body(Full::new(options.body.unwrap_or_default()))
        .map_err(|e| FetchError::invalid(format!("Failed to build request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::CONTENT_TYPE;
    use serde_json::json;

    #[test]
    fn url_is_normalized_with_options() {
        let options = RequestOptions::new()
            .method(Method::PUT)
            .header("x-test", HeaderValue::from_static("yes"))
            .body("payload");

        let request = into_request("/path/to/data".into(), Some(options)).unwrap();

        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.uri().path(), "/path/to/data");
        assert_eq!(request.headers().get("x-test").unwrap(), "yes");
    }

    #[test]
    fn url_without_options_defaults_to_get() {
        let request = into_request("http://localhost/data".into(), None).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().host(), Some("localhost"));
    }

    #[test]
    fn prebuilt_request_passes_through_untouched() {
        let prebuilt = HyperRequest::builder()
            .method(Method::DELETE)
            .uri("http://localhost/item/7")
            .body(Full::new(Bytes::new()))
            .unwrap();

        // Options only apply to URL inputs.
        let options = RequestOptions::new().method(Method::POST);
        let request = into_request(prebuilt.into(), Some(options)).unwrap();

        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.uri().path(), "/item/7");
    }

    #[test]
    fn unparseable_url_is_an_invalid_argument() {
        for bad in ["", "http://exa mple.com/spaced", "\u{0}"] {
            let result = into_request(bad.into(), None);
            assert!(matches!(result, Err(FetchError::InvalidArgument(_))));
        }
    }

    #[test]
    fn json_sets_body_and_content_type() {
        let options = RequestOptions::new()
            .json(&json!({ "status": "success" }))
            .unwrap();
        let request = into_request("/api".into(), Some(options)).unwrap();

        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn fetch_target_conversions() {
        assert!(matches!(FetchTarget::from("/a"), FetchTarget::Url(_)));
        assert!(matches!(
            FetchTarget::from(String::from("/b")),
            FetchTarget::Url(_)
        ));
        assert!(matches!(
            FetchTarget::from(Uri::from_static("http://localhost/c")),
            FetchTarget::Url(_)
        ));
    }
}
