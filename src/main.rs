use fetch_rs::{
    Dispatcher, MiddlewareDescriptor, MiddlewareOptions, Next, Request, RequestOptions, forward,
};
use http_body_util::BodyExt;
use hyper::Method;
use hyper::header::{HeaderValue, USER_AGENT};
use log::info;
use std::time::Instant;

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut dispatcher = Dispatcher::default();

    dispatcher
        .register(MiddlewareDescriptor::new(
            "user-agent",
            |mut request: Request, next: Option<Next>, _options: Option<MiddlewareOptions>| {
                request
                    .headers_mut()
                    .insert(USER_AGENT, HeaderValue::from_static("fetch_rs-demo/0.1"));
                forward(request, next)
            },
        ))
        .expect("user-agent middleware is valid");

    dispatcher
        .register(MiddlewareDescriptor::new(
            "timing",
            |request: Request, next: Option<Next>, _options: Option<MiddlewareOptions>| {
                let start = Instant::now();
                let method = request.method().clone();
                let path = request.uri().path().to_string();

                async move {
                    let response = forward(request, next).await;
                    info!("{} {} ({} ms)", method, path, start.elapsed().as_millis());
                    response
                }
            },
        ))
        .expect("timing middleware is valid");

    let options = RequestOptions::new().method(Method::GET);
    match dispatcher.fetch("http://example.com/", Some(options)).await {
        Ok(response) => {
            println!("status: {}", response.status());
            match response.into_body().collect().await {
                Ok(collected) => println!("body: {} bytes", collected.to_bytes().len()),
                Err(e) => eprintln!("body error: {}", e),
            }
        }
        Err(e) => eprintln!("fetch error: {}", e),
    }
}
