//! Resolver and stack working together, the way the kernel drives them.

use bytes::Bytes;
use http::{HeaderValue, Request as HttpRequest, StatusCode};
use http_body_util::{BodyExt, Full};
use jelly_core::{
    handler_fn, keys, Container, FnMiddleware, Handler, Middleware, Next, Request, RequestExt,
    Response, ResponseExt, ServiceLocator,
};
use jelly_middleware::{
    ExceptionTrapper, ExecutionStack, MiddlewareChainResolver, SecurityHeaders, ServerCloak,
};
use std::sync::{Arc, Mutex};

fn make_request(path: &str) -> Request {
    HttpRequest::builder()
        .uri(path)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Appends its name to `x-trail` on the way in and `x-seen` on the way out.
fn trail(name: &'static str) -> Arc<dyn Middleware> {
    Arc::new(FnMiddleware::new(name, move |mut request: Request, next: Next| async move {
        request
            .headers_mut()
            .append("x-trail", HeaderValue::from_static(name));
        let mut response = next.handle(request).await?;
        response
            .headers_mut()
            .append("x-seen", HeaderValue::from_static(name));
        Ok(response)
    }))
}

fn stack_for(locator: &Container, resolver: &MiddlewareChainResolver, handler_id: &str) -> ExecutionStack {
    let terminal = locator.handler(handler_id).unwrap();
    let layers: Vec<Arc<dyn Middleware>> = resolver
        .resolve(handler_id)
        .iter()
        .rev()
        .map(|id| locator.middleware(id).unwrap())
        .collect();
    ExecutionStack::compose(terminal, layers)
}

fn header_list(response: &Response, name: &str) -> Vec<String> {
    response
        .headers()
        .get_all(name)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_onion_order_end_to_end() {
    let mut container = Container::new();
    container
        .register_handler("dashboard", handler_fn(|request: Request| async move {
            let trail: Vec<_> = request
                .headers()
                .get_all("x-trail")
                .iter()
                .map(|v| v.to_str().unwrap_or_default().to_string())
                .collect();
            Ok(Response::text(StatusCode::OK, trail.join(",")))
        }))
        .register_middleware("basic-auth", trail("basic-auth"))
        .register_middleware("ip-logger", trail("ip-logger"))
        .register_middleware("global", trail("global"));

    let mut resolver = MiddlewareChainResolver::new();
    resolver.push_handler("dashboard", ["monitored"]);
    resolver.push_local_middleware("basic-auth", "dashboard");
    resolver.push_local_middleware("ip-logger", "monitored");
    resolver.push_global_middleware("global");

    let stack = stack_for(&container, &resolver, "dashboard");
    assert_eq!(stack.layer_names(), vec!["global", "ip-logger", "basic-auth"]);

    let response = stack.handle(make_request("/dashboard")).await.unwrap();
    assert_eq!(header_list(&response, "x-seen"), vec!["basic-auth", "ip-logger", "global"]);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"global,ip-logger,basic-auth");
}

#[tokio::test]
async fn test_inner_post_processing_visible_to_outer() {
    let observed = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&observed);

    let outer = FnMiddleware::new("a", move |request, next: Next| {
        let seen = Arc::clone(&seen);
        async move {
            let response = next.handle(request).await?;
            *seen.lock().unwrap() = response
                .headers()
                .get("x-from-b")
                .map(|v| v.to_str().unwrap_or_default().to_string());
            Ok(response)
        }
    });
    let inner = FnMiddleware::new("b", |request, next: Next| async move {
        let mut response = next.handle(request).await?;
        response.headers_mut().insert("x-from-b", "done".parse()?);
        Ok(response)
    });
    let terminal = Arc::new(handler_fn(|_| async { Ok(Response::empty(StatusCode::OK)) }));
    let outer: Arc<dyn Middleware> = Arc::new(outer);
    let inner: Arc<dyn Middleware> = Arc::new(inner);

    let stack = ExecutionStack::compose(terminal, vec![outer, inner]);
    stack.handle(make_request("/")).await.unwrap();

    assert_eq!(observed.lock().unwrap().as_deref(), Some("done"));
}

#[tokio::test]
async fn test_trapper_inside_header_middleware() {
    let exception_handler = Arc::new(handler_fn(|request: Request| async move {
        let message = request
            .attributes()
            .exception(keys::EXCEPTION)
            .map(ToString::to_string)
            .unwrap_or_default();
        Ok(Response::text(StatusCode::INTERNAL_SERVER_ERROR, message))
    }));
    let broken = Arc::new(handler_fn(|_| async { Err(anyhow::anyhow!("kaboom")) }));

    let layers: [Arc<dyn Middleware>; 3] = [
        Arc::new(SecurityHeaders::default()),
        Arc::new(ServerCloak::new("jelly").unwrap()),
        Arc::new(ExceptionTrapper::new(exception_handler)),
    ];
    let stack = ExecutionStack::compose(broken, layers.into());

    let response = stack.handle(make_request("/broken")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers().get("server").unwrap(), "jelly");
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"kaboom");
}
