//! End-to-end dispatch through the kernel.

use bytes::Bytes;
use http::header::{ALLOW, CONTENT_TYPE};
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use jelly::core::handlers::{EmptyResponse, MethodNotAllowed};
use jelly::core::RoutingError;
use jelly::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn request(method: Method, path: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn body(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Answers with a summary of the routing attributes it was given.
fn describe_attributes() -> impl Handler {
    handler_fn(|request: Request| async move {
        let attributes = request.attributes();
        let args = attributes
            .params(keys::ARGS)
            .map(|args| {
                args.iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            })
            .unwrap_or_default();
        let chain = attributes
            .list(keys::MIDDLEWARE_CHAIN)
            .map(|ids| ids.join(","))
            .unwrap_or_default();
        Ok(Response::text(
            StatusCode::OK,
            format!(
                "handler={} args={} chain={}",
                attributes.text(keys::HANDLER).unwrap_or("-"),
                args,
                chain
            ),
        ))
    })
}

fn recording(name: &'static str, log: &Log) -> impl Middleware {
    let log = Arc::clone(log);
    FnMiddleware::new(name, move |request, next: Next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(format!("{name}:in"));
            let response = next.handle(request).await;
            log.lock().unwrap().push(format!("{name}:out"));
            response
        }
    })
}

fn base_container() -> Container {
    let mut container = Container::new();
    container
        .register_handler(services::NOT_FOUND_HANDLER, describe_attributes())
        .register_handler(services::BAD_METHOD_HANDLER, MethodNotAllowed)
        .register_handler("hello_handler", describe_attributes())
        .register_handler("greet_handler", EmptyResponse(StatusCode::CREATED));
    container
}

fn hello_app(container: Container) -> Jelly {
    JellyBuilder::new(Arc::new(container))
        .unwrap()
        .get("/hello/{name}", "hello_handler", &[])
        .unwrap()
        .post("/hello/{name}", "greet_handler", &[])
        .unwrap()
        .build()
}

#[tokio::test]
async fn test_found_sets_handler_and_args() {
    let jelly = hello_app(base_container());

    let response = jelly.dispatch(request(Method::GET, "/hello/tron")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await, "handler=hello_handler args=name=tron chain=");

    let response = jelly.dispatch(request(Method::POST, "/hello/tron")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_not_found_routes_to_reserved_handler() {
    let mut container = base_container();
    container.register_handler(
        services::NOT_FOUND_HANDLER,
        handler_fn(|request: Request| async move {
            let attributes = request.attributes();
            assert_eq!(
                attributes.routing_error(keys::ERROR_TYPE),
                Some(RoutingError::NotFound)
            );
            assert!(attributes.params(keys::ARGS).is_none());
            let handler = attributes.text(keys::HANDLER).unwrap_or_default().to_string();
            Ok(Response::text(StatusCode::NOT_FOUND, handler))
        }),
    );
    let jelly = hello_app(container);

    let response = jelly.dispatch(request(Method::GET, "/bye/tron")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(response).await, services::NOT_FOUND_HANDLER);
}

#[tokio::test]
async fn test_method_not_allowed_reports_allow_header() {
    let jelly = hello_app(base_container());

    let response = jelly
        .dispatch(request(Method::DELETE, "/hello/tron"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, POST");
}

#[tokio::test]
async fn test_allow_header_lists_every_matching_route() {
    let jelly = JellyBuilder::new(Arc::new(base_container()))
        .unwrap()
        .get("/users/me", "hello_handler", &[])
        .unwrap()
        .delete("/users/{id}", "greet_handler", &[])
        .unwrap()
        .build();

    let response = jelly.dispatch(request(Method::DELETE, "/users/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = jelly.dispatch(request(Method::PUT, "/users/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, DELETE");
}

#[tokio::test]
async fn test_empty_segments_are_ignored() {
    let jelly = hello_app(base_container());

    for path in ["/hello/tron/", "/hello//tron"] {
        let response = jelly.dispatch(request(Method::GET, path)).await.unwrap();
        assert_eq!(
            body(response).await,
            "handler=hello_handler args=name=tron chain=",
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_method_not_allowed_attributes() {
    let mut container = base_container();
    container.register_handler(
        services::BAD_METHOD_HANDLER,
        handler_fn(|request: Request| async move {
            let attributes = request.attributes();
            assert_eq!(
                attributes.routing_error(keys::ERROR_TYPE),
                Some(RoutingError::MethodNotAllowed)
            );
            let allowed = attributes.list(keys::ALLOWED_METHODS).unwrap_or_default().join(",");
            Ok(Response::text(StatusCode::METHOD_NOT_ALLOWED, allowed))
        }),
    );
    let jelly = hello_app(container);

    let response = jelly.dispatch(request(Method::PUT, "/hello/tron")).await.unwrap();
    assert_eq!(body(response).await, "GET,POST");
}

#[tokio::test]
async fn test_head_served_by_get_route() {
    let jelly = hello_app(base_container());
    let response = jelly.dispatch(request(Method::HEAD, "/hello/tron")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrap_and_tag_ordering() {
    let log: Log = Arc::default();
    let mut container = base_container();
    container
        .register_middleware("global_a", recording("global_a", &log))
        .register_middleware("global_b", recording("global_b", &log))
        .register_middleware("auth", recording("auth", &log))
        .register_middleware("audit", recording("audit", &log))
        .register_middleware("only_hello", recording("only_hello", &log));

    let jelly = JellyBuilder::new(Arc::new(container))
        .unwrap()
        .wrap("global_a")
        .unwrap()
        .get("/hello/{name}", "hello_handler", &["protected", "audited"])
        .unwrap()
        .tag("auth", &["protected"])
        .unwrap()
        .tag("audit", &["audited"])
        .unwrap()
        .tag("only_hello", &["hello_handler"])
        .unwrap()
        .wrap("global_b")
        .unwrap()
        .build();

    let response = jelly.dispatch(request(Method::GET, "/hello/tron")).await.unwrap();
    assert_eq!(
        body(response).await,
        "handler=hello_handler args=name=tron chain=global_b,global_a,audit,auth,only_hello"
    );
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "global_b:in",
            "global_a:in",
            "audit:in",
            "auth:in",
            "only_hello:in",
            "only_hello:out",
            "auth:out",
            "audit:out",
            "global_a:out",
            "global_b:out",
        ]
    );
}

#[tokio::test]
async fn test_global_middleware_wraps_reserved_handlers() {
    let log: Log = Arc::default();
    let mut container = base_container();
    container.register_middleware("outer", recording("outer", &log));

    let jelly = JellyBuilder::new(Arc::new(container))
        .unwrap()
        .wrap("outer")
        .unwrap()
        .build();

    let response = jelly.dispatch(request(Method::GET, "/nowhere")).await.unwrap();
    assert_eq!(
        body(response).await,
        format!("handler={} args= chain=outer", services::NOT_FOUND_HANDLER)
    );
    assert_eq!(*log.lock().unwrap(), vec!["outer:in", "outer:out"]);
}

#[tokio::test]
async fn test_tripwire_short_circuits() {
    let mut container = base_container();
    container.register_middleware(
        "tripwire",
        FnMiddleware::new("tripwire", |_request, _next: Next| async {
            Ok(Response::text(StatusCode::FORBIDDEN, "tripped"))
        }),
    );

    let jelly = JellyBuilder::new(Arc::new(container))
        .unwrap()
        .get("/hello/{name}", "hello_handler", &["guarded"])
        .unwrap()
        .tag("tripwire", &["guarded"])
        .unwrap()
        .build();

    let response = jelly.dispatch(request(Method::GET, "/hello/tron")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(body(response).await, "tripped");
}

#[tokio::test]
async fn test_middleware_can_add_attributes() {
    let mut container = base_container();
    container
        .register_middleware(
            "stamp",
            FnMiddleware::new("stamp", |request: Request, next: Next| async move {
                next.handle(request.with_attribute("app.user", "tron")).await
            }),
        )
        .register_handler(
            "whoami",
            handler_fn(|request: Request| async move {
                let user = request.attributes().text("app.user").unwrap_or("anonymous").to_string();
                Ok(Response::text(StatusCode::OK, user))
            }),
        );

    let jelly = JellyBuilder::new(Arc::new(container))
        .unwrap()
        .get("/whoami", "whoami", &[])
        .unwrap()
        .tag("stamp", &["whoami"])
        .unwrap()
        .build();

    let response = jelly.dispatch(request(Method::GET, "/whoami")).await.unwrap();
    assert_eq!(body(response).await, "tron");
}

#[tokio::test]
async fn test_untrapped_fault_is_returned() {
    let mut container = base_container();
    container.register_handler(
        "broken",
        handler_fn(|_| async { Err(anyhow::anyhow!("boom")) }),
    );

    let jelly = JellyBuilder::new(Arc::new(container))
        .unwrap()
        .get("/broken", "broken", &[])
        .unwrap()
        .build();

    let err = jelly.dispatch(request(Method::GET, "/broken")).await.unwrap_err();
    assert!(!err.is_setup());
    assert_eq!(err.to_string(), "boom");
}

#[tokio::test]
async fn test_exception_trapper_renders_fault() {
    let mut container = base_container();
    container
        .register_handler(
            "broken",
            handler_fn(|_| async { Err(anyhow::anyhow!("boom")) }),
        )
        .register_handler(
            services::EXCEPTION_HANDLER,
            handler_fn(|request: Request| async move {
                let attributes = request.attributes();
                let message = attributes
                    .exception(keys::EXCEPTION)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                let handler = attributes.text(keys::HANDLER).unwrap_or_default().to_string();
                Ok(Response::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{handler}: {message}"),
                ))
            }),
        );
    let trapper = ExceptionTrapper::from_locator(&container).unwrap();
    container.register_middleware("trapper", trapper);

    let jelly = JellyBuilder::new(Arc::new(container))
        .unwrap()
        .wrap("trapper")
        .unwrap()
        .get("/broken", "broken", &[])
        .unwrap()
        .build();

    let response = jelly.dispatch(request(Method::GET, "/broken")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(response).await, "broken: boom");
}

#[tokio::test]
async fn test_service_lost_after_setup_is_a_setup_error() {
    struct Fickle {
        inner: Container,
        hide_hello: AtomicBool,
    }

    impl Fickle {
        fn hidden(&self, id: &str) -> bool {
            id == "hello_handler" && self.hide_hello.load(Ordering::SeqCst)
        }
    }

    impl ServiceLocator for Fickle {
        fn has(&self, id: &str) -> bool {
            !self.hidden(id) && self.inner.has(id)
        }

        fn get(&self, id: &str) -> Result<jelly::core::Service, SetupError> {
            if self.hidden(id) {
                return Err(SetupError::missing(id));
            }
            self.inner.get(id)
        }
    }

    let locator = Arc::new(Fickle {
        inner: base_container(),
        hide_hello: AtomicBool::new(false),
    });
    let jelly = JellyBuilder::new(locator.clone())
        .unwrap()
        .get("/hello/{name}", "hello_handler", &[])
        .unwrap()
        .build();

    locator.hide_hello.store(true, Ordering::SeqCst);

    let err = jelly.dispatch(request(Method::GET, "/hello/tron")).await.unwrap_err();
    assert!(err.is_setup());
    assert!(matches!(
        err,
        DispatchError::Setup(SetupError::MissingService { ref id }) if id == "hello_handler"
    ));
}
