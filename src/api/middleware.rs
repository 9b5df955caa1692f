use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Span;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

/// Permissive CORS on every response. `OPTIONS` is answered here with an
/// empty 200 and never reaches the inner service.
pub async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Span for the access log: method, URI and caller address.
pub fn request_span(request: &Request<Body>) -> Span {
    let caller = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        caller = %caller,
    )
}

/// Emitted once the handler has produced its response.
pub fn log_response(response: &Response, latency: Duration, _span: &Span) {
    tracing::info!(
        status = response.status().as_u16(),
        latency = ?latency,
        "request completed"
    );
}

/// Guards the static file service: hidden paths (`/.env`, `/.git/...`) are
/// 404, and the index document is always served as UTF-8 HTML.
pub async fn static_files(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if is_hidden(&path) {
        tracing::warn!("refusing hidden static path {}", path);
        return StatusCode::NOT_FOUND.into_response();
    }

    let mut response = next.run(request).await;

    if (path == "/" || path == "/index.html") && response.status().is_success() {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
    }

    response
}

/// Checks the path the way the file service will see it: percent-decoded
/// first, so `/%2eenv` is caught as `/.env`. Undecodable paths count as hidden.
fn is_hidden(path: &str) -> bool {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded
            .split(['/', '\\'])
            .any(|segment| segment.starts_with('.')),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::get};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::util::ServiceExt;

    fn counting_router(hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/counted",
                get(move || {
                    let hits = Arc::clone(&hits);
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "handled"
                    }
                }),
            )
            .layer(axum::middleware::from_fn(cors))
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn assert_cors_headers(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
    }

    #[tokio::test]
    async fn preflight_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = counting_router(Arc::clone(&hits))
            .oneshot(request(Method::OPTIONS, "/counted"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn preflight_on_unrouted_path_is_still_200() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = counting_router(Arc::clone(&hits))
            .oneshot(request(Method::OPTIONS, "/nowhere"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
    }

    #[tokio::test]
    async fn regular_requests_reach_the_handler_with_cors_headers() {
        let hits = Arc::new(AtomicUsize::new(0));
        let response = counting_router(Arc::clone(&hits))
            .oneshot(request(Method::GET, "/counted"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hidden_paths_are_not_served() {
        let app = Router::new()
            .route("/.env", get(|| async { "EXCHANGE_API_KEY=secret" }))
            .layer(axum::middleware::from_fn(static_files));

        let response = app.oneshot(request(Method::GET, "/.env")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn hidden_segments_are_detected_after_decoding() {
        assert!(is_hidden("/.env"));
        assert!(is_hidden("/%2eenv"));
        assert!(is_hidden("/%2Egit/config"));
        assert!(is_hidden("/js%2F.secret"));
        assert!(is_hidden("/%ff%fe"));
        assert!(!is_hidden("/"));
        assert!(!is_hidden("/js/script.js"));
        assert!(!is_hidden("/my%20file.txt"));
    }
}
