//! Cross-origin middleware for the browser frontend.
//!
//! Only origins on the configured allow-list are echoed back, always with
//! credentials allowed. Preflight requests are answered here with `204` and
//! never reach the routes.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::HttpResponse;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderMap, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

/// Methods advertised to preflight requests.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
/// Request headers advertised to preflight requests.
pub const ALLOWED_HEADERS: &str = "content-type, authorization";
/// Seconds a browser may cache a preflight answer.
pub const MAX_AGE_SECS: &str = "86400";

/// Origin allow-list middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::Cors;
///
/// let app = App::new().wrap(Cors::new(["http://localhost:3000"]));
/// ```
#[derive(Debug, Clone)]
pub struct Cors {
    allowed_origins: Arc<[String]>,
}

impl Cors {
    /// Allow exactly the listed origins.
    #[must_use]
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `origin` is on the allow-list.
    #[must_use]
    pub fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware {
            service,
            cors: self.clone(),
        }))
    }
}

/// Service wrapper produced by [`Cors`].
pub struct CorsMiddleware<S> {
    service: S,
    cors: Cors,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let varies = req.headers().contains_key(header::ORIGIN);
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let allowed = origin.filter(|candidate| self.cors.allows(candidate));

        if is_preflight(&req) {
            let mut res = HttpResponse::NoContent().finish();
            match &allowed {
                Some(origin) => {
                    let headers = res.headers_mut();
                    insert_origin(headers, origin);
                    headers.insert(
                        header::ACCESS_CONTROL_ALLOW_METHODS,
                        HeaderValue::from_static(ALLOWED_METHODS),
                    );
                    headers.insert(
                        header::ACCESS_CONTROL_ALLOW_HEADERS,
                        HeaderValue::from_static(ALLOWED_HEADERS),
                    );
                    headers.insert(
                        header::ACCESS_CONTROL_MAX_AGE,
                        HeaderValue::from_static(MAX_AGE_SECS),
                    );
                }
                None => debug!(path = req.path(), "preflight from disallowed origin"),
            }
            if varies {
                vary_on_origin(res.headers_mut());
            }
            return Box::pin(ready(Ok(req.into_response(res))));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(origin) = allowed {
                insert_origin(res.headers_mut(), &origin);
            }
            if varies {
                vary_on_origin(res.headers_mut());
            }
            Ok(res.map_into_boxed_body())
        })
    }
}

fn is_preflight(req: &ServiceRequest) -> bool {
    *req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

fn insert_origin(headers: &mut HeaderMap, origin: &str) {
    let Ok(value) = HeaderValue::from_str(origin) else {
        return;
    };
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

/// Responses to requests carrying `Origin` differ per origin, allowed or not.
fn vary_on_origin(headers: &mut HeaderMap) {
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;

    const FRONTEND: &str = "http://localhost:3000";

    async fn call(req: actix_test::TestRequest) -> ServiceResponse<BoxBody> {
        let app = actix_test::init_service(
            App::new()
                .wrap(Cors::new([FRONTEND]))
                .route("/", web::get().to(|| async { HttpResponse::Ok().body("hi") })),
        )
        .await;
        actix_test::call_service(&app, req.to_request()).await
    }

    fn header_text(res: &ServiceResponse<BoxBody>, name: header::HeaderName) -> Option<String> {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    #[rstest]
    #[actix_web::test]
    async fn allowed_origin_is_echoed_with_credentials() {
        let res = call(actix_test::TestRequest::get().uri("/").insert_header(("origin", FRONTEND))).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            header_text(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
            Some(FRONTEND)
        );
        assert_eq!(
            header_text(&res, header::ACCESS_CONTROL_ALLOW_CREDENTIALS).as_deref(),
            Some("true")
        );
    }

    #[rstest]
    #[case(Some("http://evil.example"))]
    #[case(None)]
    #[actix_web::test]
    async fn other_origins_get_no_cors_headers(#[case] origin: Option<&'static str>) {
        let mut req = actix_test::TestRequest::get().uri("/");
        if let Some(value) = origin {
            req = req.insert_header(("origin", value));
        }

        let res = call(req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(header_text(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn preflight_is_answered_without_routing() {
        let res = call(
            actix_test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri("/anything")
                .insert_header(("origin", FRONTEND))
                .insert_header(("access-control-request-method", "POST")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            header_text(&res, header::ACCESS_CONTROL_ALLOW_METHODS).as_deref(),
            Some(ALLOWED_METHODS)
        );
        assert_eq!(
            header_text(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
            Some(FRONTEND)
        );
    }

    #[rstest]
    #[case(Some(FRONTEND), true)]
    #[case(Some("http://evil.example"), true)]
    #[case(None, false)]
    #[actix_web::test]
    async fn responses_vary_on_any_supplied_origin(
        #[case] origin: Option<&'static str>,
        #[case] varies: bool,
    ) {
        let mut req = actix_test::TestRequest::get().uri("/");
        if let Some(value) = origin {
            req = req.insert_header(("origin", value));
        }

        let res = call(req).await;

        assert_eq!(
            header_text(&res, header::VARY).as_deref() == Some("Origin"),
            varies
        );
    }

    #[rstest]
    fn allow_list_matches_exact_origins() {
        let cors = Cors::new(["http://a.test", "http://b.test"]);
        assert!(cors.allows("http://b.test"));
        assert!(!cors.allows("http://b.test:8080"));
    }
}
