//! Envelope for requests that match no route.

use actix_web::{HttpRequest, HttpResponse};
use shared::ApiError;

use super::error::{ApiResult, HttpError};

/// Default service: `404` in the standard error envelope, naming the method
/// and path that missed.
///
/// # Errors
///
/// Always returns a `404 Not Found` [`HttpError`].
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(HttpError::from(ApiError::not_found(format!(
        "Cannot {} {}",
        req.method(),
        req.path()
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn unmatched_paths_get_a_json_envelope() {
        let app = actix_test::init_service(App::new().default_service(web::to(not_found))).await;

        let req = actix_test::TestRequest::delete().uri("/nowhere").to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({
                "statusCode": 404,
                "message": "Cannot DELETE /nowhere",
                "error": "Not Found",
            })
        );
    }
}
