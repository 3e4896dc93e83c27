//! Root greeting endpoint.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

use crate::domain::AppService;

/// `GET /`: plain-text greeting from [`AppService::hello`].
pub async fn hello(service: web::Data<AppService>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(service.hello())
}
