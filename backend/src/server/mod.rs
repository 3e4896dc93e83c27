//! Server construction and middleware wiring.

mod config;

pub use config::{
    DEFAULT_CORS_ORIGIN, DEFAULT_HOST, DEFAULT_PORT, ServerConfig, ServerConfigError,
    ServerSettings,
};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use shared::ApiEndpoints;
use tracing::info;

use crate::domain::AppService;
use crate::inbound::http::fallback::not_found;
use crate::inbound::http::health::{HealthState, health};
use crate::inbound::http::root::hello;
use crate::middleware::{Cors, Trace};

/// Shared state handed to every worker's application.
#[derive(Clone)]
pub struct AppDependencies {
    /// Liveness flag read by the health probe.
    pub health_state: web::Data<HealthState>,
    /// Service behind the root greeting.
    pub app_service: web::Data<AppService>,
    /// Cross-origin allow-list.
    pub cors: Cors,
}

impl AppDependencies {
    /// Fresh dependencies for `config`.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            health_state: web::Data::new(HealthState::new()),
            app_service: web::Data::new(AppService),
            cors: Cors::new(config.cors_origins().iter().cloned()),
        }
    }
}

/// Build the application with all routes and middleware.
///
/// The trace middleware is outermost so preflight answers and CORS headers
/// are logged and tagged too.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        app_service,
        cors,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(app_service)
        .wrap(cors)
        .wrap(Trace)
        .service(web::resource(ApiEndpoints::ROOT).route(web::get().to(hello)))
        .service(web::resource(ApiEndpoints::HEALTH).route(web::get().to(health)))
        .default_service(web::to(not_found))
}

/// Construct an Actix HTTP server from validated configuration.
///
/// # Parameters
/// - `config`: bind address and CORS allow-list.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let deps = AppDependencies::new(&config);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "backend listening");
    Ok(server)
}
