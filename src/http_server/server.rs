//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::admin_routes::{admin_routes, AdminState};
use super::auth_routes::{auth_routes, AuthState};
use super::config::HttpServerConfig;
use super::contact_routes::{contact_routes, ContactState};
use super::health_routes::health_routes;
use crate::auth::AdminGate;
use crate::contact::EmailSender;
use crate::crud::RequestRouter;

/// Everything the handlers share
#[derive(Clone)]
pub struct AppServices {
    pub requests: RequestRouter,
    pub gate: AdminGate,
    pub mailer: Arc<dyn EmailSender>,
}

/// HTTP server for the portfolio admin API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, services: AppServices) -> Self {
        let router = Self::build_router(&config, services);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &HttpServerConfig, services: AppServices) -> Router {
        let admin_state = Arc::new(AdminState::new(services.requests, services.gate.clone()));
        let auth_state = Arc::new(AuthState::new(services.gate));
        let contact_state = Arc::new(ContactState::new(services.mailer));

        let allow_origin = match config.origin_allow_list() {
            Some(origins) => AllowOrigin::list(origins),
            None => AllowOrigin::any(),
        };
        let cors = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(health_routes())
            .nest("/api/auth", auth_routes(auth_state))
            .nest("/api/admin", admin_routes(admin_state))
            .merge(contact_routes(contact_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process stops
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.listen_addr()?;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "portfolio admin API listening");

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::MockEmailSender;
    use crate::crud::CrudService;
    use crate::store::StoreGateway;

    fn services() -> AppServices {
        AppServices {
            requests: RequestRouter::new(CrudService::new(StoreGateway::in_memory())),
            gate: AdminGate::new(Some("pw".to_string())),
            mailer: Arc::new(MockEmailSender::new()),
        }
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::bind("0.0.0.0", 4000), services());
        assert_eq!(server.socket_addr(), "0.0.0.0:4000");
    }

    #[test]
    fn test_router_builds_with_permissive_cors() {
        let config = HttpServerConfig {
            cors_origins: vec![],
            ..Default::default()
        };
        let _router = HttpServer::new(config, services()).router();
    }
}
