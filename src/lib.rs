pub mod configuration;
pub mod domain;
pub mod email_client;
mod error;
pub mod notification;
mod routes;
mod state;
pub mod telemetry;

use axum::{routing::IntoMakeService, Router, Server};
use configuration::Settings;
use email_client::EmailClient;
use hyper::server::conn::AddrIncoming;
use state::AppState;
use std::net::TcpListener;

/// The webhook notification service, bound to a port and ready to run.
pub struct App {
    port: u16,
    server: Server<AddrIncoming, IntoMakeService<Router>>,
}

impl App {
    /// Build the application from its configuration: construct the email
    /// client once, bind the listener, and assemble the router.
    pub fn build(configuration: Settings) -> anyhow::Result<Self> {
        let email_client = EmailClient::try_from(configuration.email_client())
            .map_err(|e| anyhow::anyhow!(e))?;
        let listener = TcpListener::bind(configuration.application().address())?;
        let port = listener.local_addr()?.port();
        tracing::info!("Server running at {}", listener.local_addr()?);

        let app_state = AppState::create(email_client);
        let router = Self::build_router(&app_state);
        let server = Server::from_tcp(listener)?.serve(router.into_make_service());

        Ok(Self { port, server })
    }

    /// The port the server is bound to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the server until it is stopped.
    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        self.server.await?;
        Ok(())
    }

    /// Build the router for the application.
    fn build_router(app_state: &AppState) -> Router {
        use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
        use tracing::Level;

        routes::build_router(app_state).layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
    }
}
