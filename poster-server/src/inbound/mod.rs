/*!
   Module `inbound` exposes the poster domain over HTTP.
*/

mod api;
mod handlers;

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, event};

use crate::domain::ports::PosterService;
use handlers::{get_style_handler, get_viewport_handler, list_themes_handler};

/// Configuration for the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

/// The global application state shared between all request handlers.
#[derive(Debug, Clone)]
struct AppState<PS: PosterService> {
    poster_service: Arc<PS>,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(
        poster_service: impl PosterService,
        config: HttpServerConfig<'_>,
    ) -> anyhow::Result<Self> {
        let trace_layer = TraceLayer::new_for_http();

        // Construct dependencies to inject into handlers.
        let state = AppState {
            poster_service: Arc::new(poster_service),
        };

        let router = Router::new()
            .nest("/api", api_routes())
            .layer(trace_layer)
            .with_state(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        event!(
            Level::INFO,
            "listening on {}",
            self.listener
                .local_addr()
                .context("failed to read the bound address")?
        );

        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;

        Ok(())
    }
}

fn api_routes<PS: PosterService>() -> Router<AppState<PS>> {
    Router::new()
        .route("/themes", get(list_themes_handler::<PS>))
        .route("/themes/{id}/style", get(get_style_handler::<PS>))
        .route("/viewport", get(get_viewport_handler::<PS>))
}
