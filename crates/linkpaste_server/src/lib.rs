//! HTTP server wiring for LinkPaste (API, display pages, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for paste endpoints and display pages.
pub mod handlers;
/// Share links and HTML rendering.
pub mod presentation;

pub use linkpaste_core::{
    config, db, models, AppError, Config, Database, PasteService, RateLimiter, DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use linkpaste_core::{DisabledLimiter, SlidingWindowLimiter};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Headroom over `max_paste_size` for the JSON envelope around content.
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

const DEFAULT_CSP: &str = "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'";
const EMBED_CSP: &str = "default-src 'self'; script-src 'none'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; frame-ancestors *; base-uri 'self'";

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub pastes: PasteService,
    pub limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Construct shared application state with the limiter described by
    /// `config`.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, db: Database) -> Self {
        let limiter = limiter_for_config(&config);
        Self::with_limiter(config, db, limiter)
    }

    /// Construct shared application state with a pre-built rate limiter.
    pub fn with_limiter(config: Config, db: Database, limiter: Arc<dyn RateLimiter>) -> Self {
        let pastes = PasteService::new(Arc::new(db), config.max_paste_size);
        Self::with_service(config, pastes, limiter)
    }

    /// Construct shared application state around an existing lifecycle
    /// service, for example one driven by a manual clock.
    pub fn with_service(config: Config, pastes: PasteService, limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            db: pastes.database().clone(),
            config: Arc::new(config),
            pastes,
            limiter,
        }
    }
}

/// Build the creation rate limiter described by `config`.
///
/// A zero request budget disables limiting entirely.
pub fn limiter_for_config(config: &Config) -> Arc<dyn RateLimiter> {
    if config.rate_limit_max_requests == 0 {
        tracing::warn!("RATE_LIMIT_MAX_REQUESTS=0; paste creation is not rate limited");
        return Arc::new(DisabledLimiter);
    }
    let window_secs = i64::try_from(config.rate_limit_window_secs).unwrap_or(i64::MAX);
    Arc::new(SlidingWindowLimiter::new(
        config.rate_limit_max_requests,
        chrono::Duration::seconds(window_secs),
    ))
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
///
/// # Returns
/// Configured `axum::Router`.
///
/// # Panics
/// Panics if static header values fail to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
    ];
    if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin([
                format!("http://localhost:{}", cors_port).parse().unwrap(),
                format!("http://127.0.0.1:{}", cors_port).parse().unwrap(),
            ])
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    }
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router<()> {
    let body_limit = state
        .config
        .max_paste_size
        .saturating_add(BODY_LIMIT_OVERHEAD);

    // Everything except the embed page refuses to be framed.
    let unframed = Router::new()
        .route(
            "/api/pastes",
            axum::routing::post(handlers::paste::create_paste),
        )
        .route(
            "/api/pastes/:slug",
            get(handlers::paste::get_paste)
                .patch(handlers::paste::update_paste)
                .delete(handlers::paste::delete_paste),
        )
        .route("/api/pastes/:slug/raw", get(handlers::paste::get_raw_paste))
        .route("/raw/:slug", get(handlers::paste::get_raw_paste))
        .route("/:slug", get(handlers::page::view_page))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(DEFAULT_CSP),
        ));

    let embeddable = Router::new()
        .route("/embed/:slug", get(handlers::page::embed_page))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(EMBED_CSP),
        ));

    Router::new()
        .merge(unframed)
        .merge(embeddable)
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(allow_public_access, cors_port))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// Peer socket addresses are exposed to handlers for client identification.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
}
