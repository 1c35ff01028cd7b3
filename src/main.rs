mod bootstrap;
mod config;
mod cors;
mod error;
mod middleware;
mod models;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::EffectiveConfig;
use crate::error::StartupError;

#[derive(Clone)]
pub struct AppState {
    /// Resolved once at startup, never mutated.
    pub config: Arc<EffectiveConfig>,
    /// Bootstrapped payment upload directory.
    pub upload_dir: PathBuf,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::auth::me,
    ),
    components(schemas(
        models::health::HealthResponse,
        models::auth::MeResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Bearer token verification")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                ),
            ),
        );
    }
}

#[tokio::main]
async fn main() {
    let config = EffectiveConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("paiement_server=debug,tower_http=debug")),
        )
        .init();

    if let Err(e) = run(config).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: EffectiveConfig) -> Result<(), StartupError> {
    config.warn_if_insecure();

    let root = bootstrap::default_root();
    bootstrap::ensure_upload_dir(root).map_err(StartupError::Bootstrap)?;

    let port = config
        .port
        .number()
        .ok_or_else(|| StartupError::InvalidPort(config.port.to_string()))?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let cors = cors::layer(&config);
    let base_url = config.base_url.clone();

    let state = AppState {
        config: Arc::new(config),
        upload_dir: bootstrap::upload_dir(root),
    };

    let app = routes::api_router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Advertised at {}", base_url);
    tracing::info!("Swagger UI at {}/docs/", base_url);

    axum::serve(listener, app)
        .await
        .map_err(StartupError::Serve)
}
