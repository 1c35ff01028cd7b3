use axum::http::{header, HeaderValue};
use tower_http::cors::CorsLayer;

use crate::config::EffectiveConfig;

pub fn layer(config: &EffectiveConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    // Wildcard headers cannot be combined with credentials.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(config.cors_methods.clone())
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(config.credentials_allowed)
}
