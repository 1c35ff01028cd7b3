pub mod auth;
pub mod health;

use axum::Router;
use tower_http::services::ServeDir;

use crate::middleware::auth::require_bearer;
use crate::AppState;

pub fn api_router(state: AppState) -> Router {
    // Payment documents are only served to bearer holders.
    let uploads = Router::new()
        .nest_service("/uploads/paiement", ServeDir::new(&state.upload_dir))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .merge(health::router())
        .nest("/api/auth", auth::router())
        .merge(uploads)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::bootstrap::{ensure_upload_dir, upload_dir};
    use crate::config::resolve;
    use crate::middleware::auth::create_token;

    fn state(root: &std::path::Path) -> AppState {
        let env: HashMap<String, String> = [
            ("BASE_URL".to_string(), "https://pay.example.com".to_string()),
            ("JWT_SECRET".to_string(), "router-secret".to_string()),
        ]
        .into_iter()
        .collect();
        ensure_upload_dir(root).unwrap();
        AppState {
            config: Arc::new(resolve(&env)),
            upload_dir: upload_dir(root),
        }
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_base_url() {
        let tmp = tempfile::tempdir().unwrap();
        let app = api_router(state(tmp.path()));

        let res = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["base_url"], "https://pay.example.com");
    }

    #[tokio::test]
    async fn test_me_requires_bearer() {
        let tmp = tempfile::tempdir().unwrap();
        let app = api_router(state(tmp.path()));

        let res = app
            .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_with_valid_token() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state(tmp.path());
        let token = create_token("invoice-7", &state.config).unwrap();
        let app = api_router(state);

        let res = app
            .oneshot(
                Request::get("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["subject"], "invoice-7");
    }

    #[tokio::test]
    async fn test_receipt_requires_bearer() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state(tmp.path());
        std::fs::write(state.upload_dir.join("receipt.txt"), "paid").unwrap();
        let app = api_router(state);

        let res = app
            .oneshot(
                Request::get("/uploads/paiement/receipt.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_receipt_rejects_foreign_token() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state(tmp.path());
        std::fs::write(state.upload_dir.join("receipt.txt"), "paid").unwrap();
        let foreign = resolve(&HashMap::<String, String>::new());
        let token = create_token("invoice-7", &foreign).unwrap();
        let app = api_router(state);

        let res = app
            .oneshot(
                Request::get("/uploads/paiement/receipt.txt")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_serves_receipt_with_bearer() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state(tmp.path());
        std::fs::write(state.upload_dir.join("receipt.txt"), "paid").unwrap();
        let token = create_token("invoice-7", &state.config).unwrap();
        let app = api_router(state);

        let res = app
            .oneshot(
                Request::get("/uploads/paiement/receipt.txt")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"paid");
    }
}
