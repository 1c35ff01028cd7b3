use axum::{routing::get, Json, Router};

use crate::middleware::auth::AuthUser;
use crate::models::auth::MeResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Subject of the bearer token", body = MeResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "Auth"
)]
pub(crate) async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        subject: auth.subject,
    })
}
