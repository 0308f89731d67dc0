pub mod admin;
pub mod auth;
pub mod store;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route(
            "/api/v1/auth/request-password-reset",
            post(auth::request_password_reset),
        )
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        .route("/api/v1/protected", get(auth::protected))
        // Admin
        .route("/api/v1/admin/revenue", get(admin::revenue))
        // Storefront
        .route("/api/v1/store/social-proof", get(store::social_proof))
        .route(
            "/api/v1/store/products/{id}/preview.svg",
            get(store::product_preview),
        )
}
