use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::create_security_headers_layer;
use crate::handlers::{admin, health_check, public};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let production = state.secure_cookies;

    Router::new()
        .route("/", get(public::home))
        .route(
            "/achat",
            get(public::purchase_page).post(public::purchase_submit),
        )
        .route(
            "/verification",
            get(public::verification_page).post(public::verification_submit),
        )
        .route("/ticket/:code", get(public::ticket_page))
        .route(
            "/admin/connexion_admin",
            get(admin::login_page).post(admin::login_submit),
        )
        .route("/admin/dashboard_admin", get(admin::dashboard))
        .route("/admin/repertoire", get(admin::directory))
        .route(
            "/admin/verification",
            get(admin::verification_page).post(admin::verification_submit),
        )
        .route("/logout", get(admin::logout))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(create_security_headers_layer(production))
        .layer(TraceLayer::new_for_http())
}
