pub mod auth;
mod cases;
mod error;
mod leads;
pub mod rate_limit;
mod stats;
mod validation;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public, login is brute-force limited)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/validate", get(auth::validate))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_auth,
        ));

    // Auth routes that require an active session
    let auth_session_routes = Router::new()
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    // Public routes: the gallery and the wizard submission
    let public_routes = Router::new()
        .route("/cases", get(cases::list_cases))
        .route("/cases/:id", get(cases::get_case))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_api,
        ));

    let wizard_routes = Router::new()
        .route("/leads", post(leads::create_lead))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_lead,
        ));

    // Back-office routes, rejected before validation or storage access
    // when the session is missing or expired
    let admin_routes = Router::new()
        // Cases
        .route("/cases", post(cases::create_case))
        .route("/cases/:id", put(cases::update_case))
        .route("/cases/:id", delete(cases::delete_case))
        .route("/cases/:id/toggle-status", post(cases::toggle_status))
        .route("/cases/:id/toggle-featured", post(cases::toggle_featured))
        // Leads
        .route("/leads", get(leads::list_leads))
        .route("/leads/:id", get(leads::get_lead))
        .route("/leads/:id", put(leads::update_lead))
        .route("/leads/:id", delete(leads::delete_lead))
        // Dashboard
        .route("/stats", get(stats::get_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes.merge(auth_session_routes))
        .nest(
            "/api",
            public_routes.merge(wizard_routes).merge(admin_routes),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
