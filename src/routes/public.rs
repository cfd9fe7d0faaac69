use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that are unauthenticated and accessible to any client. Job data
/// is globally readable, so no visibility filtering applies; the auth
/// endpoints are the entry to the identity flow.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /api/health
        // Liveness probe for monitoring and load balancer checks.
        .route("/health", get(handlers::health_check))
        // POST /api/auth/register
        // Account creation. Returns a session token plus the profile.
        .route("/auth/register", post(handlers::register))
        // POST /api/auth/login
        // Authentication against the stored password hash.
        .route("/auth/login", post(handlers::login))
        // GET /api/jobs?page&limit&search
        // Paginated, filterable job listing, newest first.
        .route("/jobs", get(handlers::get_jobs))
        // GET /api/jobs/search?keyword&page&limit
        // Alias of the listing endpoint with `keyword` mapped onto `search`.
        .route("/jobs/search", get(handlers::search_jobs))
        // GET /api/jobs/{id}
        // Single job detail.
        .route("/jobs/{id}", get(handlers::get_job))
}
