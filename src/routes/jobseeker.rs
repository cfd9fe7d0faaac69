use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Jobseeker Router Module
///
/// Routes for the jobseeker role. The router is wrapped in the
/// authentication middleware layer; each handler then enforces the
/// jobseeker-only allowed-role set.
pub fn jobseeker_routes() -> Router<AppState> {
    Router::new()
        // POST /api/jobs/{id}/apply
        // Multipart application submission: full_name, email, phone,
        // cover_letter, resume (file). One application per (job, seeker).
        .route("/jobs/{id}/apply", post(handlers::apply_to_job))
        // GET /api/jobseeker/applications
        // The caller's applications, newest first, enriched with job
        // title/company at read time.
        .route(
            "/jobseeker/applications",
            get(handlers::get_my_applications),
        )
}
