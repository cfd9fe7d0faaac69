use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Employer Router Module
///
/// Routes for the employer role, nested under /api/employer. All mutations
/// are ownership-scoped: an employer can only touch jobs it created, and
/// "missing" and "not owned" are deliberately indistinguishable (404).
pub fn employer_routes() -> Router<AppState> {
    Router::new()
        // POST /api/employer/jobs — create a posting owned by the caller.
        // GET  /api/employer/jobs — list the caller's postings, newest first.
        .route(
            "/jobs",
            post(handlers::create_job).get(handlers::get_my_jobs),
        )
        // PUT    /api/employer/jobs/{id} — owner-only partial update.
        // DELETE /api/employer/jobs/{id} — owner-only delete, cascading to
        // all applications for the job.
        .route(
            "/jobs/{id}",
            put(handlers::update_job).delete(handlers::delete_job),
        )
        // GET /api/employer/jobs/{id}/applications
        // Applications for one owned job, newest first.
        .route(
            "/jobs/{id}/applications",
            get(handlers::get_job_applications),
        )
        // PUT /api/employer/applications/{id}/status
        // Sets the four-value review status; owner of the referenced job only.
        .route(
            "/applications/{id}/status",
            put(handlers::update_application_status),
        )
}
