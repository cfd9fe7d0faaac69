use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Admin Router Module
///
/// Routes restricted to the provisioned admin account, nested under
/// /api/admin. Admin reach covers jobs (read and delete, no ownership check)
/// but never direct application mutation.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/jobs
        // Every job in the system, newest first.
        .route("/jobs", get(handlers::get_all_jobs_admin))
        // DELETE /api/admin/jobs/{id}
        // Force-delete any job by id, cascading to its applications.
        .route("/jobs/{id}", delete(handlers::delete_job_admin))
}
