use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod storage;

// Module for routing segregation (Public, Jobseeker, Employer, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, employer, jobseeker, public};

// --- Public Re-exports ---

// Core state types used by the application entry point and the test harness.
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{LocalStorageService, MockStorageService, StorageState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation for the application from every
/// handler decorated with `#[utoipa::path]`. The resulting JSON is served at
/// `/api-docs/openapi.json` and rendered at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check, handlers::register, handlers::login,
        handlers::get_jobs, handlers::search_jobs, handlers::get_job,
        handlers::apply_to_job, handlers::get_my_applications,
        handlers::create_job, handlers::get_my_jobs, handlers::update_job,
        handlers::delete_job, handlers::get_job_applications,
        handlers::update_application_status,
        handlers::get_all_jobs_admin, handlers::delete_job_admin
    ),
    components(
        schemas(
            models::Role, models::ApplicationStatus, models::User, models::Job,
            models::Application, models::ApplicationWithJob, models::PublicUser,
            models::AuthResponse, models::JobPage, models::RegisterRequest,
            models::LoginRequest, models::CreateJobRequest,
            models::UpdateJobRequest, models::StatusUpdateRequest,
        )
    ),
    tags(
        (name = "job-portal", description = "Job Platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: abstract persistence behind `Arc<dyn Repository>`.
    pub repo: RepositoryState,
    /// Storage layer: resume file persistence behind `Arc<dyn StorageService>`.
    pub storage: StorageState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Allow extractors and handlers to selectively pull components from the
// shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the protected route groups. `AuthUser`
/// implements `FromRequestParts`, so a missing, malformed, or expired token
/// rejects the request with 401 before the handler runs. Role checks happen
/// inside the handlers against their declared allowed-role sets.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS configuration from the environment; "*" allows any origin.
    let cors = if state.config.cors_origins.trim() == "*" {
        CorsLayer::new()
            .allow_methods(Any)
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_methods(Any)
            .allow_origin(origins)
            .allow_headers(Any)
    };

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. API router assembly: one sub-router per access level, protected
    // groups wrapped in the authentication layer.
    let api_router = Router::new()
        .merge(public::public_routes())
        .merge(jobseeker::jobseeker_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        )))
        .nest(
            "/employer",
            employer::employer_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        );

    let base_router = Router::new()
        // Documentation: auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // The whole API surface lives under /api.
        .nest("/api", api_router)
        // Uploaded resumes are public static files keyed by generated name.
        .nest_service("/uploads", ServeDir::new(&state.config.uploads_dir))
        .with_state(state);

    // 3. Observability and correlation layers (outermost).
    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation: a unique UUID for every request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing: wraps the request/response lifecycle in a
                // span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the `TraceLayer` span to include the `x-request-id` header
/// alongside the method and URI, so every log line for a single request is
/// correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
