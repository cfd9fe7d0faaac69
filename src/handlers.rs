use crate::{
    AppState,
    auth::{self, AuthUser, require_role},
    error::{ApiError, ApiResult},
    models::{
        Application, ApplicationStatus, ApplicationWithJob, AuthResponse, CreateJobRequest, Job,
        JobPage, LoginRequest, PublicUser, RegisterRequest, Role, StatusUpdateRequest,
        UpdateJobRequest, User,
    },
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// JobFilter
///
/// Query parameters for the public job listing endpoint (GET /api/jobs).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct JobFilter {
    /// 1-based page number; values below 1 are clamped up.
    pub page: Option<i64>,
    /// Page size; values below 1 are clamped up.
    pub limit: Option<i64>,
    /// Case-insensitive substring match against title, company, location,
    /// or skills.
    pub search: Option<String>,
}

/// SearchFilter
///
/// Query parameters for GET /api/jobs/search, an alias of the listing
/// endpoint with `keyword` in place of `search`.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SearchFilter {
    pub keyword: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn clamp_paging(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (page.unwrap_or(1).max(1), limit.unwrap_or(10).max(1))
}

async fn paged_jobs(state: &AppState, page: i64, limit: i64, search: Option<String>) -> JobPage {
    let (jobs, total) = state.repo.list_jobs(page, limit, search).await;
    JobPage {
        jobs,
        total,
        page,
        limit,
        total_pages: total / limit + if total % limit != 0 { 1 } else { 0 },
    }
}

// --- Health ---

/// health_check
///
/// [Public Route] Liveness probe.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is alive"))
)]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates a new account and returns a session token plus the
/// profile. Only the two public-facing roles are admitted; `admin` and any
/// unknown role string are rejected with 400 before anything is stored. The
/// `company` field is kept only for employers.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = AuthResponse),
        (status = 400, description = "Duplicate email or invalid role")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let role = Role::parse_public(&payload.role).ok_or_else(|| ApiError::bad_request("Invalid role"))?;

    if state.repo.get_user_by_email(&payload.email).await.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let user = User {
        user_id: Uuid::new_v4(),
        email: payload.email,
        password_hash: auth::hash_password(&payload.password)?,
        role,
        full_name: payload.full_name,
        company: if role == Role::Employer {
            payload.company
        } else {
            None
        },
        created_at: chrono::Utc::now(),
    };

    // The email unique constraint is authoritative; a race past the check
    // above still comes back as a duplicate here.
    let user = state
        .repo
        .create_user(user)
        .await
        .ok_or_else(|| ApiError::bad_request("Email already registered"))?;

    let token = auth::issue_token(&user, &state.config.jwt_secret)?;

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

/// login
///
/// [Public Route] Authenticates an account and returns a fresh session token.
/// Unknown email and wrong password are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .repo
        .get_user_by_email(&payload.email)
        .await
        .filter(|user| auth::verify_password(&payload.password, &user.password_hash))
        .ok_or_else(|| ApiError::unauthenticated("Invalid credentials"))?;

    let token = auth::issue_token(&user, &state.config.jwt_secret)?;

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

// --- Public Job Handlers ---

/// get_jobs
///
/// [Public Route] Paginated, filterable job listing, newest first.
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobFilter),
    responses((status = 200, description = "Paginated job listing", body = JobPage))
)]
pub async fn get_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Json<JobPage> {
    let (page, limit) = clamp_paging(filter.page, filter.limit);
    Json(paged_jobs(&state, page, limit, filter.search).await)
}

/// search_jobs
///
/// [Public Route] Alias of the listing endpoint with `keyword` mapped onto
/// `search`.
#[utoipa::path(
    get,
    path = "/api/jobs/search",
    params(SearchFilter),
    responses((status = 200, description = "Paginated job listing", body = JobPage))
)]
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
) -> Json<JobPage> {
    let (page, limit) = clamp_paging(filter.page, filter.limit);
    Json(paged_jobs(&state, page, limit, Some(filter.keyword)).await)
}

/// get_job
///
/// [Public Route] Single job by id.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Found", body = Job),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<Job>> {
    match state.repo.get_job(job_id).await {
        Some(job) => Ok(Json(job)),
        None => Err(ApiError::not_found("Job not found")),
    }
}

// --- Job Seeker Handlers ---

/// apply_to_job
///
/// [Jobseeker Route] Multipart application submission: four text fields plus
/// the resume file. The job-existence check and an advisory duplicate check
/// run before the upload is stored; the storage-layer uniqueness constraint
/// on (job_id, applicant_id) remains the authoritative duplicate guard, so a
/// concurrent apply for the same pair cannot slip through.
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Application created", body = Application),
        (status = 400, description = "Duplicate application or malformed form"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn apply_to_job(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<Application>> {
    require_role(&user, &[Role::Jobseeker])?;

    if state.repo.get_job(job_id).await.is_none() {
        return Err(ApiError::not_found("Job not found"));
    }

    if state.repo.has_applied(job_id, user.id).await {
        return Err(ApiError::bad_request("Already applied to this job"));
    }

    let mut full_name = None;
    let mut email = None;
    let mut phone = None;
    let mut cover_letter = None;
    let mut resume: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "full_name" => full_name = Some(read_text_field(field).await?),
            "email" => email = Some(read_text_field(field).await?),
            "phone" => phone = Some(read_text_field(field).await?),
            "cover_letter" => cover_letter = Some(read_text_field(field).await?),
            "resume" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "resume".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::bad_request("Malformed multipart body"))?;
                resume = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let full_name = full_name.ok_or_else(|| missing_field("full_name"))?;
    let email = email.ok_or_else(|| missing_field("email"))?;
    let phone = phone.ok_or_else(|| missing_field("phone"))?;
    let cover_letter = cover_letter.ok_or_else(|| missing_field("cover_letter"))?;
    let (resume_name, resume_bytes) = resume.ok_or_else(|| missing_field("resume"))?;

    let resume_filename = state
        .storage
        .store_resume(&resume_name, &resume_bytes)
        .await
        .map_err(|e| {
            tracing::error!("resume storage error: {}", e);
            ApiError::internal("resume storage failed")
        })?;

    let application = Application {
        application_id: Uuid::new_v4(),
        job_id,
        applicant_id: user.id,
        full_name,
        email,
        phone,
        cover_letter,
        resume_filename: resume_filename.clone(),
        status: ApplicationStatus::Applied,
        created_at: chrono::Utc::now(),
    };

    match state.repo.create_application(application).await {
        Some(application) => Ok(Json(application)),
        None => {
            // Lost the duplicate race after the upload; no row references
            // the stored file, so drop it.
            state.storage.remove_resume(&resume_filename).await;
            Err(ApiError::bad_request("Already applied to this job"))
        }
    }
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart body"))
}

fn missing_field(name: &str) -> ApiError {
    ApiError::bad_request(format!("Missing form field: {}", name))
}

/// get_my_applications
///
/// [Jobseeker Route] The caller's applications, newest first, each enriched
/// with the referenced job's title and company at read time.
#[utoipa::path(
    get,
    path = "/api/jobseeker/applications",
    responses((status = 200, description = "My applications", body = [ApplicationWithJob]))
)]
pub async fn get_my_applications(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ApplicationWithJob>>> {
    require_role(&user, &[Role::Jobseeker])?;
    Ok(Json(state.repo.get_applications_for_applicant(user.id).await))
}

// --- Employer Handlers ---

/// create_job
///
/// [Employer Route] Creates a job posting owned by the caller. No field
/// validation beyond required presence.
#[utoipa::path(
    post,
    path = "/api/employer/jobs",
    request_body = CreateJobRequest,
    responses((status = 200, description = "Created", body = Job))
)]
pub async fn create_job(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateJobRequest>,
) -> ApiResult<Json<Job>> {
    require_role(&user, &[Role::Employer])?;

    let job = Job {
        job_id: Uuid::new_v4(),
        employer_id: user.id,
        title: payload.title,
        company: payload.company,
        location: payload.location,
        description: payload.description,
        requirements: payload.requirements,
        salary_range: payload.salary_range,
        skills: payload.skills,
        application_deadline: payload.application_deadline,
        created_at: chrono::Utc::now(),
    };

    let job = state
        .repo
        .create_job(job)
        .await
        .ok_or_else(|| ApiError::internal("job creation failed"))?;

    Ok(Json(job))
}

/// get_my_jobs
///
/// [Employer Route] Lists the caller's own jobs, newest first.
#[utoipa::path(
    get,
    path = "/api/employer/jobs",
    responses((status = 200, description = "My jobs", body = [Job]))
)]
pub async fn get_my_jobs(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Job>>> {
    require_role(&user, &[Role::Employer])?;
    Ok(Json(state.repo.get_employer_jobs(user.id).await))
}

/// update_job
///
/// [Employer Route] Owner-only partial update. Only fields present in the
/// payload are applied. 404 covers both "job missing" and "job not owned by
/// the caller" so non-owners cannot probe for existence.
#[utoipa::path(
    put,
    path = "/api/employer/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Updated", body = Job),
        (status = 404, description = "Not found or not owned")
    )
)]
pub async fn update_job(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> ApiResult<Json<Job>> {
    require_role(&user, &[Role::Employer])?;

    match state.repo.update_job(job_id, user.id, payload).await {
        Some(job) => Ok(Json(job)),
        None => Err(ApiError::not_found("Job not found or not owned by you")),
    }
}

/// delete_job
///
/// [Employer Route] Owner-only delete with cascade: every application
/// referencing the job is removed in the same logical operation, and the
/// stored resume files of the cascaded applications are dropped best-effort.
/// Same ownership-conflated 404 as update.
#[utoipa::path(
    delete,
    path = "/api/employer/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found or not owned")
    )
)]
pub async fn delete_job(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_role(&user, &[Role::Employer])?;

    match state.repo.delete_job(job_id, user.id).await {
        Some(resumes) => {
            remove_resumes(&state, &resumes).await;
            Ok(Json(serde_json::json!({ "message": "Job deleted successfully" })))
        }
        None => Err(ApiError::not_found("Job not found or not owned by you")),
    }
}

/// Drops the stored resume files of cascaded applications. Best-effort: a
/// failed removal is logged by the storage layer, never surfaced.
async fn remove_resumes(state: &AppState, resumes: &[String]) {
    for stored_name in resumes {
        state.storage.remove_resume(stored_name).await;
    }
}

/// get_job_applications
///
/// [Employer Route] Applications for one of the caller's jobs, newest first.
/// Ownership is verified first, with the conflated 404.
#[utoipa::path(
    get,
    path = "/api/employer/jobs/{id}/applications",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Applications", body = [Application]),
        (status = 404, description = "Not found or not owned")
    )
)]
pub async fn get_job_applications(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Application>>> {
    require_role(&user, &[Role::Employer])?;

    if state.repo.get_job_owned(job_id, user.id).await.is_none() {
        return Err(ApiError::not_found("Job not found or not owned by you"));
    }

    Ok(Json(state.repo.get_applications_for_job(job_id).await))
}

/// update_application_status
///
/// [Employer Route] Sets an application's review status. The check order is
/// fixed: 404 if the application is missing, 403 if its job is not owned by
/// the caller, 400 if the status string is outside the four-value enum.
/// Re-setting the same status is valid and leaves state unchanged.
#[utoipa::path(
    put,
    path = "/api/employer/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = Application),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Not the owning employer"),
        (status = 404, description = "Application not found")
    )
)]
pub async fn update_application_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> ApiResult<Json<Application>> {
    require_role(&user, &[Role::Employer])?;

    let application = state
        .repo
        .get_application(application_id)
        .await
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    if state
        .repo
        .get_job_owned(application.job_id, user.id)
        .await
        .is_none()
    {
        return Err(ApiError::forbidden(
            "Not authorized to update this application",
        ));
    }

    let status: ApplicationStatus = payload
        .status
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid status"))?;

    let application = state
        .repo
        .set_application_status(application_id, status)
        .await
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    Ok(Json(application))
}

// --- Admin Handlers ---

/// get_all_jobs_admin
///
/// [Admin Route] Every job in the system, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    responses((status = 200, description = "All jobs", body = [Job]))
)]
pub async fn get_all_jobs_admin(
    user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Job>>> {
    require_role(&user, &[Role::Admin])?;
    Ok(Json(state.repo.get_all_jobs().await))
}

/// delete_job_admin
///
/// [Admin Route] Deletes any job by id, with the same application cascade as
/// the employer delete. No ownership check.
#[utoipa::path(
    delete,
    path = "/api/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_job_admin(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_role(&user, &[Role::Admin])?;

    match state.repo.delete_job_admin(job_id).await {
        Some(resumes) => {
            remove_resumes(&state, &resumes).await;
            Ok(Json(serde_json::json!({ "message": "Job deleted successfully" })))
        }
        None => Err(ApiError::not_found("Job not found")),
    }
}
