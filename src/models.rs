use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Closed Enums (Role / Status) ---

/// Role
///
/// The closed set of account roles. Stored as the Postgres enum `user_role`.
/// Free-text roles are rejected at the registration boundary; `Admin` is never
/// self-registrable and only exists through startup provisioning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    #[default]
    Jobseeker,
    Employer,
    Admin,
}

impl Role {
    /// Parses a role from a registration payload. Only the two public-facing
    /// roles are admitted; `admin` and unknown strings are both rejected.
    pub fn parse_public(s: &str) -> Option<Role> {
        match s {
            "jobseeker" => Some(Role::Jobseeker),
            "employer" => Some(Role::Employer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Jobseeker => "jobseeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// ApplicationStatus
///
/// The four-value employer review outcome on an application. Any value may be
/// set from any other (re-enterable, no forward-only constraint). Stored as
/// the Postgres enum `application_status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[ts(export)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Approved,
    Rejected,
    Waitlisted,
}

impl FromStr for ApplicationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "waitlisted" => Ok(ApplicationStatus::Waitlisted),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Waitlisted => "waitlisted",
        };
        f.write_str(s)
    }
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical account record from the `users` table. The password hash is
/// never serialized into a response body; handlers return `PublicUser`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub user_id: Uuid,
    /// Unique login identifier. The provisioned admin account uses the fixed
    /// identifier "admin" rather than an email address.
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    /// Present only for employer accounts.
    pub company: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Job
///
/// A job posting from the `jobs` table. Owned by the employer identified by
/// `employer_id` for write purposes; globally readable.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Job {
    pub job_id: Uuid,
    // FK to users.user_id (owner).
    pub employer_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: Option<String>,
    pub skills: Vec<String>,
    /// ISO date string; echoed back verbatim, not parsed.
    pub application_deadline: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Application
///
/// A seeker's application from the `applications` table. At most one row per
/// `(job_id, applicant_id)`, enforced by a unique index. Deleted only as a
/// cascade of job deletion.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Application {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub cover_letter: String,
    /// Generated name of the stored resume file under the public uploads path.
    pub resume_filename: String,
    pub status: ApplicationStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ApplicationWithJob
///
/// An application enriched with the referenced job's title and company at
/// read time. The join is denormalized on read, never stored, so the fields
/// go stale only within a single response, never in the database.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ApplicationWithJob {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub cover_letter: String,
    pub resume_filename: String,
    pub status: ApplicationStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    // Loaded via a JOIN against jobs in the repository query.
    #[sqlx(default)]
    pub job_title: Option<String>,
    #[sqlx(default)]
    pub job_company: Option<String>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /api/auth/register. `role` arrives as a free string
/// and is promoted to the closed `Role` enum at the handler boundary so an
/// invalid value is a 400, not a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// "jobseeker" or "employer".
    pub role: String,
    pub full_name: String,
    /// Only meaningful for employers; ignored for jobseekers.
    pub company: Option<String>,
}

/// LoginRequest
///
/// Input payload for POST /api/auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreateJobRequest
///
/// Input payload for POST /api/employer/jobs. No field validation beyond
/// required presence.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub application_deadline: String,
}

/// UpdateJobRequest
///
/// Partial update payload for PUT /api/employer/jobs/{id}. All fields are
/// `Option<T>`; absent fields retain their prior values (COALESCE semantics
/// at the repository layer).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateJobRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
}

/// StatusUpdateRequest
///
/// Input payload for PUT /api/employer/applications/{id}/status. The status
/// arrives as a string and is validated against the four-value enum in the
/// handler, so out-of-range values surface as 400 Invalid status.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// --- Response Schemas (Output) ---

/// PublicUser
///
/// The account profile returned by register/login: the user record minus the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PublicUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub full_name: String,
    pub company: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            user_id: user.user_id,
            email: user.email.clone(),
            role: user.role,
            full_name: user.full_name.clone(),
            company: user.company.clone(),
        }
    }
}

/// AuthResponse
///
/// Output of both auth endpoints: a signed session token plus the profile it
/// was issued for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// JobPage
///
/// Paginated job listing envelope. `total_pages` is `ceil(total / limit)`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}
