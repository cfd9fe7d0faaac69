use crate::models::{
    Application, ApplicationStatus, ApplicationWithJob, Job, UpdateJobRequest, User,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations, shared as
/// `Arc<dyn Repository>` across Axum's asynchronous task boundaries. Handlers
/// talk to this trait only; the concrete store (Postgres, in-memory) is
/// swappable.
///
/// Ownership-scoped methods (`get_job_owned`, `update_job`, `delete_job`,
/// and the callers built on them) take the owning employer's id and match it
/// in the same query, so "missing" and "not owned" are indistinguishable to
/// the caller by construction.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    /// Returns None when the email is already taken (unique constraint).
    async fn create_user(&self, user: User) -> Option<User>;
    async fn get_user_by_email(&self, email: &str) -> Option<User>;

    // --- Jobs ---
    /// Paginated public listing, newest first. `search` matches
    /// case-insensitively as a substring against title, company, location,
    /// or any skill (logical OR). Returns the page plus the total count of
    /// matching jobs.
    async fn list_jobs(&self, page: i64, limit: i64, search: Option<String>) -> (Vec<Job>, i64);
    async fn get_job(&self, job_id: Uuid) -> Option<Job>;
    /// Ownership-scoped retrieval: None if missing OR not owned.
    async fn get_job_owned(&self, job_id: Uuid, employer_id: Uuid) -> Option<Job>;
    async fn create_job(&self, job: Job) -> Option<Job>;
    /// The caller's jobs, newest first.
    async fn get_employer_jobs(&self, employer_id: Uuid) -> Vec<Job>;
    /// Admin access: every job in the system, newest first.
    async fn get_all_jobs(&self) -> Vec<Job>;
    /// Owner-only partial update. Only `Some` fields are applied (COALESCE);
    /// None if the job is missing or not owned by `employer_id`.
    async fn update_job(
        &self,
        job_id: Uuid,
        employer_id: Uuid,
        req: UpdateJobRequest,
    ) -> Option<Job>;
    /// Owner-only delete. Cascades to all applications referencing the job.
    /// On success returns the stored resume filenames of the cascaded
    /// applications so the caller can drop the files; None if the job is
    /// missing or not owned.
    async fn delete_job(&self, job_id: Uuid, employer_id: Uuid) -> Option<Vec<String>>;
    /// Admin override: deletes any job by id, with the same cascade and the
    /// same returned resume filenames.
    async fn delete_job_admin(&self, job_id: Uuid) -> Option<Vec<String>>;

    // --- Applications ---
    async fn has_applied(&self, job_id: Uuid, applicant_id: Uuid) -> bool;
    /// Conflict-aware insert: the `(job_id, applicant_id)` uniqueness
    /// constraint is enforced at this layer, so two racing applies cannot
    /// both commit. Returns None when the pair already exists.
    async fn create_application(&self, application: Application) -> Option<Application>;
    /// Applications for one job, newest first.
    async fn get_applications_for_job(&self, job_id: Uuid) -> Vec<Application>;
    /// The applicant's own applications, newest first, enriched with the
    /// referenced job's title and company at read time.
    async fn get_applications_for_applicant(&self, applicant_id: Uuid) -> Vec<ApplicationWithJob>;
    async fn get_application(&self, application_id: Uuid) -> Option<Application>;
    async fn set_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Option<Application>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

const JOB_COLUMNS: &str = "job_id, employer_id, title, company, location, description, \
     requirements, salary_range, skills, application_deadline, created_at";

const APPLICATION_COLUMNS: &str = "application_id, job_id, applicant_id, full_name, email, \
     phone, cover_letter, resume_filename, status, created_at";

const USER_COLUMNS: &str = "user_id, email, password_hash, role, full_name, company, created_at";

/// PostgresRepository
///
/// The production implementation, backed by PostgreSQL. All queries are
/// runtime-checked (`query_as`/`QueryBuilder`) with bound parameters; no
/// string interpolation of caller input.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends the shared OR-search predicate for job listings. Skills are a
    /// TEXT[] column, matched element-wise.
    fn push_search_filter(builder: &mut QueryBuilder<'_, sqlx::Postgres>, search: &str) {
        let pattern = format!("%{}%", search);
        builder.push(" WHERE (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR company ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR location ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR EXISTS (SELECT 1 FROM unnest(skills) AS skill WHERE skill ILIKE ");
        builder.push_bind(pattern);
        builder.push("))");
    }

    /// Stored resume filenames of every application for a job, collected
    /// before the cascade delete removes the rows.
    async fn job_resume_filenames(&self, job_id: Uuid) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT resume_filename FROM applications WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("job_resume_filenames error: {:?}", e);
            vec![]
        })
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// create_user
    ///
    /// `ON CONFLICT DO NOTHING` on the email unique constraint: a duplicate
    /// registration inserts no row and surfaces as None.
    async fn create_user(&self, user: User) -> Option<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (email) DO NOTHING RETURNING {USER_COLUMNS}"
        ))
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.full_name)
        .bind(&user.company)
        .bind(user.created_at)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_user error: {:?}", e);
            None
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_by_email error: {:?}", e);
            None
        })
    }

    /// list_jobs
    ///
    /// Page and count share the same search predicate so `total` always
    /// describes the filtered set, not the whole table.
    async fn list_jobs(&self, page: i64, limit: i64, search: Option<String>) -> (Vec<Job>, i64) {
        let search = search.filter(|s| !s.is_empty());
        // Page and limit arrive clamped to >= 1 but otherwise unbounded, so
        // the offset must not wrap on extreme values.
        let offset = (page - 1).saturating_mul(limit);

        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
        if let Some(s) = &search {
            Self::push_search_filter(&mut builder, s);
        }
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let jobs = match builder.build_query_as::<Job>().fetch_all(&self.pool).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!("list_jobs error: {:?}", e);
                vec![]
            }
        };

        let mut count_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM jobs");
        if let Some(s) = &search {
            Self::push_search_filter(&mut count_builder, s);
        }

        let total = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_jobs count error: {:?}", e);
                0
            });

        (jobs, total)
    }

    async fn get_job(&self, job_id: Uuid) -> Option<Job> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_job error: {:?}", e);
                None
            })
    }

    async fn get_job_owned(&self, job_id: Uuid, employer_id: Uuid) -> Option<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1 AND employer_id = $2"
        ))
        .bind(job_id)
        .bind(employer_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_job_owned error: {:?}", e);
            None
        })
    }

    async fn create_job(&self, job: Job) -> Option<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs ({JOB_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {JOB_COLUMNS}"
        ))
        .bind(job.job_id)
        .bind(job.employer_id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.salary_range)
        .bind(&job.skills)
        .bind(&job.application_deadline)
        .bind(job.created_at)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_job error: {:?}", e);
            None
        })
    }

    async fn get_employer_jobs(&self, employer_id: Uuid) -> Vec<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE employer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(employer_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_employer_jobs error: {:?}", e);
            vec![]
        })
    }

    async fn get_all_jobs(&self) -> Vec<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_all_jobs error: {:?}", e);
            vec![]
        })
    }

    /// update_job
    ///
    /// Owner-matched partial update via COALESCE: a NULL bind leaves the
    /// column untouched. Zero rows updated means missing-or-not-owned.
    async fn update_job(
        &self,
        job_id: Uuid,
        employer_id: Uuid,
        req: UpdateJobRequest,
    ) -> Option<Job> {
        sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs SET \
                title = COALESCE($3, title), \
                company = COALESCE($4, company), \
                location = COALESCE($5, location), \
                description = COALESCE($6, description), \
                requirements = COALESCE($7, requirements), \
                salary_range = COALESCE($8, salary_range), \
                skills = COALESCE($9, skills), \
                application_deadline = COALESCE($10, application_deadline) \
             WHERE job_id = $1 AND employer_id = $2 \
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job_id)
        .bind(employer_id)
        .bind(&req.title)
        .bind(&req.company)
        .bind(&req.location)
        .bind(&req.description)
        .bind(&req.requirements)
        .bind(&req.salary_range)
        .bind(&req.skills)
        .bind(&req.application_deadline)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_job error: {:?}", e);
            None
        })
    }

    /// delete_job
    ///
    /// Applications cascade at the schema level (`ON DELETE CASCADE` on the
    /// applications.job_id FK), so the row delete is one logical operation.
    /// The resume filenames are collected first so the caller can remove the
    /// now-unreferenced files; an apply that lands between the two statements
    /// leaves at most one stray file.
    async fn delete_job(&self, job_id: Uuid, employer_id: Uuid) -> Option<Vec<String>> {
        let resumes = self.job_resume_filenames(job_id).await;
        match sqlx::query("DELETE FROM jobs WHERE job_id = $1 AND employer_id = $2")
            .bind(job_id)
            .bind(employer_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) if res.rows_affected() > 0 => Some(resumes),
            Ok(_) => None,
            Err(e) => {
                tracing::error!("delete_job error: {:?}", e);
                None
            }
        }
    }

    async fn delete_job_admin(&self, job_id: Uuid) -> Option<Vec<String>> {
        let resumes = self.job_resume_filenames(job_id).await;
        match sqlx::query("DELETE FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) if res.rows_affected() > 0 => Some(resumes),
            Ok(_) => None,
            Err(e) => {
                tracing::error!("delete_job_admin error: {:?}", e);
                None
            }
        }
    }

    async fn has_applied(&self, job_id: Uuid, applicant_id: Uuid) -> bool {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE job_id = $1 AND applicant_id = $2",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await
        .map(|count| count > 0)
        .unwrap_or_else(|e| {
            tracing::error!("has_applied error: {:?}", e);
            false
        })
    }

    /// create_application
    ///
    /// `ON CONFLICT (job_id, applicant_id) DO NOTHING`: the unique index is
    /// the authoritative duplicate check, so two concurrent applies for the
    /// same pair cannot both insert.
    async fn create_application(&self, application: Application) -> Option<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "INSERT INTO applications ({APPLICATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (job_id, applicant_id) DO NOTHING \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(application.application_id)
        .bind(application.job_id)
        .bind(application.applicant_id)
        .bind(&application.full_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.cover_letter)
        .bind(&application.resume_filename)
        .bind(application.status)
        .bind(application.created_at)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_application error: {:?}", e);
            None
        })
    }

    async fn get_applications_for_job(&self, job_id: Uuid) -> Vec<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE job_id = $1 ORDER BY created_at DESC"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_applications_for_job error: {:?}", e);
            vec![]
        })
    }

    /// get_applications_for_applicant
    ///
    /// Joins the jobs table at read time to attach job_title/job_company;
    /// nothing denormalized is ever stored.
    async fn get_applications_for_applicant(&self, applicant_id: Uuid) -> Vec<ApplicationWithJob> {
        sqlx::query_as::<_, ApplicationWithJob>(
            "SELECT a.application_id, a.job_id, a.applicant_id, a.full_name, a.email, \
                    a.phone, a.cover_letter, a.resume_filename, a.status, a.created_at, \
                    j.title AS job_title, j.company AS job_company \
             FROM applications a \
             LEFT JOIN jobs j ON a.job_id = j.job_id \
             WHERE a.applicant_id = $1 \
             ORDER BY a.created_at DESC",
        )
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_applications_for_applicant error: {:?}", e);
            vec![]
        })
    }

    async fn get_application(&self, application_id: Uuid) -> Option<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE application_id = $1"
        ))
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_application error: {:?}", e);
            None
        })
    }

    async fn set_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Option<Application> {
        sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET status = $2 WHERE application_id = $1 \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(application_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("set_application_status error: {:?}", e);
            None
        })
    }
}

// --- In-Memory Implementation (Tests / DB-less Runs) ---

#[derive(Default)]
struct MemoryStore {
    users: HashMap<Uuid, User>,
    jobs: HashMap<Uuid, Job>,
    applications: HashMap<Uuid, Application>,
}

/// InMemoryRepository
///
/// A fully functional `Repository` backed by Mutex-held maps, used by the
/// integration tests and for local runs without a database. Every operation
/// completes under a single lock acquisition, which gives the same atomicity
/// the Postgres implementation gets from its constraints: the duplicate-
/// application check and insert are one critical section, and a job delete
/// removes its applications before the lock is released.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<MemoryStore>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Removes every application for the job, returning their stored resume
/// filenames, mirroring the cascade-plus-collect of the Postgres delete.
fn drain_job_applications(store: &mut MemoryStore, job_id: Uuid) -> Vec<String> {
    let mut resumes = Vec::new();
    store.applications.retain(|_, app| {
        if app.job_id == job_id {
            resumes.push(app.resume_filename.clone());
            false
        } else {
            true
        }
    });
    resumes
}

fn job_matches(job: &Job, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    job.title.to_lowercase().contains(&needle)
        || job.company.to_lowercase().contains(&needle)
        || job.location.to_lowercase().contains(&needle)
        || job
            .skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(&needle))
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_user(&self, user: User) -> Option<User> {
        let mut store = self.store.lock().unwrap();
        if store.users.values().any(|u| u.email == user.email) {
            return None;
        }
        store.users.insert(user.user_id, user.clone());
        Some(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let store = self.store.lock().unwrap();
        store.users.values().find(|u| u.email == email).cloned()
    }

    async fn list_jobs(&self, page: i64, limit: i64, search: Option<String>) -> (Vec<Job>, i64) {
        let store = self.store.lock().unwrap();
        let search = search.filter(|s| !s.is_empty());

        let mut jobs: Vec<Job> = store
            .jobs
            .values()
            .filter(|job| search.as_deref().is_none_or(|s| job_matches(job, s)))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = jobs.len() as i64;
        let offset = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let page_jobs = jobs.into_iter().skip(offset).take(take).collect();

        (page_jobs, total)
    }

    async fn get_job(&self, job_id: Uuid) -> Option<Job> {
        let store = self.store.lock().unwrap();
        store.jobs.get(&job_id).cloned()
    }

    async fn get_job_owned(&self, job_id: Uuid, employer_id: Uuid) -> Option<Job> {
        let store = self.store.lock().unwrap();
        store
            .jobs
            .get(&job_id)
            .filter(|job| job.employer_id == employer_id)
            .cloned()
    }

    async fn create_job(&self, job: Job) -> Option<Job> {
        let mut store = self.store.lock().unwrap();
        store.jobs.insert(job.job_id, job.clone());
        Some(job)
    }

    async fn get_employer_jobs(&self, employer_id: Uuid) -> Vec<Job> {
        let store = self.store.lock().unwrap();
        let mut jobs: Vec<Job> = store
            .jobs
            .values()
            .filter(|job| job.employer_id == employer_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    async fn get_all_jobs(&self) -> Vec<Job> {
        let store = self.store.lock().unwrap();
        let mut jobs: Vec<Job> = store.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    async fn update_job(
        &self,
        job_id: Uuid,
        employer_id: Uuid,
        req: UpdateJobRequest,
    ) -> Option<Job> {
        let mut store = self.store.lock().unwrap();
        let job = store
            .jobs
            .get_mut(&job_id)
            .filter(|job| job.employer_id == employer_id)?;

        if let Some(title) = req.title {
            job.title = title;
        }
        if let Some(company) = req.company {
            job.company = company;
        }
        if let Some(location) = req.location {
            job.location = location;
        }
        if let Some(description) = req.description {
            job.description = description;
        }
        if let Some(requirements) = req.requirements {
            job.requirements = requirements;
        }
        if let Some(salary_range) = req.salary_range {
            job.salary_range = Some(salary_range);
        }
        if let Some(skills) = req.skills {
            job.skills = skills;
        }
        if let Some(deadline) = req.application_deadline {
            job.application_deadline = deadline;
        }

        Some(job.clone())
    }

    async fn delete_job(&self, job_id: Uuid, employer_id: Uuid) -> Option<Vec<String>> {
        let mut store = self.store.lock().unwrap();
        let owned = store
            .jobs
            .get(&job_id)
            .is_some_and(|job| job.employer_id == employer_id);
        if !owned {
            return None;
        }
        store.jobs.remove(&job_id);
        Some(drain_job_applications(&mut store, job_id))
    }

    async fn delete_job_admin(&self, job_id: Uuid) -> Option<Vec<String>> {
        let mut store = self.store.lock().unwrap();
        store.jobs.remove(&job_id)?;
        Some(drain_job_applications(&mut store, job_id))
    }

    async fn has_applied(&self, job_id: Uuid, applicant_id: Uuid) -> bool {
        let store = self.store.lock().unwrap();
        store
            .applications
            .values()
            .any(|app| app.job_id == job_id && app.applicant_id == applicant_id)
    }

    async fn create_application(&self, application: Application) -> Option<Application> {
        let mut store = self.store.lock().unwrap();
        // Duplicate check and insert under the same lock.
        let duplicate = store.applications.values().any(|app| {
            app.job_id == application.job_id && app.applicant_id == application.applicant_id
        });
        if duplicate {
            return None;
        }
        store
            .applications
            .insert(application.application_id, application.clone());
        Some(application)
    }

    async fn get_applications_for_job(&self, job_id: Uuid) -> Vec<Application> {
        let store = self.store.lock().unwrap();
        let mut apps: Vec<Application> = store
            .applications
            .values()
            .filter(|app| app.job_id == job_id)
            .cloned()
            .collect();
        apps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        apps
    }

    async fn get_applications_for_applicant(&self, applicant_id: Uuid) -> Vec<ApplicationWithJob> {
        let store = self.store.lock().unwrap();
        let mut apps: Vec<ApplicationWithJob> = store
            .applications
            .values()
            .filter(|app| app.applicant_id == applicant_id)
            .map(|app| {
                let job = store.jobs.get(&app.job_id);
                ApplicationWithJob {
                    application_id: app.application_id,
                    job_id: app.job_id,
                    applicant_id: app.applicant_id,
                    full_name: app.full_name.clone(),
                    email: app.email.clone(),
                    phone: app.phone.clone(),
                    cover_letter: app.cover_letter.clone(),
                    resume_filename: app.resume_filename.clone(),
                    status: app.status,
                    created_at: app.created_at,
                    job_title: job.map(|j| j.title.clone()),
                    job_company: job.map(|j| j.company.clone()),
                }
            })
            .collect();
        apps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        apps
    }

    async fn get_application(&self, application_id: Uuid) -> Option<Application> {
        let store = self.store.lock().unwrap();
        store.applications.get(&application_id).cloned()
    }

    async fn set_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Option<Application> {
        let mut store = self.store.lock().unwrap();
        let app = store.applications.get_mut(&application_id)?;
        app.status = status;
        Some(app.clone())
    }
}
