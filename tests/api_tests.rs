use async_trait::async_trait;
use job_portal::{
    AppConfig, AppState, create_router,
    auth::init_admin,
    models::{
        Application, ApplicationStatus, ApplicationWithJob, AuthResponse, Job, JobPage,
        UpdateJobRequest, User,
    },
    repository::{InMemoryRepository, Repository, RepositoryState},
    storage::{LocalStorageService, StorageState},
};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    // Held so the uploads directory outlives the test.
    _upload_dir: tempfile::TempDir,
    pub upload_path: std::path::PathBuf,
}

async fn spawn_app() -> TestApp {
    spawn_app_with_repo(Arc::new(InMemoryRepository::new())).await
}

async fn spawn_app_with_repo(repo: RepositoryState) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create temp uploads dir");
    let upload_path = upload_dir.path().to_path_buf();

    init_admin(&repo).await.expect("admin provisioning failed");

    let storage = Arc::new(LocalStorageService::new(&upload_path)) as StorageState;
    let config = AppConfig::default();

    let state = AppState {
        repo,
        storage,
        config,
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        _upload_dir: upload_dir,
        upload_path,
    }
}

async fn register(
    client: &reqwest::Client,
    address: &str,
    email: &str,
    role: &str,
    company: Option<&str>,
) -> AuthResponse {
    let resp = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "email": email,
            "password": "password123",
            "role": role,
            "full_name": "Test Person",
            "company": company,
        }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), 200, "register should succeed");
    resp.json().await.expect("register response body")
}

async fn create_job(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    title: &str,
    skills: &[&str],
) -> Job {
    let resp = client
        .post(format!("{}/api/employer/jobs", address))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": title,
            "company": "Acme Corp",
            "location": "Remote",
            "description": "Build things",
            "requirements": "Rust",
            "salary_range": "50k-90k",
            "skills": skills,
            "application_deadline": "2026-12-31",
        }))
        .send()
        .await
        .expect("create job request failed");
    assert_eq!(resp.status(), 200, "create job should succeed");
    resp.json().await.expect("job response body")
}

fn resume_form() -> Form {
    Form::new()
        .text("full_name", "Applicant One")
        .text("email", "applicant@example.com")
        .text("phone", "+1-555-0100")
        .text("cover_letter", "I am a great fit.")
        .part(
            "resume",
            Part::bytes(b"%PDF-1.4 fake resume".to_vec()).file_name("my_resume.pdf"),
        )
}

fn uploads_count(app: &TestApp) -> usize {
    std::fs::read_dir(&app.upload_path).unwrap().count()
}

async fn apply(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    job_id: Uuid,
) -> reqwest::Response {
    client
        .post(format!("{}/api/jobs/{}/apply", address, job_id))
        .bearer_auth(token)
        .multipart(resume_form())
        .send()
        .await
        .expect("apply request failed")
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &app.address, "dup@example.com", "jobseeker", None).await;

    let resp = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&serde_json::json!({
            "email": "dup@example.com",
            "password": "other",
            "role": "jobseeker",
            "full_name": "Second",
            "company": null,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Email already registered");
}

#[tokio::test]
async fn test_register_rejects_invalid_and_admin_roles() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for role in ["admin", "superuser", ""] {
        let resp = client
            .post(format!("{}/api/auth/register", app.address))
            .json(&serde_json::json!({
                "email": format!("{}@example.com", if role.is_empty() { "blank" } else { role }),
                "password": "pw",
                "role": role,
                "full_name": "Nope",
                "company": null,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "role {:?} must be rejected", role);
    }
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    register(&client, &app.address, "who@example.com", "jobseeker", None).await;

    // Wrong password and unknown email are indistinguishable.
    for (email, password) in [("who@example.com", "wrong"), ("nobody@example.com", "pw")] {
        let resp = client
            .post(format!("{}/api/auth/login", app.address))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);
    }
}

#[tokio::test]
async fn test_role_enforcement() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let seeker = register(&client, &app.address, "s@example.com", "jobseeker", None).await;
    let employer = register(
        &client,
        &app.address,
        "e@example.com",
        "employer",
        Some("Acme"),
    )
    .await;

    // Jobseeker token on an employer endpoint.
    let resp = client
        .get(format!("{}/api/employer/jobs", app.address))
        .bearer_auth(&seeker.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Employer token on a jobseeker endpoint.
    let resp = client
        .get(format!("{}/api/jobseeker/applications", app.address))
        .bearer_auth(&employer.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Employer token on an admin endpoint.
    let resp = client
        .get(format!("{}/api/admin/jobs", app.address))
        .bearer_auth(&employer.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // No token at all on a protected endpoint.
    let resp = client
        .get(format!("{}/api/employer/jobs", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // The matching role is admitted.
    let resp = client
        .get(format!("{}/api/employer/jobs", app.address))
        .bearer_auth(&employer.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_full_application_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Employer posts a job.
    let employer = register(
        &client,
        &app.address,
        "hr@acme.com",
        "employer",
        Some("Acme Corp"),
    )
    .await;
    let job = create_job(&client, &app.address, &employer.token, "Rust Engineer", &["rust"]).await;
    assert_eq!(job.employer_id, employer.user.user_id);

    // The job is publicly readable.
    let fetched: Job = client
        .get(format!("{}/api/jobs/{}", app.address, job.job_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.title, "Rust Engineer");

    // Seeker applies with a resume.
    let seeker = register(&client, &app.address, "dev@example.com", "jobseeker", None).await;
    let resp = apply(&client, &app.address, &seeker.token, job.job_id).await;
    assert_eq!(resp.status(), 200);
    let application: Application = resp.json().await.unwrap();
    assert_eq!(application.status.to_string(), "applied");
    assert!(application.resume_filename.ends_with("_my_resume.pdf"));

    // The resume landed on disk under the generated name.
    let stored = app.upload_path.join(&application.resume_filename);
    let bytes = std::fs::read(&stored).expect("stored resume should exist");
    assert_eq!(bytes, b"%PDF-1.4 fake resume");

    // Employer sees exactly one application for the job.
    let listed: Vec<Application> = client
        .get(format!(
            "{}/api/employer/jobs/{}/applications",
            app.address, job.job_id
        ))
        .bearer_auth(&employer.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].application_id, application.application_id);

    // Employer approves; re-setting the same status is valid and unchanged.
    for _ in 0..2 {
        let resp = client
            .put(format!(
                "{}/api/employer/applications/{}/status",
                app.address, application.application_id
            ))
            .bearer_auth(&employer.token)
            .json(&serde_json::json!({ "status": "approved" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let updated: Application = resp.json().await.unwrap();
        assert_eq!(updated.status.to_string(), "approved");
    }

    // Seeker sees the approval, enriched with the job's title and company.
    let mine: Vec<ApplicationWithJob> = client
        .get(format!("{}/api/jobseeker/applications", app.address))
        .bearer_auth(&seeker.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status.to_string(), "approved");
    assert_eq!(mine[0].job_title.as_deref(), Some("Rust Engineer"));
    assert_eq!(mine[0].job_company.as_deref(), Some("Acme Corp"));
}

#[tokio::test]
async fn test_duplicate_application_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let employer = register(&client, &app.address, "hr@x.com", "employer", Some("X")).await;
    let job = create_job(&client, &app.address, &employer.token, "Backend Dev", &[]).await;
    let seeker = register(&client, &app.address, "dev@x.com", "jobseeker", None).await;

    let first = apply(&client, &app.address, &seeker.token, job.job_id).await;
    assert_eq!(first.status(), 200);

    let second = apply(&client, &app.address, &seeker.token, job.job_id).await;
    assert_eq!(second.status(), 400);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["detail"], "Already applied to this job");
}

#[tokio::test]
async fn test_apply_to_missing_job() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let seeker = register(&client, &app.address, "dev@y.com", "jobseeker", None).await;
    let resp = apply(&client, &app.address, &seeker.token, Uuid::new_v4()).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_pagination_and_search() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let employer = register(&client, &app.address, "hr@p.com", "employer", Some("P")).await;
    for title in ["Frontend Dev", "Backend Dev", "Zookeeper"] {
        create_job(&client, &app.address, &employer.token, title, &["kubernetes"]).await;
        // Distinct created_at timestamps keep newest-first ordering stable.
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Page 1 of 2.
    let page: JobPage = client
        .get(format!("{}/api/jobs?page=1&limit=2", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.jobs.len(), 2);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    // Newest first.
    assert_eq!(page.jobs[0].title, "Zookeeper");
    assert_eq!(page.jobs[1].title, "Backend Dev");

    // Page 2 holds the remainder.
    let page: JobPage = client
        .get(format!("{}/api/jobs?page=2&limit=2", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.jobs.len(), 1);
    assert_eq!(page.jobs[0].title, "Frontend Dev");

    // Substring present in exactly one title, case-insensitive.
    let page: JobPage = client
        .get(format!("{}/api/jobs?search=zoo", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.jobs[0].title, "Zookeeper");

    // Skills participate in the OR-match.
    let page: JobPage = client
        .get(format!("{}/api/jobs?search=KUBER", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.total, 3);

    // A miss returns an empty page with total 0.
    let page: JobPage = client
        .get(format!("{}/api/jobs?search=cobol", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(page.jobs.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);

    // The keyword alias behaves identically.
    let page: JobPage = client
        .get(format!("{}/api/jobs/search?keyword=zoo", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.jobs[0].title, "Zookeeper");
}

#[tokio::test]
async fn test_pagination_extreme_values() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let employer = register(&client, &app.address, "hr@e.com", "employer", Some("E")).await;
    create_job(&client, &app.address, &employer.token, "Lone Job", &[]).await;

    // A page number at the i64 ceiling is an empty page, not a failed
    // request.
    let resp = client
        .get(format!(
            "{}/api/jobs?page={}&limit=10",
            app.address,
            i64::MAX
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let page: JobPage = resp.json().await.unwrap();
    assert!(page.jobs.is_empty());
    assert_eq!(page.total, 1);
    assert_eq!(page.total_pages, 1);

    // A limit at the ceiling fits everything on one page; total_pages stays
    // ceil(total/limit).
    let resp = client
        .get(format!(
            "{}/api/jobs?page=1&limit={}",
            app.address,
            i64::MAX
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let page: JobPage = resp.json().await.unwrap();
    assert_eq!(page.jobs.len(), 1);
    assert_eq!(page.total_pages, 1);

    // Zero and negative values clamp up to the defaults.
    let resp = client
        .get(format!("{}/api/jobs?page=0&limit=-5", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let page: JobPage = resp.json().await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.jobs.len(), 1);
}

#[tokio::test]
async fn test_update_job_partial_and_ownership() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let owner = register(&client, &app.address, "own@z.com", "employer", Some("Z")).await;
    let rival = register(&client, &app.address, "rival@z.com", "employer", Some("R")).await;
    let job = create_job(&client, &app.address, &owner.token, "Original Title", &["rust"]).await;

    // A non-owning employer gets the conflated 404, not 403.
    let resp = client
        .put(format!("{}/api/employer/jobs/{}", app.address, job.job_id))
        .bearer_auth(&rival.token)
        .json(&serde_json::json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Owner updates only the title; every other field is untouched.
    let resp = client
        .put(format!("{}/api/employer/jobs/{}", app.address, job.job_id))
        .bearer_auth(&owner.token)
        .json(&serde_json::json!({ "title": "New Title" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Job = resp.json().await.unwrap();
    assert_eq!(updated.title, "New Title");
    assert_eq!(updated.company, job.company);
    assert_eq!(updated.location, job.location);
    assert_eq!(updated.description, job.description);
    assert_eq!(updated.requirements, job.requirements);
    assert_eq!(updated.salary_range, job.salary_range);
    assert_eq!(updated.skills, job.skills);
    assert_eq!(updated.application_deadline, job.application_deadline);
}

#[tokio::test]
async fn test_delete_job_cascades_to_applications() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let employer = register(&client, &app.address, "hr@c.com", "employer", Some("C")).await;
    let job = create_job(&client, &app.address, &employer.token, "Doomed Job", &[]).await;
    let seeker = register(&client, &app.address, "dev@c.com", "jobseeker", None).await;
    assert_eq!(
        apply(&client, &app.address, &seeker.token, job.job_id)
            .await
            .status(),
        200
    );
    assert_eq!(uploads_count(&app), 1);

    let resp = client
        .delete(format!("{}/api/employer/jobs/{}", app.address, job.job_id))
        .bearer_auth(&employer.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // The cascaded application's resume file is gone with it.
    assert_eq!(uploads_count(&app), 0);

    // The job is gone from every view.
    let resp = client
        .get(format!("{}/api/jobs/{}", app.address, job.job_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .get(format!(
            "{}/api/employer/jobs/{}/applications",
            app.address, job.job_id
        ))
        .bearer_auth(&employer.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // The cascade removed the seeker's application too.
    let mine: Vec<ApplicationWithJob> = client
        .get(format!("{}/api/jobseeker/applications", app.address))
        .bearer_auth(&seeker.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_status_update_validation_and_ownership() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let employer = register(&client, &app.address, "hr@s.com", "employer", Some("S")).await;
    let rival = register(&client, &app.address, "rival@s.com", "employer", Some("R")).await;
    let job = create_job(&client, &app.address, &employer.token, "Reviewed Job", &[]).await;
    let seeker = register(&client, &app.address, "dev@s.com", "jobseeker", None).await;
    let application: Application = apply(&client, &app.address, &seeker.token, job.job_id)
        .await
        .json()
        .await
        .unwrap();

    let status_url = format!(
        "{}/api/employer/applications/{}/status",
        app.address, application.application_id
    );

    // A value outside the four-state enum is a 400.
    let resp = client
        .put(&status_url)
        .bearer_auth(&employer.token)
        .json(&serde_json::json!({ "status": "hired" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid status");

    // An employer who does not own the referenced job is a 403.
    let resp = client
        .put(&status_url)
        .bearer_auth(&rival.token)
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // A missing application is a 404.
    let resp = client
        .put(format!(
            "{}/api/employer/applications/{}/status",
            app.address,
            Uuid::new_v4()
        ))
        .bearer_auth(&employer.token)
        .json(&serde_json::json!({ "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Every valid value is reachable, in any order.
    for status in ["waitlisted", "rejected", "approved", "applied"] {
        let resp = client
            .put(&status_url)
            .bearer_auth(&employer.token)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let updated: Application = resp.json().await.unwrap();
        assert_eq!(updated.status.to_string(), status);
    }
}

#[tokio::test]
async fn test_admin_flows() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // The provisioned admin logs in with the fixed credential.
    let resp = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&serde_json::json!({ "email": "admin", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let admin: AuthResponse = resp.json().await.unwrap();

    let employer = register(&client, &app.address, "hr@a.com", "employer", Some("A")).await;
    let job = create_job(&client, &app.address, &employer.token, "Admin Visible", &[]).await;

    // Admin sees every job.
    let jobs: Vec<Job> = client
        .get(format!("{}/api/admin/jobs", app.address))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(jobs.iter().any(|j| j.job_id == job.job_id));

    // Admin deletes a job it does not own.
    let resp = client
        .delete(format!("{}/api/admin/jobs/{}", app.address, job.job_id))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Deleting it again is a plain 404.
    let resp = client
        .delete(format!("{}/api/admin/jobs/{}", app.address, job.job_id))
        .bearer_auth(&admin.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

/// Delegates to an in-memory store but reports every applicant as
/// not-yet-applied, so an apply always passes the advisory pre-check and a
/// repeat lands on the conflict-aware insert, the way a concurrent apply
/// would.
struct PrecheckBlindRepository {
    inner: InMemoryRepository,
}

#[async_trait]
impl Repository for PrecheckBlindRepository {
    async fn create_user(&self, user: User) -> Option<User> {
        self.inner.create_user(user).await
    }
    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.inner.get_user_by_email(email).await
    }
    async fn list_jobs(&self, page: i64, limit: i64, search: Option<String>) -> (Vec<Job>, i64) {
        self.inner.list_jobs(page, limit, search).await
    }
    async fn get_job(&self, job_id: Uuid) -> Option<Job> {
        self.inner.get_job(job_id).await
    }
    async fn get_job_owned(&self, job_id: Uuid, employer_id: Uuid) -> Option<Job> {
        self.inner.get_job_owned(job_id, employer_id).await
    }
    async fn create_job(&self, job: Job) -> Option<Job> {
        self.inner.create_job(job).await
    }
    async fn get_employer_jobs(&self, employer_id: Uuid) -> Vec<Job> {
        self.inner.get_employer_jobs(employer_id).await
    }
    async fn get_all_jobs(&self) -> Vec<Job> {
        self.inner.get_all_jobs().await
    }
    async fn update_job(
        &self,
        job_id: Uuid,
        employer_id: Uuid,
        req: UpdateJobRequest,
    ) -> Option<Job> {
        self.inner.update_job(job_id, employer_id, req).await
    }
    async fn delete_job(&self, job_id: Uuid, employer_id: Uuid) -> Option<Vec<String>> {
        self.inner.delete_job(job_id, employer_id).await
    }
    async fn delete_job_admin(&self, job_id: Uuid) -> Option<Vec<String>> {
        self.inner.delete_job_admin(job_id).await
    }
    async fn has_applied(&self, _job_id: Uuid, _applicant_id: Uuid) -> bool {
        false
    }
    async fn create_application(&self, application: Application) -> Option<Application> {
        self.inner.create_application(application).await
    }
    async fn get_applications_for_job(&self, job_id: Uuid) -> Vec<Application> {
        self.inner.get_applications_for_job(job_id).await
    }
    async fn get_applications_for_applicant(&self, applicant_id: Uuid) -> Vec<ApplicationWithJob> {
        self.inner.get_applications_for_applicant(applicant_id).await
    }
    async fn get_application(&self, application_id: Uuid) -> Option<Application> {
        self.inner.get_application(application_id).await
    }
    async fn set_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Option<Application> {
        self.inner
            .set_application_status(application_id, status)
            .await
    }
}

#[tokio::test]
async fn test_lost_duplicate_race_leaves_no_orphan_resume() {
    let app = spawn_app_with_repo(Arc::new(PrecheckBlindRepository {
        inner: InMemoryRepository::new(),
    }))
    .await;
    let client = reqwest::Client::new();

    let employer = register(&client, &app.address, "hr@r.com", "employer", Some("R")).await;
    let job = create_job(&client, &app.address, &employer.token, "Raced Job", &[]).await;
    let seeker = register(&client, &app.address, "dev@r.com", "jobseeker", None).await;

    let first = apply(&client, &app.address, &seeker.token, job.job_id).await;
    assert_eq!(first.status(), 200);
    assert_eq!(uploads_count(&app), 1);

    // The repeat passes the pre-check, stores its upload, then loses at the
    // uniqueness constraint; the just-stored file must be cleaned up.
    let second = apply(&client, &app.address, &seeker.token, job.job_id).await;
    assert_eq!(second.status(), 400);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["detail"], "Already applied to this job");
    assert_eq!(uploads_count(&app), 1);
}
