use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

// 1. StorageService Contract
/// StorageService
///
/// The abstract contract for resume file persistence. Handlers hand over the
/// uploaded bytes and get back the generated filename; the concrete backend
/// (local disk in production, the mock in failure-path tests) is swappable
/// without touching the handlers.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the uploads directory if it does not exist. Safe to call at
    /// every startup.
    async fn ensure_uploads_dir(&self);

    /// Persists a resume as a whole buffer under a collision-resistant
    /// generated name (`{uuid}_{original}`), preserving the original
    /// filename for later retrieval and display. Returns the stored name.
    async fn store_resume(&self, original_filename: &str, bytes: &[u8]) -> Result<String, String>;

    /// Best-effort removal of a previously stored resume, used when the
    /// referencing application row is gone (lost insert race, cascade
    /// delete). A missing file is not an error.
    async fn remove_resume(&self, stored_name: &str);
}

/// StorageState
///
/// The concrete type used to share the storage service across the
/// application state.
pub type StorageState = Arc<dyn StorageService>;

/// sanitize_filename
///
/// Strips path separators and traversal components from a client-supplied
/// filename so the stored name can never escape the uploads directory.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

// 2. The Real Implementation (Local Disk)
/// LocalStorageService
///
/// Writes resumes into the configured uploads directory, which the router
/// also serves statically under `/uploads`. The random filename prefix makes
/// concurrent uploads collision-free by construction.
#[derive(Clone)]
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn ensure_uploads_dir(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            tracing::error!("failed to create uploads dir {:?}: {:?}", self.root, e);
        }
    }

    async fn store_resume(&self, original_filename: &str, bytes: &[u8]) -> Result<String, String> {
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_filename));
        let path = self.root.join(&stored_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| format!("failed to write resume {:?}: {}", path, e))?;

        Ok(stored_name)
    }

    async fn remove_resume(&self, stored_name: &str) {
        // Stored names are generated by store_resume and never contain path
        // separators, but a sanitize pass keeps a bad name inside the root.
        let path = self.root.join(sanitize_filename(stored_name));
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to remove resume {:?}: {:?}", path, e);
            }
        }
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockStorageService
///
/// A mock `StorageService` used for testing handler behavior without
/// touching the filesystem, including the simulated-failure path.
#[derive(Clone)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_uploads_dir(&self) {
        // No-op in mock environment.
    }

    async fn store_resume(&self, original_filename: &str, _bytes: &[u8]) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        Ok(format!(
            "{}_{}",
            Uuid::new_v4(),
            sanitize_filename(original_filename)
        ))
    }

    async fn remove_resume(&self, _stored_name: &str) {
        // No-op in mock environment.
    }
}
