/// Router Module Index
///
/// Organizes the routing surface into access-level modules. Access control is
/// applied explicitly at the module level: the protected routers carry the
/// authentication middleware layer, and every protected handler then checks
/// its allowed-role set before touching a resource.
///
/// The four modules map directly to the roles in the API contract.

/// Routes accessible to all clients: health, register/login, public job
/// browsing and search.
pub mod public;

/// Routes for authenticated jobseekers: applying to jobs and listing their
/// own applications.
pub mod jobseeker;

/// Routes for authenticated employers, nested under /employer: job CRUD and
/// application review.
pub mod employer;

/// Routes restricted to the admin role, nested under /admin.
pub mod admin;
