use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::ApiError,
    models::{Role, User},
    repository::RepositoryState,
};

/// Fixed lifetime of every issued token. Tokens are self-contained and
/// stateless: there is no server-side session store and no revocation list,
/// so a token remains valid until this expiry regardless of later account
/// changes.
pub const TOKEN_EXPIRATION_HOURS: i64 = 24;

/// Well-known identifier/secret of the provisioned admin account. A static
/// default credential is a known weakness of the reference behavior and is
/// preserved as-is.
pub const ADMIN_EMAIL: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

// --- Password Hashing ---

/// Produces a salted bcrypt hash; plaintext is never stored or compared.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("bcrypt hash error: {:?}", e);
        ApiError::internal("password hashing failed")
    })
}

/// Recomputes and compares against the stored hash. A malformed stored hash
/// is treated as a mismatch rather than surfaced to the caller.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

// --- Token Issuer / Verifier ---

/// Claims
///
/// The payload embedded in every session token. The identity and role travel
/// inside the token itself; verification never consults the database.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's UUID.
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    /// Issued At (iat): timestamp when the token was created.
    pub iat: usize,
    /// Expiration Time (exp): absolute timestamp after which the token must
    /// not be accepted.
    pub exp: usize,
}

/// Signs a session token for the given user with a fixed 24-hour expiry.
pub fn issue_token(user: &User, secret: &str) -> Result<String, ApiError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.user_id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::hours(TOKEN_EXPIRATION_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("token issue error: {:?}", e);
        ApiError::internal("token issuance failed")
    })
}

// --- Authenticated Identity Extractor ---

/// AuthUser
///
/// The resolved identity of an authenticated request. Produced by the
/// extractor below; handlers take it as an argument and pass it through
/// `require_role` before touching any resource.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any protected handler. The flow is:
/// 1. Bearer token extraction from the Authorization header.
/// 2. Signature and expiry validation against the configured secret.
///
/// There is deliberately no database lookup here: the token is the sole
/// source of identity until it expires (see `TOKEN_EXPIRATION_HOURS`).
///
/// Rejection: 401 Unauthenticated on any failure (missing header, malformed
/// token, bad signature, expired).
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthenticated("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthenticated("Invalid authorization header"))?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::default();
        validation.validate_exp = true;

        // Expired and malformed/forged tokens are indistinguishable to the
        // caller; both reject as 401.
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| ApiError::unauthenticated("Invalid or expired token"))?;

        Ok(AuthUser {
            id: token_data.claims.sub,
            email: token_data.claims.email,
            role: token_data.claims.role,
        })
    }
}

/// require_role
///
/// The authorization gate: a pure predicate admitting the identity only if
/// its role is in the endpoint's allowed set. 403 otherwise.
pub fn require_role(user: &AuthUser, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Insufficient permissions"))
    }
}

// --- Admin Provisioning ---

/// init_admin
///
/// One-time admin provisioning at process start, guarded by "does an admin
/// record already exist". Never re-creates or overwrites.
pub async fn init_admin(repo: &RepositoryState) -> Result<(), ApiError> {
    if repo.get_user_by_email(ADMIN_EMAIL).await.is_some() {
        return Ok(());
    }

    let admin = User {
        user_id: Uuid::new_v4(),
        email: ADMIN_EMAIL.to_string(),
        password_hash: hash_password(ADMIN_PASSWORD)?,
        role: Role::Admin,
        full_name: "Administrator".to_string(),
        company: None,
        created_at: chrono::Utc::now(),
    };

    repo.create_user(admin)
        .await
        .ok_or_else(|| ApiError::internal("failed to provision admin user"))?;

    tracing::info!("Admin user created");
    Ok(())
}
