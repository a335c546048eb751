//! Admin authentication: credential login, bearer-token sessions, and the
//! middleware gate in front of every back-office route.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::error::ApiError;
use crate::config::AuthConfig;
use crate::db::{Admin, AdminResponse, DbPool, LoginRequest, LoginResponse, Session};
use crate::AppState;

#[derive(Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub data: AdminResponse,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random bearer token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the bearer token from request headers
fn extract_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Create the bootstrap admin when the admins table is empty.
pub async fn ensure_admin_user(db: &DbPool, auth: &AuthConfig) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
        .fetch_one(db)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    let id = uuid::Uuid::new_v4().to_string();
    let password_hash = hash_password(&auth.admin_password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO admins (id, username, password_hash, name, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&auth.admin_username)
    .bind(&password_hash)
    .bind(&auth.admin_name)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    tracing::info!(
        username = %auth.admin_username,
        "Created bootstrap admin user; change the configured password after first login"
    );
    Ok(())
}

/// Login endpoint
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let admin: Option<Admin> = sqlx::query_as("SELECT * FROM admins WHERE username = ?")
        .bind(&request.username)
        .fetch_optional(&state.db)
        .await?;

    let admin = admin.ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&request.password, &admin.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = generate_token();
    let token_hash = hash_token(&token);
    let session_id = uuid::Uuid::new_v4().to_string();
    let ttl = format!("+{} days", state.config.auth.session_ttl_days);

    sqlx::query(
        "INSERT INTO sessions (id, admin_id, token_hash, expires_at) VALUES (?, ?, ?, datetime('now', ?))",
    )
    .bind(&session_id)
    .bind(&admin.id)
    .bind(&token_hash)
    .bind(&ttl)
    .execute(&state.db)
    .await?;

    tracing::info!(username = %admin.username, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
        admin: AdminResponse::from(admin),
    }))
}

/// Validate token endpoint, used by the SPA to check a stored session
///
/// GET /api/auth/validate
pub async fn validate(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> impl IntoResponse {
    let token = match extract_token(request.headers()) {
        Some(token) => token,
        None => return StatusCode::UNAUTHORIZED,
    };

    let token_hash = hash_token(&token);
    let session: Option<Session> = sqlx::query_as(
        "SELECT * FROM sessions WHERE token_hash = ? AND expires_at > datetime('now')",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await
    .ok()
    .flatten();

    match session {
        Some(_) => StatusCode::OK,
        None => StatusCode::UNAUTHORIZED,
    }
}

/// Current admin endpoint
///
/// GET /api/auth/me
pub async fn me(admin: Admin) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        data: AdminResponse::from(admin),
    })
}

/// Logout endpoint, revokes the presented session
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let token_hash = hash_token(&token);
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(&token_hash)
        .execute(&state.db)
        .await?;

    Ok(Json(LogoutResponse {
        success: true,
        message: "Logged out".to_string(),
    }))
}

/// Auth middleware guarding admin routes. Rejection happens before any
/// request validation or storage access in the handler.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let token_hash = hash_token(&token);
    let session: Option<Session> = sqlx::query_as(
        "SELECT * FROM sessions WHERE token_hash = ? AND expires_at > datetime('now')",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await?;

    match session {
        Some(_) => Ok(next.run(request).await),
        None => Err(ApiError::unauthorized("Invalid or expired session")),
    }
}

/// Look up the admin owning a session token
pub async fn get_current_admin(pool: &DbPool, token: &str) -> Result<Admin, ApiError> {
    let token_hash = hash_token(token);
    let session: Option<Session> = sqlx::query_as(
        "SELECT * FROM sessions WHERE token_hash = ? AND expires_at > datetime('now')",
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    let session = session.ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    let admin: Option<Admin> = sqlx::query_as("SELECT * FROM admins WHERE id = ?")
        .bind(&session.admin_id)
        .fetch_optional(pool)
        .await?;

    admin.ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))
}

/// Extractor for getting the current authenticated admin from a request
#[async_trait]
impl FromRequestParts<Arc<AppState>> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
        get_current_admin(&state.db, &token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_generate_token_is_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("token"), hash_token("token"));
        assert_ne!(hash_token("token"), hash_token("token2"));
    }
}
