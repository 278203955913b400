use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::extract::Json;
use crate::middleware::auth::{issue_token, AuthUser};
use crate::validation::required;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    token: String,
    expires_in: u64,
    user: UserProfile,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    username: String,
    role: String,
}

/// `ADMIN_PASSWORD` may hold either an argon2 PHC string or the plain password.
fn password_matches(expected: &str, candidate: &str) -> bool {
    match PasswordHash::new(expected) {
        Ok(hash) => Argon2::default()
            .verify_password(candidate.as_bytes(), &hash)
            .is_ok(),
        Err(_) => expected == candidate,
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(config): State<Arc<Config>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = required("username", payload.username.as_deref())?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("password is required".to_string()))?;

    if username != config.admin_username || !password_matches(&config.admin_password, &password) {
        tracing::warn!(%username, "login rejected");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let (token, expires_in) = issue_token(&config, &username)?;
    tracing::info!(%username, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        expires_in,
        user: UserProfile {
            username,
            role: crate::middleware::auth::ADMIN_ROLE.to_string(),
        },
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current session user", body = UserProfile),
        (status = 401, description = "Unauthorized - Invalid or missing token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<UserProfile> {
    Json(UserProfile {
        username: user.username,
        role: user.role,
    })
}
