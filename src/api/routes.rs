//! API route handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::models::{
    Credentials, LoginRequest, LoginResponse, MessageResponse, ProtectedResponse, RegisterRequest,
};
use crate::auth::{AuthUser, User, UserInfo};
use crate::error::{Error, Result};

/// Longest student name or course title accepted
pub const MAX_NAME_LEN: usize = 80;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// Helpers

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| Error::Validation(format!("Invalid JSON body: {}", e.body_text())))
}

fn path_param<T>(param: std::result::Result<Path<T>, PathRejection>) -> Result<T> {
    param
        .map(|Path(value)| value)
        .map_err(|e| Error::Validation(format!("Invalid path parameter: {}", e.body_text())))
}

fn require_field(field: &str, value: Option<String>) -> Result<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Validation(format!("Field '{}' is required", field)))?;
    if value.chars().count() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "Field '{}' must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(value)
}

/// Run CPU-heavy work (bcrypt) off the async workers
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(format!("Background task failed: {}", e)))?
}

fn current_user(state: &SharedState, auth: AuthUser) -> Result<User> {
    state
        .db
        .find_user_by_id(auth.user_id)?
        .ok_or_else(|| Error::NotFound("User".to_string()))
}

// Public routes

pub async fn index() -> &'static str {
    "gatekeep"
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn register(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let (credentials, email) = json_body(payload)?.validate()?;
    let Credentials { username, password } = credentials;

    if state.db.find_user_by_username(&username)?.is_some() {
        tracing::info!("Registration rejected, username taken: {}", username);
        return Err(Error::UsernameTaken(username));
    }

    let hashed = {
        let state = state.clone();
        blocking(move || state.passwords.hash(&password)).await?
    };

    let user = state
        .db
        .create_user(&username, &hashed, email.as_deref())?;
    tracing::info!("Registered user {} (id {})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Credentials { username, password } = json_body(payload)?.validate()?;

    let user = state.db.find_user_by_username(&username)?;
    let verified = {
        let state = state.clone();
        blocking(move || {
            Ok(match user {
                Some(user) => state.passwords.verify(&password, &user.password).then_some(user),
                None => {
                    state.passwords.verify_dummy(&password);
                    None
                }
            })
        })
        .await?
    };

    let Some(user) = verified else {
        tracing::warn!("Failed login for {}", username);
        return Err(Error::InvalidCredentials);
    };

    let access_token = state.tokens.issue(user.id)?;
    tracing::info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token,
    }))
}

// Protected routes

pub async fn protected(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProtectedResponse>> {
    let user = current_user(&state, auth)?;
    Ok(Json(ProtectedResponse {
        message: "Protected route accessed successfully".to_string(),
        user_id: user.id,
        username: user.username,
    }))
}

pub async fn user_info(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserInfo>> {
    let user = current_user(&state, auth)?;
    Ok(Json(UserInfo::from(user)))
}

pub async fn create_student(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let name = require_field("name", json_body(payload)?.name)?;
    let student = state.db.create_student(&name)?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn list_students(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    Ok(Json(state.db.list_students()?))
}

pub async fn get_student(
    State(state): State<SharedState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let id = path_param(id)?;
    let student = state
        .db
        .get_student(id)?
        .ok_or_else(|| Error::NotFound(format!("Student {}", id)))?;
    Ok(Json(student))
}

pub async fn enroll_student(
    State(state): State<SharedState>,
    ids: std::result::Result<Path<(i64, i64)>, PathRejection>,
) -> Result<impl IntoResponse> {
    let (id, course_id) = path_param(ids)?;
    state.db.enroll(id, course_id)?;
    Ok(Json(MessageResponse::new("Student enrolled")))
}

pub async fn create_course(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let title = require_field("title", json_body(payload)?.title)?;
    let course = state.db.create_course(&title)?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn list_courses(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    Ok(Json(state.db.list_courses()?))
}

pub async fn course_students(
    State(state): State<SharedState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let id = path_param(id)?;
    Ok(Json(state.db.students_in_course(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field() {
        assert_eq!(require_field("name", Some(" Ivan ".to_string())).unwrap(), "Ivan");
        assert!(matches!(require_field("name", None), Err(Error::Validation(_))));
        assert!(matches!(require_field("name", Some("".to_string())), Err(Error::Validation(_))));
        assert!(require_field("name", Some("x".repeat(MAX_NAME_LEN + 1))).is_err());
    }
}
