//! User routes - create, read-one, read-all

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{ServerError, ServerResult};
use crate::models::{CreateUserRequest, User};
use crate::store::SharedStore;

/// POST /users - Create a user
pub async fn create_user(
    State(store): State<SharedStore>,
    Json(req): Json<CreateUserRequest>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let new = req
        .validate()
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let user = store.insert(&new)?;
    tracing::info!(id = user.id, name = %user.name, "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/{id} - Fetch a single user
pub async fn get_user(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> ServerResult<Json<User>> {
    let user = store
        .get(id)?
        .ok_or_else(|| ServerError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user))
}

/// GET /users - List all users
pub async fn list_users(State(store): State<SharedStore>) -> ServerResult<Json<Vec<User>>> {
    let users = store.list()?;
    Ok(Json(users))
}
