use axum::{extract::State, response::Json};
use taskboard_core::types::User;
use taskboard_core::BoardStore;

use super::{store_error, ApiResult};
use crate::state::AppState;

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    state
        .store
        .list_users()
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.list_users", e))
}
