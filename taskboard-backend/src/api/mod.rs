use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use taskboard_core::StoreError;

mod boards;
mod columns;
mod events;
mod tasks;
mod users;

use crate::state::AppState;

/// Axum REST API routes.
///
///   GET    /boards                       -> list boards
///   POST   /boards                       -> create board
///   PUT    /boards/reorder               -> persist board order
///   GET    /boards/{boardId}             -> load board
///   PUT    /boards/{boardId}             -> rename board
///   DELETE /boards/{boardId}             -> delete board (cascades)
///   GET    /boards/{boardId}/columns     -> list columns
///   POST   /boards/{boardId}/columns     -> create column
///   PUT    /columns/reorder              -> batch column positions
///   GET    /columns/{columnId}/tasks     -> list tasks
///   POST   /columns/{columnId}/tasks     -> create task
///   PUT    /tasks/{taskId}               -> update task
///   PUT    /tasks/{taskId}/assign        -> set or clear assignee
///   PUT    /tasks/{taskId}/move          -> move/reorder task
///   DELETE /tasks/{taskId}               -> delete task
///   GET    /users/all                    -> assignable users
///   GET    /events                       -> SSE stream of store events
///   GET    /status                       -> health check
///   GET    /logs                         -> recent log entries
///   GET    /logs/stream                  -> SSE stream of log entries
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/boards", get(boards::list_boards).post(boards::create_board))
        .route("/boards/reorder", put(boards::reorder_boards))
        .route(
            "/boards/{board_id}",
            get(boards::get_board)
                .put(boards::rename_board)
                .delete(boards::delete_board),
        )
        .route(
            "/boards/{board_id}/columns",
            get(columns::list_columns).post(columns::create_column),
        )
        .route("/columns/reorder", put(columns::reorder_columns))
        .route(
            "/columns/{column_id}/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/tasks/{task_id}",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/tasks/{task_id}/assign", put(tasks::assign_task))
        .route("/tasks/{task_id}/move", put(tasks::move_task))
        .route("/users/all", get(users::list_users))
        .route("/events", get(events::sse_events))
        .route("/status", get(events::status))
        .route("/logs", get(events::list_logs))
        .route("/logs/stream", get(events::stream_logs))
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<T, ApiError>;

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

fn status_of(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        StoreError::Rejected { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        StoreError::Transport(_) | StoreError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a store failure to its HTTP answer, logging it under `target`.
fn store_error(target: &'static str, error: StoreError) -> ApiError {
    let status = status_of(&error);
    let error = error.to_string();
    log_api_issue(status, target, &error);
    (status, Json(ErrorResponse { error }))
}

/// JSON request body whose rejections answer with an `ErrorResponse`
/// instead of axum's plain-text body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_error(rejection)),
        }
    }
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    let status = rejection.status();
    let error = rejection.body_text();
    log_api_issue(status, "taskboard.api.body", &error);
    (status, Json(ErrorResponse { error }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(&StoreError::task(3)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(&StoreError::Invalid("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&StoreError::Rejected {
                status: 409,
                message: "conflict".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&StoreError::Transport("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_carries_message() {
        let (status, Json(body)) = store_error("taskboard.api.test", StoreError::board(9));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Board not found: 9");
    }
}
