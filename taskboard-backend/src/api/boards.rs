use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use taskboard_core::types::{Board, BoardId};
use taskboard_core::wire::{CreateBoardBody, RenameBoardBody, ReorderBoardsBody};
use taskboard_core::BoardStore;

use super::{store_error, ApiResult, JsonBody};
use crate::state::AppState;

pub async fn list_boards(State(state): State<AppState>) -> ApiResult<Json<Vec<Board>>> {
    state
        .store
        .list_boards()
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.list_boards", e))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<Json<Board>> {
    state
        .store
        .get_board(board_id)
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.get_board", e))
}

pub async fn create_board(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateBoardBody>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let board = state
        .store
        .create_board(&body.name, body.position)
        .await
        .map_err(|e| store_error("taskboard.api.create_board", e))?;
    log::info!(target: "taskboard.api.create_board", "Created board {} ({})", board.id, board.name);
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn rename_board(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
    JsonBody(body): JsonBody<RenameBoardBody>,
) -> ApiResult<Json<Board>> {
    state
        .store
        .rename_board(board_id, &body.name)
        .await
        .map(Json)
        .map_err(|e| store_error("taskboard.api.rename_board", e))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_board(board_id)
        .await
        .map_err(|e| store_error("taskboard.api.delete_board", e))?;
    log::info!(target: "taskboard.api.delete_board", "Deleted board {}", board_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_boards(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ReorderBoardsBody>,
) -> ApiResult<StatusCode> {
    state
        .store
        .reorder_boards(&body.board_ids)
        .await
        .map_err(|e| store_error("taskboard.api.reorder_boards", e))?;
    Ok(StatusCode::NO_CONTENT)
}
