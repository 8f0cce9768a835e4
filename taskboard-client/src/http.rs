//! `BoardStore` over the REST API, using reqwest.
//!
//! Non-2xx answers are decoded from the `{ "error": ... }` body: 404 becomes
//! `NotFound` for the addressed entity, 400 `Invalid`, anything else
//! `Rejected`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use taskboard_core::types::*;
use taskboard_core::wire::{
    AssignTaskBody, CreateBoardBody, CreateColumnBody, CreateTaskBody, MoveTaskBody,
    RenameBoardBody, ReorderBoardsBody, ReorderColumnsBody,
};
use taskboard_core::{BoardStore, StoreError};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// The entity a request addresses, for 404 mapping.
type Subject = Option<(&'static str, i64)>;

pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, subject: Subject) -> Result<Response, StoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
        };
        log::warn!(target: "taskboard.http", "HTTP {}: {}", status.as_u16(), message);
        Err(match (status.as_u16(), subject) {
            (404, Some((kind, id))) => StoreError::NotFound { kind, id },
            (400, _) => StoreError::Invalid(message),
            _ => StoreError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        subject: Subject,
    ) -> Result<T, StoreError> {
        self.send(request, subject)
            .await?
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn execute(&self, request: RequestBuilder, subject: Subject) -> Result<(), StoreError> {
        self.send(request, subject).await.map(|_| ())
    }
}

#[async_trait]
impl BoardStore for HttpStore {
    async fn list_boards(&self) -> Result<Vec<Board>, StoreError> {
        self.fetch(self.client.get(self.url("/boards")), None).await
    }

    async fn get_board(&self, board_id: BoardId) -> Result<Board, StoreError> {
        let request = self.client.get(self.url(&format!("/boards/{}", board_id)));
        self.fetch(request, Some(("Board", board_id))).await
    }

    async fn create_board(&self, name: &str, position: i64) -> Result<Board, StoreError> {
        let body = CreateBoardBody {
            name: name.to_string(),
            position,
        };
        self.fetch(self.client.post(self.url("/boards")).json(&body), None)
            .await
    }

    async fn rename_board(&self, board_id: BoardId, name: &str) -> Result<Board, StoreError> {
        let body = RenameBoardBody {
            name: name.to_string(),
        };
        let request = self
            .client
            .put(self.url(&format!("/boards/{}", board_id)))
            .json(&body);
        self.fetch(request, Some(("Board", board_id))).await
    }

    async fn delete_board(&self, board_id: BoardId) -> Result<(), StoreError> {
        let request = self.client.delete(self.url(&format!("/boards/{}", board_id)));
        self.execute(request, Some(("Board", board_id))).await
    }

    async fn reorder_boards(&self, board_ids: &[BoardId]) -> Result<(), StoreError> {
        let body = ReorderBoardsBody {
            board_ids: board_ids.to_vec(),
        };
        self.execute(self.client.put(self.url("/boards/reorder")).json(&body), None)
            .await
    }

    async fn list_columns(&self, board_id: BoardId) -> Result<Vec<BoardColumn>, StoreError> {
        let request = self
            .client
            .get(self.url(&format!("/boards/{}/columns", board_id)));
        self.fetch(request, Some(("Board", board_id))).await
    }

    async fn create_column(
        &self,
        board_id: BoardId,
        name: &str,
        position: i64,
    ) -> Result<BoardColumn, StoreError> {
        let body = CreateColumnBody {
            name: name.to_string(),
            position,
        };
        let request = self
            .client
            .post(self.url(&format!("/boards/{}/columns", board_id)))
            .json(&body);
        self.fetch(request, Some(("Board", board_id))).await
    }

    async fn reorder_columns(&self, items: &[PositionItem]) -> Result<(), StoreError> {
        let body = ReorderColumnsBody {
            items: items.to_vec(),
        };
        self.execute(self.client.put(self.url("/columns/reorder")).json(&body), None)
            .await
    }

    async fn list_tasks(&self, column_id: ColumnId) -> Result<Vec<Task>, StoreError> {
        let request = self
            .client
            .get(self.url(&format!("/columns/{}/tasks", column_id)));
        self.fetch(request, Some(("Column", column_id))).await
    }

    async fn create_task(
        &self,
        column_id: ColumnId,
        task: &NewTask,
        position: i64,
    ) -> Result<Task, StoreError> {
        let body = CreateTaskBody {
            task: task.clone(),
            position,
        };
        let request = self
            .client
            .post(self.url(&format!("/columns/{}/tasks", column_id)))
            .json(&body);
        self.fetch(request, Some(("Column", column_id))).await
    }

    async fn update_task(&self, task_id: TaskId, update: &TaskUpdate) -> Result<Task, StoreError> {
        let request = self
            .client
            .put(self.url(&format!("/tasks/{}", task_id)))
            .json(update);
        self.fetch(request, Some(("Task", task_id))).await
    }

    async fn assign_task(
        &self,
        task_id: TaskId,
        user_id: Option<UserId>,
    ) -> Result<Task, StoreError> {
        let body = AssignTaskBody {
            assigned_user_id: user_id,
        };
        let request = self
            .client
            .put(self.url(&format!("/tasks/{}/assign", task_id)))
            .json(&body);
        self.fetch(request, Some(("Task", task_id))).await
    }

    async fn move_task(&self, task_id: TaskId, target: MoveTaskBody) -> Result<(), StoreError> {
        let request = self
            .client
            .put(self.url(&format!("/tasks/{}/move", task_id)))
            .json(&target);
        self.execute(request, Some(("Task", task_id))).await
    }

    async fn delete_task(&self, task_id: TaskId) -> Result<(), StoreError> {
        let request = self.client.delete(self.url(&format!("/tasks/{}", task_id)));
        self.execute(request, Some(("Task", task_id))).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.fetch(self.client.get(self.url("/users/all")), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_and_token_normalized() {
        let store = HttpStore::new(
            "http://localhost:8080/",
            Some("  ".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(store.base_url(), "http://localhost:8080");
        assert_eq!(store.url("/boards"), "http://localhost:8080/boards");
        assert!(store.token.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let store = HttpStore::new("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
        assert!(matches!(
            store.list_boards().await,
            Err(StoreError::Transport(_))
        ));
    }
}
