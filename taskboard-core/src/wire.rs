//! Request bodies shared between the REST backend and the HTTP client.
//!
//! Routes and payloads:
//!   POST /boards                      CreateBoardBody
//!   PUT  /boards/{id}                 RenameBoardBody
//!   PUT  /boards/reorder              ReorderBoardsBody
//!   POST /boards/{id}/columns         CreateColumnBody
//!   PUT  /columns/reorder             ReorderColumnsBody
//!   POST /columns/{id}/tasks          CreateTaskBody
//!   PUT  /tasks/{id}                  UpdateTaskBody (= TaskUpdate)
//!   PUT  /tasks/{id}/assign           AssignTaskBody
//!   PUT  /tasks/{id}/move             MoveTaskBody

use serde::{Deserialize, Serialize};

use crate::types::{BoardId, ColumnId, NewTask, PositionItem, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoardBody {
    pub name: String,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameBoardBody {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBoardsBody {
    pub board_ids: Vec<BoardId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateColumnBody {
    pub name: String,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderColumnsBody {
    pub items: Vec<PositionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    #[serde(flatten)]
    pub task: NewTask,
    #[serde(default)]
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskBody {
    #[serde(default)]
    pub assigned_user_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskBody {
    pub board_column_id: ColumnId,
    pub position: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_body_shape() {
        let body = MoveTaskBody {
            board_column_id: 5,
            position: 0,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"boardColumnId":5,"position":0}"#
        );
    }

    #[test]
    fn test_create_task_body_is_flat() {
        let body = CreateTaskBody {
            task: NewTask {
                name: "Ship".to_string(),
                description: "v1".to_string(),
                assigned_user_id: None,
            },
            position: 3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["name"], "Ship");
        assert_eq!(json["description"], "v1");
        assert_eq!(json["position"], 3);
        assert!(json.get("assignedUserId").is_none());
    }

    #[test]
    fn test_reorder_boards_body_field_name() {
        let body: ReorderBoardsBody = serde_json::from_str(r#"{"boardIds":[3,1,2]}"#).unwrap();
        assert_eq!(body.board_ids, vec![3, 1, 2]);
    }
}
