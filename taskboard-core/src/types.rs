use serde::{Deserialize, Serialize};

pub type BoardId = i64;
pub type ColumnId = i64;
pub type TaskId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A column of a board. Positions are zero-based and dense within the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub id: ColumnId,
    pub name: String,
    pub position: i64,
}

/// A task inside one column. Positions are zero-based and dense within the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub position: i64,
    pub board_column_id: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
}

impl User {
    /// Name and last name joined, as shown next to an assigned task.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.trim().is_empty() => format!("{} {}", self.name, last),
            _ => self.name.clone(),
        }
    }
}

/// One `{id, position}` pair of a batched reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionItem {
    pub id: ColumnId,
    pub position: i64,
}

/// Fields of a task about to be created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<UserId>,
}

/// Editable fields of an existing task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<UserId>,
}

/// True when a user-supplied name is empty after trimming.
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_uses_camel_case_fields() {
        let task = Task {
            id: 7,
            name: "Write docs".to_string(),
            description: None,
            position: 2,
            board_column_id: 3,
            assigned_user_id: Some(9),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["boardColumnId"], 3);
        assert_eq!(json["assignedUserId"], 9);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_task_parses_without_optional_fields() {
        let task: Task = serde_json::from_str(
            r#"{"id":1,"name":"a","position":0,"boardColumnId":4}"#,
        )
        .unwrap();
        assert_eq!(task.board_column_id, 4);
        assert!(task.assigned_user_id.is_none());
    }

    #[test]
    fn test_display_name() {
        let mut user = User {
            id: 1,
            name: "Ana".to_string(),
            last_name: Some("Ruiz".to_string()),
            email: "ana@example.com".to_string(),
        };
        assert_eq!(user.display_name(), "Ana Ruiz");
        user.last_name = Some("  ".to_string());
        assert_eq!(user.display_name(), "Ana");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank("   "));
        assert!(!is_blank(" x "));
    }
}
