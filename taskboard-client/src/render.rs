//! Plain-text rendering of boards and notices for the terminal.

use std::fmt::Write;

use taskboard_core::types::Board;
use taskboard_core::{BoardCache, Notice, NoticeLevel};

/// Board list, one line per board in display order.
pub fn render_boards(boards: &[Board]) -> String {
    if boards.is_empty() {
        return "(no boards)\n".to_string();
    }
    let mut out = String::new();
    for board in boards {
        let _ = writeln!(out, "[{}] {}", board.id, board.name);
    }
    out
}

/// Columns in position order with their tasks.
///
/// ```text
/// Sprint
///   [2] Todo
///       #5 Write docs  @Ana
///   [3] Doing
///       (empty)
/// ```
pub fn render_board(cache: &BoardCache) -> String {
    let mut out = String::new();
    let title = cache.board().map(|b| b.name.as_str()).unwrap_or("(board)");
    let _ = writeln!(out, "{}", title);

    for column in cache.sorted_columns() {
        let _ = writeln!(out, "  [{}] {}", column.id, column.name);
        let tasks = cache.tasks(column.id);
        if tasks.is_empty() {
            let _ = writeln!(out, "      (empty)");
        }
        for task in tasks {
            let _ = write!(out, "      #{} {}", task.id, task.name);
            if let Some(user) = task.assigned_user_id.and_then(|id| cache.user(id)) {
                let _ = write!(out, "  @{}", user.display_name());
            }
            out.push('\n');
        }
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warn",
        NoticeLevel::Error => "error",
    };
    format!("{}: {}", tag, notice.message)
}
