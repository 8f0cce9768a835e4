//! Runs one CLI command against a store and renders the result.

use std::fmt::Write;
use std::sync::Arc;

use taskboard_core::notify::drain;
use taskboard_core::types::{BoardId, NewTask, TaskUpdate};
use taskboard_core::{BoardController, BoardDirectory, BoardStore, DropOutcome, Notifier};

use crate::cli::Command;
use crate::render::{render_board, render_boards, render_notice};

/// Text to print and whether the command succeeded.
#[derive(Debug)]
pub struct Report {
    pub text: String,
    pub success: bool,
}

pub async fn execute(store: Arc<dyn BoardStore>, command: Command) -> Report {
    let notifier = Notifier::default();
    let mut rx = notifier.subscribe();
    let mut body = String::new();

    let success = match board_of(&command) {
        Some(board_id) => run_board_command(store, notifier, board_id, command, &mut body).await,
        None => run_directory_command(store, notifier, command, &mut body).await,
    };

    let mut text = String::new();
    for notice in drain(&mut rx) {
        let _ = writeln!(text, "{}", render_notice(&notice));
    }
    text.push_str(&body);
    Report { text, success }
}

async fn run_directory_command(
    store: Arc<dyn BoardStore>,
    notifier: Notifier,
    command: Command,
    body: &mut String,
) -> bool {
    let mut dir = BoardDirectory::new(store, notifier);
    if dir.load().await.is_err() {
        return false;
    }

    let ok = match command {
        Command::ReorderBoards { active, over } => {
            let outcome = dir.reorder(active, over).await;
            drop_succeeded(&outcome, body)
        }
        Command::AddBoard { name } => dir.create(&name).await.is_ok(),
        Command::RenameBoard { board, name } => dir.rename(board, &name).await.is_ok(),
        Command::DeleteBoard { board } => dir.delete(board).await.is_ok(),
        _ => true,
    };

    body.push_str(&render_boards(dir.boards()));
    ok
}

fn board_of(command: &Command) -> Option<BoardId> {
    match command {
        Command::Show { board }
        | Command::Drag { board, .. }
        | Command::AddColumn { board, .. }
        | Command::AddTask { board, .. }
        | Command::EditTask { board, .. }
        | Command::Assign { board, .. }
        | Command::DeleteTask { board, .. } => Some(*board),
        _ => None,
    }
}

async fn run_board_command(
    store: Arc<dyn BoardStore>,
    notifier: Notifier,
    board_id: BoardId,
    command: Command,
    body: &mut String,
) -> bool {
    let mut controller = BoardController::new(store, board_id, notifier);
    if controller.load().await.is_err() {
        return false;
    }

    let ok = match command {
        Command::Show { .. } => true,
        Command::Drag {
            active, over, hover, ..
        } => {
            controller.on_drag_start(active);
            for target in hover {
                controller.on_drag_over(active, Some(target));
            }
            let outcome = controller.on_drag_end(active, over).await;
            drop_succeeded(&outcome, body)
        }
        Command::AddColumn { names, .. } => {
            if names.len() == 1 {
                controller.create_column(&names[0]).await.is_ok()
            } else {
                controller.create_columns(&names).await.is_ok()
            }
        }
        Command::AddTask {
            column,
            name,
            description,
            assignee,
            ..
        } => {
            let task = NewTask {
                name,
                description,
                assigned_user_id: assignee,
            };
            controller.create_task(column, task).await.is_ok()
        }
        Command::EditTask {
            task,
            name,
            description,
            assignee,
            ..
        } => {
            let update = TaskUpdate {
                name,
                description,
                assigned_user_id: assignee,
            };
            controller.update_task(task, update).await.is_ok()
        }
        Command::Assign { task, user, .. } => controller.assign_task(task, user).await.is_ok(),
        Command::DeleteTask { task, .. } => controller.delete_task(task).await.is_ok(),
        _ => true,
    };

    body.push_str(&render_board(controller.cache()));
    ok
}

fn drop_succeeded(outcome: &DropOutcome, body: &mut String) -> bool {
    match outcome {
        DropOutcome::Ignored => {
            body.push_str("(nothing changed)\n");
            true
        }
        DropOutcome::Persisted(_) => true,
        DropOutcome::Reloaded { .. } => false,
    }
}
