//! Command-line structure, defined with clap's derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskboard_core::types::{BoardId, ColumnId, TaskId, UserId};
use taskboard_core::DragTarget;

/// Terminal client for a taskboard REST backend.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/taskboard/client.json)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List boards
    Boards,

    /// Drop board ACTIVE onto board OVER
    ReorderBoards { active: BoardId, over: BoardId },

    /// Create a board at the end of the list
    AddBoard { name: String },

    RenameBoard { board: BoardId, name: String },

    /// Delete a board with all its columns and tasks
    DeleteBoard { board: BoardId },

    /// Print a board
    Show { board: BoardId },

    /// Drag ACTIVE and release it on OVER (ids like task-4, column-2, column-2-droppable).
    /// Without OVER the drag is cancelled.
    Drag {
        board: BoardId,
        active: DragTarget,
        over: Option<DragTarget>,

        /// Targets hovered before the release, in order
        #[arg(long = "hover", value_name = "ID")]
        hover: Vec<DragTarget>,
    },

    /// Add one or more columns at the end of a board
    AddColumn {
        board: BoardId,
        #[arg(required = true)]
        names: Vec<String>,
    },

    AddTask {
        board: BoardId,
        column: ColumnId,
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        assignee: Option<UserId>,
    },

    /// Replace name, description and assignee of a task
    EditTask {
        board: BoardId,
        task: TaskId,
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        assignee: Option<UserId>,
    },

    /// Assign a task; without USER the assignment is cleared
    Assign {
        board: BoardId,
        task: TaskId,
        user: Option<UserId>,
    },

    DeleteTask { board: BoardId, task: TaskId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drag_with_hover() {
        let cli = Cli::parse_from([
            "taskboard", "drag", "1", "task-4", "task-4", "--hover", "task-9", "--hover",
            "column-3-droppable",
        ]);
        match cli.command {
            Command::Drag {
                board,
                active,
                over,
                hover,
            } => {
                assert_eq!(board, 1);
                assert_eq!(active, DragTarget::Task(4));
                assert_eq!(over, Some(DragTarget::Task(4)));
                assert_eq!(
                    hover,
                    vec![DragTarget::Task(9), DragTarget::ColumnDropZone(3)]
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_drag_id() {
        assert!(Cli::try_parse_from(["taskboard", "drag", "1", "card-4"]).is_err());
    }

    #[test]
    fn test_global_url_override() {
        let cli = Cli::parse_from(["taskboard", "boards", "--url", "http://h:1"]);
        assert_eq!(cli.url.as_deref(), Some("http://h:1"));
        assert!(matches!(cli.command, Command::Boards));
    }
}
