//! The in-memory to-do board.
//!
//! Tasks live only for the session; they are never persisted. The board
//! keeps two lists: incomplete tasks in the order they were added, and
//! completed tasks in the order they were finished.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The maximum number of characters in a task's text.
pub const TASK_TEXT_LIMIT: usize = 100;

/// The maximum number of characters in a task's description.
pub const TASK_DESCRIPTION_LIMIT: usize = 200;

/// The maximum number of incomplete tasks on the board.
pub const TASK_COUNT_LIMIT: usize = 50;

/// A validated, non-empty task text of at most [TASK_TEXT_LIMIT] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskText(String);

impl TaskText {
    /// Create a task text.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTaskText] if `text` is empty or whitespace,
    /// - [Error::TaskTextTooLong] if `text` is longer than
    ///   [TASK_TEXT_LIMIT] characters.
    pub fn new(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        if text.is_empty() {
            return Err(Error::EmptyTaskText);
        }

        if text.chars().count() > TASK_TEXT_LIMIT {
            return Err(Error::TaskTextTooLong);
        }

        Ok(Self(text.to_string()))
    }
}

impl AsRef<str> for TaskText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TaskText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated task description of at most [TASK_DESCRIPTION_LIMIT]
/// characters. May be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Create a task description.
    ///
    /// # Errors
    /// This function will return an [Error::TaskDescriptionTooLong] if
    /// `description` is longer than [TASK_DESCRIPTION_LIMIT] characters.
    pub fn new(description: &str) -> Result<Self, Error> {
        if description.chars().count() > TASK_DESCRIPTION_LIMIT {
            return Err(Error::TaskDescriptionTooLong);
        }

        Ok(Self(description.to_string()))
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single to-do item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// The task text shown in the list.
    pub text: TaskText,
    /// An optional longer description.
    pub description: TaskDescription,
}

/// The session's to-do board: incomplete tasks and the ones already done.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskBoard {
    incomplete: Vec<Task>,
    completed: Vec<Task>,
}

impl TaskBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The incomplete tasks in the order they were added.
    pub fn incomplete(&self) -> &[Task] {
        &self.incomplete
    }

    /// The completed tasks in the order they were finished.
    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    /// Add a task to the end of the incomplete list.
    ///
    /// # Errors
    /// This function will return an [Error::TaskLimitReached] if the board
    /// already holds [TASK_COUNT_LIMIT] incomplete tasks.
    pub fn add(&mut self, text: TaskText) -> Result<(), Error> {
        if self.incomplete.len() >= TASK_COUNT_LIMIT {
            return Err(Error::TaskLimitReached);
        }

        self.incomplete.push(Task {
            text,
            description: TaskDescription::default(),
        });

        Ok(())
    }

    /// Set the description of the incomplete task at `index`.
    ///
    /// # Errors
    /// This function will return an [Error::TaskNotFound] if `index` does not
    /// refer to an incomplete task.
    pub fn set_description(
        &mut self,
        index: usize,
        description: TaskDescription,
    ) -> Result<(), Error> {
        let task = self
            .incomplete
            .get_mut(index)
            .ok_or(Error::TaskNotFound(index))?;
        task.description = description;

        Ok(())
    }

    /// Move the incomplete task at `index` to the completed list.
    ///
    /// # Errors
    /// This function will return an [Error::TaskNotFound] if `index` does not
    /// refer to an incomplete task.
    pub fn complete(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.incomplete.len() {
            return Err(Error::TaskNotFound(index));
        }

        let task = self.incomplete.remove(index);
        self.completed.push(task);

        Ok(())
    }

    /// Remove the completed task at `index`.
    ///
    /// # Errors
    /// This function will return an [Error::TaskNotFound] if `index` does not
    /// refer to a completed task.
    pub fn delete_completed(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.completed.len() {
            return Err(Error::TaskNotFound(index));
        }

        self.completed.remove(index);

        Ok(())
    }
}


#[cfg(test)]
mod task_board_tests {
    use crate::Error;

    use super::{TASK_COUNT_LIMIT, TaskBoard, TaskDescription, TaskText};

    fn text(s: &str) -> TaskText {
        TaskText::new(s).expect("Could not create task text")
    }

    #[test]
    fn add_appends_to_the_incomplete_list() {
        let mut board = TaskBoard::new();

        board.add(text("Buy milk")).expect("Could not add task");
        board.add(text("Pay rent")).expect("Could not add task");

        assert_eq!(board.incomplete().len(), 2);
        assert_eq!(board.incomplete()[0].text, text("Buy milk"));
        assert!(board.completed().is_empty());
    }

    #[test]
    fn add_fails_once_the_board_is_full() {
        let mut board = TaskBoard::new();
        for i in 0..TASK_COUNT_LIMIT {
            board
                .add(text(&format!("task {i}")))
                .expect("Could not add task");
        }

        let result = board.add(text("one too many"));

        assert_eq!(result, Err(Error::TaskLimitReached));
    }

    #[test]
    fn complete_moves_the_task_to_the_completed_list() {
        let mut board = TaskBoard::new();
        board.add(text("Buy milk")).expect("Could not add task");
        board.add(text("Pay rent")).expect("Could not add task");

        board.complete(0).expect("Could not complete task");

        assert_eq!(board.incomplete().len(), 1);
        assert_eq!(board.incomplete()[0].text, text("Pay rent"));
        assert_eq!(board.completed().len(), 1);
        assert_eq!(board.completed()[0].text, text("Buy milk"));
    }

    #[test]
    fn complete_with_invalid_index_returns_task_not_found() {
        let mut board = TaskBoard::new();

        assert_eq!(board.complete(0), Err(Error::TaskNotFound(0)));
    }

    #[test]
    fn set_description_updates_the_task() {
        let mut board = TaskBoard::new();
        board.add(text("Buy milk")).expect("Could not add task");
        let description =
            TaskDescription::new("Oat milk if they have it").expect("Could not create description");

        board
            .set_description(0, description.clone())
            .expect("Could not set description");

        assert_eq!(board.incomplete()[0].description, description);
    }

    #[test]
    fn delete_completed_removes_the_task() {
        let mut board = TaskBoard::new();
        board.add(text("Buy milk")).expect("Could not add task");
        board.complete(0).expect("Could not complete task");

        board
            .delete_completed(0)
            .expect("Could not delete completed task");

        assert!(board.completed().is_empty());
    }
}
