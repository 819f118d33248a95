//! Task data structure and related functionality.
//!
//! This module defines the `Task` record, the single persisted entity of the
//! application, along with the comment normalisation rule used whenever a
//! comment is written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::Priority;

/// A single to-do item.
///
/// `id` and `created_at` are fixed at construction. `is_completed`, `priority`
/// and `comment` are the mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Task {
    /// Build a fresh, incomplete task with no comment.
    pub fn new(title: impl Into<String>, priority: Priority, created_at: DateTime<Utc>) -> Self {
        Task {
            id: Uuid::new_v4(),
            title: title.into(),
            is_completed: false,
            created_at,
            priority,
            comment: None,
        }
    }

    /// The comment as shown in an editor: absent reads as empty.
    pub fn comment_text(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

/// Empty comments are stored as absent. Whitespace is kept as typed.
pub fn normalise_comment(text: Option<String>) -> Option<String> {
    text.filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_defaults() {
        let now = Utc::now();
        let task = Task::new("Buy milk", Priority::Medium, now);
        assert_eq!(task.title, "Buy milk");
        assert!(!task.is_completed);
        assert_eq!(task.created_at, now);
        assert_eq!(task.comment, None);
        assert_eq!(task.comment_text(), "");
    }

    #[test]
    fn ids_are_unique() {
        let now = Utc::now();
        let a = Task::new("a", Priority::Low, now);
        let b = Task::new("a", Priority::Low, now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_comment_normalises_to_absent() {
        assert_eq!(normalise_comment(Some(String::new())), None);
        assert_eq!(normalise_comment(None), None);
        assert_eq!(normalise_comment(Some("note".into())), Some("note".to_string()));
        assert_eq!(normalise_comment(Some(" ".into())), Some(" ".to_string()));
    }

    #[test]
    fn absent_comment_is_not_serialized() {
        let task = Task::new("x", Priority::High, Utc::now());
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("comment").is_none());
        assert_eq!(json["priority"], 2);
    }
}
