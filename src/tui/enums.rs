//! Enumerations for TUI state management.

/// Which screen the terminal user interface is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    TaskList,
    TaskDetail,
    AddTask,
    Help,
    Confirm,
}

/// Focused field on the add form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Title,
    Priority,
}

impl AddField {
    pub fn next(self) -> Self {
        match self {
            AddField::Title => AddField::Priority,
            AddField::Priority => AddField::Title,
        }
    }
}

/// Focused field on the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Completed,
    Priority,
    Comment,
}

impl DetailField {
    pub fn next(self) -> Self {
        match self {
            DetailField::Completed => DetailField::Priority,
            DetailField::Priority => DetailField::Comment,
            DetailField::Comment => DetailField::Completed,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DetailField::Completed => DetailField::Comment,
            DetailField::Priority => DetailField::Completed,
            DetailField::Comment => DetailField::Priority,
        }
    }
}
