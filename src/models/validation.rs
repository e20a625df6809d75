use std::collections::BTreeMap;
use std::fmt;

use super::{TaskDraft, TaskStatus};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Description,
    Status,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Status,
            Self::Status => Self::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Title => Self::Status,
            Self::Description => Self::Title,
            Self::Status => Self::Description,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type FormErrors = BTreeMap<FormField, &'static str>;

/// Checks the editable fields of a task. An empty map means the input may be
/// submitted. Lengths are counted in characters on the raw input.
pub fn validate(title: &str, description: &str, _status: TaskStatus) -> FormErrors {
    let mut errors = FormErrors::new();

    if title.trim().is_empty() {
        errors.insert(FormField::Title, "Title is required");
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.insert(FormField::Title, "Title must be at most 100 characters");
    }

    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.insert(
            FormField::Description,
            "Description must be at most 500 characters",
        );
    }

    errors
}

/// Validates and, on success, produces the trimmed body to send.
pub fn build_draft(
    title: &str,
    description: &str,
    status: TaskStatus,
) -> Result<TaskDraft, FormErrors> {
    let errors = validate(title, description, status);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(TaskDraft {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        status,
    })
}

/// Renders errors as `field: message` pairs joined by `; `.
pub fn error_summary(errors: &FormErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
