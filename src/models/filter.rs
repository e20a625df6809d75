use std::fmt;
use std::str::FromStr;

use super::TaskStatus;

/// Sentinel wire value meaning "no status restriction".
pub const ALL_STATUSES: &str = "TODAS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => ALL_STATUSES,
            Self::Only(status) => status.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.label(),
        }
    }

    /// All -> Pending -> In Progress -> Completed -> All.
    pub fn cycle(&self) -> Self {
        match self {
            Self::All => Self::Only(TaskStatus::Pending),
            Self::Only(TaskStatus::Completed) => Self::All,
            Self::Only(status) => Self::Only(status.next()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_STATUSES {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// The two list facets. Both are sent to the backend on every list read;
/// nothing is filtered locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub status: StatusFilter,
    pub search: String,
}

impl Filter {
    pub fn new(status: StatusFilter, search: impl Into<String>) -> Self {
        Self {
            status,
            search: search.into(),
        }
    }

    /// Query parameters for `GET {base}`. The status is omitted when every
    /// status is selected, the title term when it is blank.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let StatusFilter::Only(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        let term = self.search.trim();
        if !term.is_empty() {
            params.push(("titulo", term.to_string()));
        }
        params
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
