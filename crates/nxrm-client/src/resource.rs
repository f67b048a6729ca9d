//! Shared pieces of the resource managers
//!
//! Every resource kind answers [`Exists`] so that creates can be skipped for
//! resources that are already there and updates/deletes can report
//! "not found" without relying on the script's own error status.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::error::{NexusError, Result};

/// Existence check for one resource kind
#[async_trait]
pub trait Exists {
    /// Human readable kind, used in messages
    const KIND: &'static str;

    /// Whether the resource identified by `id` exists on the server
    async fn exists(&self, id: &str) -> Result<bool>;
}

/// Result of a mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    Updated,
    Deleted,
    NotFound,
}

/// What happened to a named resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: &'static str,
    pub name: String,
    pub outcome: Outcome,
}

impl Report {
    pub fn new(kind: &'static str, name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            kind,
            name: name.into(),
            outcome,
        }
    }

    /// Whether the server state was changed
    pub fn changed(&self) -> bool {
        matches!(
            self.outcome,
            Outcome::Created | Outcome::Updated | Outcome::Deleted
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.outcome {
            Outcome::Created => "was created in nexus",
            Outcome::AlreadyExists => "already exists in nexus",
            Outcome::Updated => "was updated in nexus",
            Outcome::Deleted => "was deleted from nexus",
            Outcome::NotFound => "was not found in nexus",
        };
        write!(f, "{} {:?} {}", self.kind, self.name, what)
    }
}

/// Fail with "name is a required parameter" style message when `value` is empty
pub(crate) fn require(value: &str, message: &str) -> Result<()> {
    if value.is_empty() {
        Err(NexusError::validation(message))
    } else {
        Ok(())
    }
}

/// `{"name": ...}` argument of the get/delete scripts
#[derive(Serialize)]
pub(crate) struct NameArg<'a> {
    pub name: &'a str,
}

/// `{}` argument of the list scripts
#[derive(Serialize)]
pub(crate) struct NoArg {}

/// Split a comma separated list, dropping all whitespace and empty entries
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|item| item.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" maven-releases , maven-snap shots,,"),
            vec!["maven-releases", "maven-snapshots"]
        );
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_report_display() {
        let report = Report::new("Content selector", "foo", Outcome::NotFound);
        assert_eq!(report.to_string(), "Content selector \"foo\" was not found in nexus");
        assert!(!report.changed());
        assert!(Report::new("Role", "dev", Outcome::Created).changed());
    }
}
