//! HTTP status values as reported by Nexus and by its scripts
//!
//! The server scripts echo the literal status line (`"200 OK"`,
//! `"302 Found"`, ...) inside their JSON result, so the mapping here is an
//! exact string match. Anything unrecognised is kept verbatim in
//! [`Status::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized status of a transport response or a script result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// `200 OK`
    Ok,
    /// `204 No Content`
    NoContent,
    /// `302 Found` (used by the create scripts for "already exists")
    Found,
    /// `404 Not Found`
    NotFound,
    /// Any other status line, kept as received
    Other(String),
}

impl Status {
    pub const OK: &'static str = "200 OK";
    pub const NO_CONTENT: &'static str = "204 No Content";
    pub const FOUND: &'static str = "302 Found";
    pub const NOT_FOUND: &'static str = "404 Not Found";

    /// Map a literal status line
    pub fn from_line(line: &str) -> Self {
        match line {
            Self::OK => Status::Ok,
            Self::NO_CONTENT => Status::NoContent,
            Self::FOUND => Status::Found,
            Self::NOT_FOUND => Status::NotFound,
            other => Status::Other(other.to_string()),
        }
    }

    /// Map a numeric HTTP code
    pub fn from_code(code: u16) -> Self {
        match code {
            200 => Status::Ok,
            204 => Status::NoContent,
            302 => Status::Found,
            404 => Status::NotFound,
            other => Status::Other(other.to_string()),
        }
    }

    /// The literal status line
    pub fn as_str(&self) -> &str {
        match self {
            Status::Ok => Self::OK,
            Status::NoContent => Self::NO_CONTENT,
            Status::Found => Self::FOUND,
            Status::NotFound => Self::NOT_FOUND,
            Status::Other(line) => line,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl From<String> for Status {
    fn from(line: String) -> Self {
        Status::from_line(&line)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl From<reqwest::StatusCode> for Status {
    fn from(code: reqwest::StatusCode) -> Self {
        match Status::from_code(code.as_u16()) {
            Status::Other(_) => Status::Other(
                format!(
                    "{} {}",
                    code.as_u16(),
                    code.canonical_reason().unwrap_or_default()
                )
                .trim_end()
                .to_string(),
            ),
            known => known,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines() {
        assert_eq!(Status::from_line("200 OK"), Status::Ok);
        assert_eq!(Status::from_line("204 No Content"), Status::NoContent);
        assert_eq!(Status::from_line("302 Found"), Status::Found);
        assert_eq!(Status::from_line("404 Not Found"), Status::NotFound);
        assert_eq!(
            Status::from_line("500 Internal Server Error"),
            Status::Other("500 Internal Server Error".to_string())
        );
        // Exact match only
        assert!(matches!(Status::from_line("200 ok"), Status::Other(_)));
        assert!(matches!(Status::from_line("200"), Status::Other(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::from_code(200), Status::Ok);
        assert_eq!(Status::from_code(204), Status::NoContent);
        assert_eq!(Status::from_code(302), Status::Found);
        assert_eq!(Status::from_code(404), Status::NotFound);
        assert_eq!(
            Status::from(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            Status::Other("500 Internal Server Error".to_string())
        );
    }

    #[test]
    fn test_status_serde() {
        let status: Status = serde_json::from_str("\"302 Found\"").unwrap();
        assert_eq!(status, Status::Found);
        assert_eq!(serde_json::to_string(&Status::NotFound).unwrap(), "\"404 Not Found\"");
    }
}
