// Identifiers for virtual log documents.
//
// A LogUri looks like `<scheme>:<path>[?<query>]`. Only the path takes part in
// identity: two uris name the same registry entry iff their paths are equal.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::UriError;

pub const DEFAULT_SCHEME: &str = "aws-cwl";

#[derive(Debug, Clone)]
pub struct LogUri {
    scheme: String,
    path: String,
    query: Option<String>,
}

impl LogUri {
    pub fn new(scheme: &str, path: &str, query: Option<&str>) -> Result<Self, UriError> {
        let text = match query {
            Some(q) => format!("{scheme}:{path}?{q}"),
            None => format!("{scheme}:{path}"),
        };
        if scheme.is_empty() {
            return Err(UriError::EmptyScheme(text));
        }
        if path.is_empty() {
            return Err(UriError::EmptyPath(text));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            path: path.to_string(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
        })
    }

    /// Build the uri for one stream of a log group in a region.
    pub fn from_components(group: &str, stream: &str, region: &str) -> Result<Self, UriError> {
        Self::new(DEFAULT_SCHEME, &format!("{group}:{stream}"), Some(region))
    }

    pub fn parse(text: &str) -> Result<Self, UriError> {
        let (scheme, rest) = text
            .split_once(':')
            .ok_or_else(|| UriError::MissingScheme(text.to_string()))?;
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        Self::new(scheme, path, query)
    }

    /// The registry key for this document.
    pub fn key(&self) -> &str {
        &self.path
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl FromStr for LogUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LogUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

impl PartialEq for LogUri {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for LogUri {}

impl Hash for LogUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
