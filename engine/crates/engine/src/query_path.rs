use std::fmt;

use serde::Serialize;

/// One step of a response path: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum QueryPathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for QueryPathSegment {
    fn from(value: &str) -> Self {
        QueryPathSegment::Field(value.to_string())
    }
}

impl From<String> for QueryPathSegment {
    fn from(value: String) -> Self {
        QueryPathSegment::Field(value)
    }
}

impl From<usize> for QueryPathSegment {
    fn from(value: usize) -> Self {
        QueryPathSegment::Index(value)
    }
}

impl fmt::Display for QueryPathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryPathSegment::Field(name) => f.write_str(name),
            QueryPathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Path from the response root down to a field, mixing keys and indices.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPath(Vec<QueryPathSegment>);

impl QueryPath {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A new path with `segment` appended; the receiver is left untouched.
    #[must_use]
    pub fn child(&self, segment: impl Into<QueryPathSegment>) -> Self {
        let mut path = self.0.clone();
        path.push(segment.into());
        Self(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryPathSegment> {
        self.0.iter()
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}
