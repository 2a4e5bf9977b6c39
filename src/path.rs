use std::fmt;

/// A segment in a deep field path.
///
/// Paths address values nested inside a document, used by projections to
/// alias, resolve or nest deep fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field access by name
    ///
    /// # Examples
    /// - `"name"` → `Field("name")`
    /// - `"user.email"` → `[Field("user"), Field("email")]`
    Field(String),

    /// Array element access by index
    ///
    /// # Examples
    /// - `"items.0"` → `[Field("items"), Index(0)]`
    ///
    /// # Note
    /// Only segments made entirely of ASCII digits become Index segments.
    Index(usize),
}

/// A sequence of path segments locating a nested value.
///
/// # Examples
///
/// ```
/// use fql_chain::path::{Path, PathSegment};
///
/// let path = Path::parse("children.0.name");
/// assert_eq!(path.segments()[1], PathSegment::Index(0));
/// assert_eq!(path.to_string(), ".children[0].name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }

    pub const fn empty() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// Splits a dotted path. Empty segments are dropped.
    pub fn parse(dotted: &str) -> Self {
        let segments = dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.bytes().all(|b| b.is_ascii_digit())
                    && let Ok(n) = s.parse::<usize>()
                {
                    PathSegment::Index(n)
                } else {
                    PathSegment::Field(s.to_string())
                }
            })
            .collect();
        Path { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(n) => write!(f, "[{}]", n)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(dotted: &str) -> Self {
        Path::parse(dotted)
    }
}

impl From<String> for Path {
    fn from(dotted: String) -> Self {
        Path::parse(&dotted)
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path::new(segments)
    }
}
