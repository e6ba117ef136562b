use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Set of tags attached to a user or a blog post.
///
/// Ordered so that stored and serialized forms are deterministic.
pub type TagSet = BTreeSet<Tag>;

/// Error for Tag validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("Tag is empty")]
    Empty,

    #[error("Tag too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Tag value type
///
/// Surrounding whitespace is trimmed; the result must be 1-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    const MAX_LENGTH: usize = 50;

    /// Create a new validated tag.
    ///
    /// # Errors
    /// * `Empty` - Tag is empty after trimming
    /// * `TooLong` - Tag exceeds 50 characters
    pub fn new(tag: String) -> Result<Self, TagError> {
        let trimmed = tag.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(TagError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TagError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validate raw tags into a set. Duplicates collapse.
///
/// # Errors
/// The first invalid tag aborts the whole set.
pub fn parse_tags<I>(raw: I) -> Result<TagSet, TagError>
where
    I: IntoIterator<Item = String>,
{
    raw.into_iter().map(Tag::new).collect()
}

/// Plain strings in set order, as persisted.
pub fn tags_to_strings(tags: &TagSet) -> Vec<String> {
    tags.iter().map(|t| t.as_str().to_string()).collect()
}
