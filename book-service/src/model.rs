//! Book domain model.
//!
//! A [`Book`] is identified by a server-minted UUID. Creation input is a
//! [`NewBook`], which has no identifier at all, and update input is a
//! [`BookPatch`], where every field is optional.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of a book. Serialized as the hyphenated UUID text.
pub type BookId = Uuid;

/// A persisted book record.
///
/// Two books are the same book when their identifiers match; the other
/// fields do not take part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: u16,
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Input for creating a book. The identifier is assigned later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: u16,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: u16) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Checks the fields required on creation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::EmptyTitle);
        }
        if is_blank(&self.author) {
            return Err(ValidationError::EmptyAuthor);
        }
        if self.year == 0 {
            return Err(ValidationError::MissingYear);
        }
        Ok(())
    }

    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("author must not be empty")]
    EmptyAuthor,
    #[error("year must be a positive number")]
    MissingYear,
}

/// Partial update of a book.
///
/// `None` leaves the stored value untouched. An empty string or a zero year
/// is treated exactly like `None`, so a field can never be cleared through
/// a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<u16>,
}

impl BookPatch {
    /// Builds a patch, dropping blank strings and a zero year.
    pub fn new(title: Option<String>, author: Option<String>, year: Option<u16>) -> Self {
        Self {
            title: title.filter(|title| !is_blank(title)),
            author: author.filter(|author| !is_blank(author)),
            year: year.filter(|year| *year != 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title().is_none() && self.author().is_none() && self.year().is_none()
    }

    /// Merges this patch onto `current`. The identifier always comes from
    /// `current`.
    pub fn apply(&self, current: &Book) -> Book {
        Book {
            id: current.id,
            title: self.title().unwrap_or(&current.title).to_string(),
            author: self.author().unwrap_or(&current.author).to_string(),
            year: self.year().unwrap_or(current.year),
        }
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !is_blank(title))
    }

    fn author(&self) -> Option<&str> {
        self.author.as_deref().filter(|author| !is_blank(author))
    }

    fn year(&self) -> Option<u16> {
        self.year.filter(|year| *year != 0)
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Book {
        NewBook::new("A", "B", 2000).into_book(Uuid::new_v4())
    }

    #[test]
    fn patch_keeps_fields_it_does_not_set() {
        let current = stored();
        let patch = BookPatch::new(Some("C".into()), None, None);

        let merged = patch.apply(&current);

        assert_eq!(merged.id, current.id);
        assert_eq!(merged.title, "C");
        assert_eq!(merged.author, "B");
        assert_eq!(merged.year, 2000);
    }

    #[test]
    fn patch_treats_empty_and_zero_as_unset() {
        let current = stored();
        let patch = BookPatch {
            title: Some(String::new()),
            author: Some(String::new()),
            year: Some(0),
        };

        assert!(patch.is_empty());
        let merged = patch.apply(&current);
        assert_eq!(merged.title, "A");
        assert_eq!(merged.author, "B");
        assert_eq!(merged.year, 2000);
    }

    #[test]
    fn patch_constructor_normalizes_sentinels() {
        let patch = BookPatch::new(Some(String::new()), Some("Herbert".into()), Some(0));
        assert_eq!(
            patch,
            BookPatch {
                title: None,
                author: Some("Herbert".into()),
                year: None,
            }
        );
    }

    #[test]
    fn patch_ignores_whitespace_only_text() {
        let current = stored();
        let patch = BookPatch::new(Some("   ".into()), Some("\t".into()), None);
        assert!(patch.is_empty());

        let raw = BookPatch {
            title: Some("  ".into()),
            author: None,
            year: None,
        };
        assert_eq!(raw.apply(&current).title, "A");
    }

    #[test]
    fn validate_rejects_missing_fields() {
        assert_eq!(
            NewBook::new("  ", "B", 1).validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            NewBook::new("A", "", 1).validate(),
            Err(ValidationError::EmptyAuthor)
        );
        assert_eq!(
            NewBook::new("A", "B", 0).validate(),
            Err(ValidationError::MissingYear)
        );
        assert!(NewBook::new("Dune", "Herbert", 1965).validate().is_ok());
    }

    #[test]
    fn books_compare_by_identifier() {
        let book = stored();
        let mut renamed = book.clone();
        renamed.title = "Other".into();
        assert_eq!(book, renamed);
        assert_ne!(book, stored());
    }

    #[test]
    fn book_serializes_with_text_identifier() {
        let book = stored();
        let value = serde_json::to_value(&book).expect("serialize book");
        assert_eq!(value["id"], book.id.to_string());
        assert_eq!(value["title"], "A");
        assert_eq!(value["author"], "B");
        assert_eq!(value["year"], 2000);
    }
}
