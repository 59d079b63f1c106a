//! Book representations
//!
//! `BookRecord` mirrors the slot byte-for-byte; `BookView` is what callers
//! and exchange adapters work with.

use serde::{Deserialize, Serialize};

use super::codec::{decode_text, encode_text};
use super::{AUTHOR_WIDTH, TITLE_WIDTH};

/// Storage form of a book: fixed-width fields exactly as laid out in a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: i32,
    pub title: [u8; TITLE_WIDTH],
    pub author: [u8; AUTHOR_WIDTH],
    pub year: i32,
    pub copies: i32,
}

/// Display form of a book with unconstrained text fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookView {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub copies: i32,
}

impl BookRecord {
    /// Build the storage form, truncating text that does not fit its field
    pub fn from_view(view: &BookView) -> Self {
        let mut title = [0u8; TITLE_WIDTH];
        let mut author = [0u8; AUTHOR_WIDTH];
        encode_text(&view.title, &mut title);
        encode_text(&view.author, &mut author);

        Self {
            id: view.id,
            title,
            author,
            year: view.year,
            copies: view.copies,
        }
    }

    /// Title as text (best-effort decode)
    pub fn title_text(&self) -> String {
        decode_text(&self.title)
    }

    /// Author as text (best-effort decode)
    pub fn author_text(&self) -> String {
        decode_text(&self.author)
    }

    /// Convert back to the display form
    pub fn to_view(&self) -> BookView {
        BookView {
            id: self.id,
            title: self.title_text(),
            author: self.author_text(),
            year: self.year,
            copies: self.copies,
        }
    }
}

impl BookView {
    /// Convenience constructor
    pub fn new(
        id: i32,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        copies: i32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            copies,
        }
    }

    /// What this view looks like after a trip through the slot format
    pub fn normalized(&self) -> Self {
        BookRecord::from_view(self).to_view()
    }
}
