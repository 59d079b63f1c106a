//! Search fields
//!
//! The closed set of fields a catalog search can target, each tagged with how
//! it compares against the query.

use std::fmt;
use std::str::FromStr;

use crate::error::ShelfError;
use crate::record::BookView;

/// How a field is compared against a search value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Parse the query as an integer and compare for equality
    ExactNumeric,
    /// Case-insensitive substring of the trimmed query
    Substring,
}

/// A searchable book field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Id,
    Title,
    Author,
    Year,
    Copies,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Id,
        SearchField::Title,
        SearchField::Author,
        SearchField::Year,
        SearchField::Copies,
    ];

    /// Comparison kind for this field
    pub fn match_kind(self) -> MatchKind {
        match self {
            SearchField::Title | SearchField::Author => MatchKind::Substring,
            SearchField::Id | SearchField::Year | SearchField::Copies => MatchKind::ExactNumeric,
        }
    }

    /// Column label used in catalog tables and spreadsheets
    pub fn label(self) -> &'static str {
        match self {
            SearchField::Id => "ID",
            SearchField::Title => "Название",
            SearchField::Author => "Автор",
            SearchField::Year => "Год издания",
            SearchField::Copies => "Тираж",
        }
    }

    fn numeric_value(self, view: &BookView) -> Option<i32> {
        match self {
            SearchField::Id => Some(view.id),
            SearchField::Year => Some(view.year),
            SearchField::Copies => Some(view.copies),
            SearchField::Title | SearchField::Author => None,
        }
    }

    fn text_value(self, view: &BookView) -> Option<&str> {
        match self {
            SearchField::Title => Some(&view.title),
            SearchField::Author => Some(&view.author),
            _ => None,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchField {
    type Err = ShelfError;

    /// Accepts the column labels as well as plain English names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        match wanted.as_str() {
            "id" => Ok(SearchField::Id),
            "title" | "название" => Ok(SearchField::Title),
            "author" | "автор" => Ok(SearchField::Author),
            "year" | "год" | "год издания" => Ok(SearchField::Year),
            "copies" | "тираж" => Ok(SearchField::Copies),
            _ => Err(ShelfError::UnknownField(s.to_string())),
        }
    }
}

/// A prepared search: field plus the query normalized for its match kind
#[derive(Debug, Clone)]
pub struct Matcher {
    field: SearchField,
    text: String,
    number: Option<i32>,
}

impl Matcher {
    pub fn new(field: SearchField, value: &str) -> Self {
        let trimmed = value.trim();
        Self {
            field,
            text: trimmed.to_lowercase(),
            number: trimmed.parse().ok(),
        }
    }

    /// True if the view satisfies this search.
    ///
    /// A non-numeric query on a numeric field matches nothing.
    pub fn matches(&self, view: &BookView) -> bool {
        match self.field.match_kind() {
            MatchKind::ExactNumeric => match (self.number, self.field.numeric_value(view)) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => false,
            },
            MatchKind::Substring => self
                .field
                .text_value(view)
                .map(|text| text.to_lowercase().contains(&self.text))
                .unwrap_or(false),
        }
    }
}
