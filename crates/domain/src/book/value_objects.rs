//! Value objects for the book domain.
//!
//! Every value object validates on construction, and deserialization goes
//! through the same checks, so a value that exists is a valid one.

use serde::{Deserialize, Serialize};

use super::ValueError;

/// ISBN-13 of a book.
///
/// Accepts exactly 13 ASCII digits, or 10 digits which are normalized to
/// 13 by prefixing `978`. Anything else is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Parses and normalizes an ISBN.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValueError> {
        let value = value.as_ref();
        let all_digits = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());

        match value.len() {
            13 if all_digits => Ok(Self(value.to_string())),
            10 if all_digits => Ok(Self(format!("978{value}"))),
            _ => Err(ValueError::MalformedIsbn {
                value: value.to_string(),
            }),
        }
    }

    /// Returns the 13-digit form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Isbn {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

/// Title of a book. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Creates a title, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        non_blank(value.into())
            .map(Self)
            .ok_or(ValueError::BlankTitle)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Title {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

/// Name of one of a book's authors. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Author(String);

impl Author {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        non_blank(value.into())
            .map(Self)
            .ok_or(ValueError::BlankAuthor)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a list of names, keeping their order.
    pub fn list<I, S>(names: I) -> Result<Vec<Self>, ValueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Self::new).collect()
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Author {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Author> for String {
    fn from(author: Author) -> Self {
        author.0
    }
}

/// Page count of a book. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct NumberOfPages(u32);

impl NumberOfPages {
    pub fn new(value: u32) -> Result<Self, ValueError> {
        if value == 0 {
            return Err(ValueError::InvalidNumberOfPages { value });
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NumberOfPages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for NumberOfPages {
    type Error = ValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NumberOfPages> for u32 {
    fn from(pages: NumberOfPages) -> Self {
        pages.0
    }
}

/// Name of the person borrowing a book. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Borrower(String);

impl Borrower {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        non_blank(value.into())
            .map(Self)
            .ok_or(ValueError::BlankBorrower)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Borrower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Borrower {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Borrower> for String {
    fn from(borrower: Borrower) -> Self {
        borrower.0
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}
