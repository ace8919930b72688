//! Field-by-field merge of source answers.

use domain::{Author, Book, NumberOfPages};

use crate::sources::BookData;

/// Data to apply to a book, merged from all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub authors: Option<Vec<Author>>,
    pub number_of_pages: Option<NumberOfPages>,
}

impl Enrichment {
    /// Applies the merged fields to `book`, leaving the others untouched.
    pub fn apply(self, book: Book) -> Book {
        let book = match self.authors {
            Some(authors) => book.with_authors(authors),
            None => book,
        };
        match self.number_of_pages {
            Some(pages) => book.with_number_of_pages(pages),
            None => book,
        }
    }
}

/// Merges source answers given in priority order.
///
/// Authors come from the first answer with at least one non-blank name; the
/// page count from the first answer with a positive count. Returns `None` if
/// no answer contributes anything.
pub fn merge<I>(answers: I) -> Option<Enrichment>
where
    I: IntoIterator<Item = Option<BookData>>,
{
    let mut authors = None;
    let mut number_of_pages = None;

    for data in answers.into_iter().flatten() {
        if authors.is_none() {
            authors = usable_authors(&data.authors);
        }
        if number_of_pages.is_none() {
            number_of_pages = data
                .number_of_pages
                .and_then(|pages| NumberOfPages::new(pages).ok());
        }
        if authors.is_some() && number_of_pages.is_some() {
            break;
        }
    }

    if authors.is_none() && number_of_pages.is_none() {
        return None;
    }
    Some(Enrichment {
        authors,
        number_of_pages,
    })
}

fn usable_authors(names: &[String]) -> Option<Vec<Author>> {
    let authors: Vec<Author> = names
        .iter()
        .filter_map(|name| Author::new(name.as_str()).ok())
        .collect();
    (!authors.is_empty()).then_some(authors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{BookDraft, BookId, Isbn, Title};

    fn names(authors: &[Author]) -> Vec<&str> {
        authors.iter().map(Author::as_str).collect()
    }

    #[test]
    fn first_source_with_authors_wins() {
        let merged = merge([
            Some(BookData::new().with_authors(["George R. R. Martin"])),
            Some(BookData::new().with_authors(["G. R. R. M."])),
        ])
        .unwrap();

        assert_eq!(
            names(merged.authors.as_deref().unwrap()),
            vec!["George R. R. Martin"]
        );
        assert!(merged.number_of_pages.is_none());
    }

    #[test]
    fn fields_are_merged_independently() {
        let merged = merge([
            Some(BookData::new().with_authors(["George R. R. Martin"])),
            Some(
                BookData::new()
                    .with_authors(["Somebody Else"])
                    .with_number_of_pages(835),
            ),
        ])
        .unwrap();

        assert_eq!(
            names(merged.authors.as_deref().unwrap()),
            vec!["George R. R. Martin"]
        );
        assert_eq!(merged.number_of_pages.map(|p| p.get()), Some(835));
    }

    #[test]
    fn missing_and_unusable_answers_are_skipped() {
        let merged = merge([
            None,
            Some(BookData::new().with_authors(["  "]).with_number_of_pages(0)),
            Some(BookData::new().with_authors(["", "Jane Doe"]).with_number_of_pages(300)),
        ])
        .unwrap();

        assert_eq!(names(merged.authors.as_deref().unwrap()), vec!["Jane Doe"]);
        assert_eq!(merged.number_of_pages.map(|p| p.get()), Some(300));
    }

    #[test]
    fn nothing_usable_means_no_enrichment() {
        assert!(merge(Vec::<Option<BookData>>::new()).is_none());
        assert!(merge([None, None]).is_none());
        assert!(merge([Some(BookData::new().with_number_of_pages(0))]).is_none());
    }

    #[test]
    fn apply_only_touches_merged_fields() {
        let book = Book::new(
            BookId::new(),
            BookDraft::new(
                Isbn::parse("9780553573404").unwrap(),
                Title::new("A Game of Thrones").unwrap(),
            )
            .with_number_of_pages(NumberOfPages::new(700).unwrap()),
        );
        let enrichment = Enrichment {
            authors: Some(Author::list(["George R. R. Martin"]).unwrap()),
            number_of_pages: None,
        };

        let enriched = enrichment.apply(book.clone());

        assert_eq!(enriched.id(), book.id());
        assert_eq!(names(enriched.authors()), vec!["George R. R. Martin"]);
        assert_eq!(enriched.number_of_pages().map(|p| p.get()), Some(700));
    }
}
