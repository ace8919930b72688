//! Book collection and lending endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{CorrelationId, SystemClock};
use data_store::DataStore;
use dispatch::{BroadcastListener, CorrelatingDispatcher, FanOutDispatcher, LendingActivityView};
use domain::{Author, Book, BookDraft, BookId, Borrower, CollectionService, Isbn, NumberOfPages, Title};
use serde::{Deserialize, Serialize};

use crate::correlation::Correlation;
use crate::error::ApiError;

/// Book store shared by all requests.
pub type BookStore = Arc<dyn DataStore<Book>>;

/// Collection service as built for a single request.
pub type BookService =
    CollectionService<BookStore, CorrelatingDispatcher<Arc<FanOutDispatcher>>, SystemClock>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub store: BookStore,
    pub dispatcher: Arc<FanOutDispatcher>,
    pub activity: LendingActivityView,
    pub broadcast: BroadcastListener,
}

impl AppState {
    /// Builds a collection service whose events carry `correlation_id`.
    pub fn service(&self, correlation_id: CorrelationId) -> BookService {
        CollectionService::new(
            self.store.clone(),
            CorrelatingDispatcher::new(self.dispatcher.clone(), correlation_id),
            SystemClock,
        )
    }
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub number_of_pages: Option<u32>,
}

#[derive(Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Deserialize)]
pub struct AuthorsRequest {
    pub authors: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberOfPagesRequest {
    pub number_of_pages: u32,
}

#[derive(Deserialize)]
pub struct BorrowRequest {
    pub borrower: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: String,
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
    pub number_of_pages: Option<u32>,
    pub status: &'static str,
    pub borrower: Option<String>,
    pub borrowed_at: Option<DateTime<Utc>>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let state = book.lending_state();
        Self {
            id: book.id().to_string(),
            isbn: book.isbn().to_string(),
            title: book.title().to_string(),
            authors: book.authors().iter().map(ToString::to_string).collect(),
            number_of_pages: book.number_of_pages().map(|p| p.get()),
            status: state.as_str(),
            borrower: state.borrower().map(ToString::to_string),
            borrowed_at: state.borrowed_at(),
        }
    }
}

// -- Handlers --

/// POST /api/books: add a book to the collection.
#[tracing::instrument(skip(state, req, correlation))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let mut draft = BookDraft::new(Isbn::parse(&req.isbn)?, Title::new(req.title)?)
        .with_authors(Author::list(req.authors)?);
    if let Some(pages) = req.number_of_pages {
        draft = draft.with_number_of_pages(NumberOfPages::new(pages)?);
    }

    let book = state.service(correlation).add_book(draft).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// GET /api/books: list every book.
#[tracing::instrument(skip(state, correlation))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = state.service(correlation).get_all_books().await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /api/books/{id}: load a book by ID.
#[tracing::instrument(skip(state, correlation))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.service(correlation).get_book(parse_book_id(&id)?).await?;
    Ok(Json(book.into()))
}

/// DELETE /api/books/{id}: remove a book.
#[tracing::instrument(skip(state, correlation))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .service(correlation)
        .remove_book(parse_book_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/books/{id}/title
#[tracing::instrument(skip(state, req, correlation))]
pub async fn update_title(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
    Json(req): Json<TitleRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let title = Title::new(req.title)?;
    let book = state.service(correlation).update_title(id, title).await?;
    Ok(Json(book.into()))
}

/// PUT /api/books/{id}/authors
#[tracing::instrument(skip(state, req, correlation))]
pub async fn update_authors(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
    Json(req): Json<AuthorsRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let authors = Author::list(req.authors)?;
    let book = state.service(correlation).update_authors(id, authors).await?;
    Ok(Json(book.into()))
}

/// DELETE /api/books/{id}/authors
#[tracing::instrument(skip(state, correlation))]
pub async fn remove_authors(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state
        .service(correlation)
        .remove_authors(parse_book_id(&id)?)
        .await?;
    Ok(Json(book.into()))
}

/// PUT /api/books/{id}/numberOfPages
#[tracing::instrument(skip(state, req, correlation))]
pub async fn update_number_of_pages(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
    Json(req): Json<NumberOfPagesRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let pages = NumberOfPages::new(req.number_of_pages)?;
    let book = state
        .service(correlation)
        .update_number_of_pages(id, pages)
        .await?;
    Ok(Json(book.into()))
}

/// DELETE /api/books/{id}/numberOfPages
#[tracing::instrument(skip(state, correlation))]
pub async fn remove_number_of_pages(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state
        .service(correlation)
        .remove_number_of_pages(parse_book_id(&id)?)
        .await?;
    Ok(Json(book.into()))
}

/// POST /api/books/{id}/borrow: lend a book out.
#[tracing::instrument(skip(state, req, correlation))]
pub async fn borrow(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
    Json(req): Json<BorrowRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let id = parse_book_id(&id)?;
    let borrower = Borrower::new(req.borrower)?;
    let book = state.service(correlation).borrow_book(id, borrower).await?;
    Ok(Json(book.into()))
}

/// POST /api/books/{id}/return: put a book back on the shelf.
#[tracing::instrument(skip(state, correlation))]
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Correlation(correlation): Correlation,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state
        .service(correlation)
        .return_book(parse_book_id(&id)?)
        .await?;
    Ok(Json(book.into()))
}

fn parse_book_id(id: &str) -> Result<BookId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid book id: {e}")))?;
    Ok(BookId::from_uuid(uuid))
}
