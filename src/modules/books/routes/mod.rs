//! HTTP handlers for the books module.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::{ApiResponse, AppError};
use serde::Serialize;

use super::models::{Book, BookPayload, BookSummary, ListQuery};
use super::service::BookService;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

/// Raw query pairs; repeated keys survive extraction and are sorted out by
/// [`ListQuery::from_pairs`].
type QueryPairs = Query<Vec<(String, String)>>;

/// Id from the path. An id that does not decode cannot name a stored book,
/// so it becomes the empty id and takes the handler's not-found path.
fn book_id(path: Result<Path<String>, PathRejection>) -> String {
    match path {
        Ok(Path(id)) => id,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "undecodable book id");
            String::new()
        }
    }
}

/// Routes relative to the module mount point
pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn create_book(
    State(service): State<BookService>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<CreatedBook>, AppError> {
    let Json(payload) = payload?;
    let book_id = service.create(payload).await?;

    Ok(ApiResponse::with_data(CreatedBook { book_id })
        .message("Buku berhasil ditambahkan")
        .status_code(StatusCode::CREATED))
}

async fn list_books(
    State(service): State<BookService>,
    pairs: Result<QueryPairs, QueryRejection>,
) -> ApiResponse<BookList> {
    let query = match pairs {
        Ok(Query(pairs)) => ListQuery::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable list query ignored");
            ListQuery::default()
        }
    };
    let books = service.list(&query).await;
    ApiResponse::with_data(BookList { books })
}

async fn get_book(
    State(service): State<BookService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<BookDetail>, AppError> {
    let book = service.get(&book_id(id)).await?;
    Ok(ApiResponse::with_data(BookDetail { book }))
}

async fn update_book(
    State(service): State<BookService>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<()>, AppError> {
    let Json(payload) = payload?;
    service.update(&book_id(id), payload).await?;

    Ok(ApiResponse::success().message("Buku berhasil diperbarui"))
}

async fn delete_book(
    State(service): State<BookService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete(&book_id(id)).await?;
    Ok(ApiResponse::success().message("Buku berhasil dihapus"))
}
