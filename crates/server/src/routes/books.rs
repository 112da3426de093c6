use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::extract::JsonOrEmpty;
use service::{storage::Resource, Book, BookDraft, BookPatch, ServiceError};
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

/// Path ids that are not integers behave exactly like unknown ids.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .map_err(|_| ServiceError::not_found(Book::NAME).into())
}

/// 列出全部图书
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.books.list())
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.books.get(id)?))
}

/// 创建图书：title 必填；无请求体按 `{}` 处理
pub async fn create_book(
    State(state): State<AppState>,
    JsonOrEmpty(draft): JsonOrEmpty<BookDraft>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state.books.create(draft)?;
    info!(book_id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// 更新图书：仅覆盖请求中出现的字段
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrEmpty(patch): JsonOrEmpty<BookPatch>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id)?;
    let book = state.books.update(id, patch)?;
    info!(book_id = book.id, "book updated");
    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.books.delete(id)?;
    info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_ids_are_not_found() {
        for raw in ["abc", "-1", "1.5", ""] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.status, StatusCode::NOT_FOUND);
            assert_eq!(err.message, "Book not found");
        }
        assert_eq!(parse_id("7").unwrap(), 7);
    }
}
