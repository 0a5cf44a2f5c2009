use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{state::ApiState, store::Book};

#[derive(Debug)]
pub struct ListBooksResponse(pub Vec<Book>);

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Every stored book in insertion order", body = [Book]),
    )
)]
pub async fn list_books(State(state): State<ApiState>) -> ListBooksResponse {
    ListBooksResponse(state.books().list().await)
}
