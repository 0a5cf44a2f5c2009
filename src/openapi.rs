use axum::Json;
use utoipa::OpenApi;

use crate::{
    error::ApiErrorMessage,
    route::books::{
        create_book::{self, CreateBookRequest},
        delete_book::{self, DeleteBookRequest, DeleteBookResponse},
        list_books,
        update_book::{self, UpdateBookRequest},
    },
    store::Book,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books::list_books,
        create_book::create_book,
        update_book::update_book,
        delete_book::delete_book,
    ),
    components(schemas(
        Book,
        CreateBookRequest,
        UpdateBookRequest,
        DeleteBookRequest,
        DeleteBookResponse,
        ApiErrorMessage,
    )),
    tags((name = "books", description = "Book inventory"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_book_operation() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let books = &doc["paths"]["/books"];

        for method in ["get", "post", "put", "delete"] {
            assert!(books[method].is_object(), "`{method} /books` is not documented");
        }
    }
}
