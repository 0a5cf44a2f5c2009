use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    extractor::{json::ApiJson, validated::Validated},
    state::ApiState,
    store::{Book, NewBook},
};

/// Fields of the book to create. Missing text becomes empty and a missing price becomes `0`.
///
/// An `id` sent by the client is ignored.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct CreateBookRequest {
    #[validate(length(max = 512, message = "Must be at most 512 characters long"))]
    pub title: Option<String>,
    #[validate(length(max = 512, message = "Must be at most 512 characters long"))]
    pub author: Option<String>,
    #[validate(range(min = 0.0, message = "Must not be negative"))]
    pub price: Option<f64>,
}

impl From<CreateBookRequest> for NewBook {
    fn from(request: CreateBookRequest) -> Self {
        NewBook {
            title: request.title.unwrap_or_default(),
            author: request.author.unwrap_or_default(),
            price: request.price.unwrap_or_default(),
        }
    }
}

#[derive(Debug)]
pub struct CreateBookResponse(pub Book);

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "The created book with its server assigned id", body = Book),
        (status = 400, description = "The body is not valid JSON", body = crate::error::ApiErrorMessage),
        (status = 422, description = "A field has an unacceptable value", body = crate::error::ApiErrorMessage),
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    Validated(ApiJson(request)): Validated<ApiJson<CreateBookRequest>>,
) -> CreateBookResponse {
    CreateBookResponse(state.books().create(request.into()).await)
}
