use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{ApiError, BookError, BookErrorType, ErrorVerbosityProvider},
    extractor::{
        json::{body_error, ApiJson},
        validated::validate,
    },
    state::ApiState,
    store::{Book, BookChanges, BookStoreError},
};

use super::{book_id, requested_id};

/// Update of a stored book. Omitted fields keep their stored value.
///
/// The body is read as plain JSON first, so a missing `id` is reported before any
/// mistyped field.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, ToSchema, Validate)]
pub struct UpdateBookRequest {
    #[serde(default)]
    #[schema(value_type = Option<u64>)]
    pub id: Option<Value>,
    #[validate(length(max = 512, message = "Must be at most 512 characters long"))]
    pub title: Option<String>,
    #[validate(length(max = 512, message = "Must be at most 512 characters long"))]
    pub author: Option<String>,
    #[validate(range(min = 0.0, message = "Must not be negative"))]
    pub price: Option<f64>,
}

impl From<UpdateBookRequest> for BookChanges {
    fn from(request: UpdateBookRequest) -> Self {
        BookChanges {
            title: request.title,
            author: request.author,
            price: request.price,
        }
    }
}

#[derive(Debug)]
pub struct UpdateBookResponse(pub Book);

impl IntoResponse for UpdateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

#[utoipa::path(
    put,
    path = "/books",
    tag = "books",
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "The book after the update", body = Book),
        (status = 400, description = "Book ID is required", body = crate::error::ApiErrorMessage),
        (status = 404, description = "Book not found", body = crate::error::ApiErrorMessage),
        (status = 422, description = "A field has an unacceptable value", body = crate::error::ApiErrorMessage),
    )
)]
pub async fn update_book(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<UpdateBookResponse, ApiError> {
    let verbosity = state.error_verbosity();

    let requested = requested_id(body.get("id"))
        .ok_or_else(|| BookError::new(verbosity, BookErrorType::IdRequired))?;

    let not_found = || {
        BookError::new(
            verbosity,
            BookErrorType::NotFound {
                id: requested.clone(),
            },
        )
    };

    let id = book_id(&requested).ok_or_else(not_found)?;

    let request: UpdateBookRequest = serde_json::from_value(body).map_err(|err| {
        tracing::warn!(%err, "Rejection");

        body_error::<UpdateBookRequest>(verbosity, err.to_string())
    })?;

    validate(&request, verbosity)?;

    let book = state
        .books()
        .update(id, request.into())
        .await
        .map_err(|err| match err {
            BookStoreError::NotFound { .. } => not_found(),
        })?;

    Ok(UpdateBookResponse(book))
}
