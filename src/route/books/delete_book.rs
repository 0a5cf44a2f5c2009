use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, BookError, BookErrorType, ErrorVerbosityProvider},
    extractor::json::ApiJson,
    state::ApiState,
};

use super::{book_id, requested_id};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct DeleteBookRequest {
    #[serde(default)]
    #[schema(value_type = Option<u64>)]
    pub id: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteBookResponse {
    #[schema(example = "Book deleted")]
    pub message: String,
    /// The id exactly as it was sent.
    #[schema(value_type = u64)]
    pub id: Number,
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Deleting an id that matches nothing still succeeds.
#[utoipa::path(
    delete,
    path = "/books",
    tag = "books",
    request_body = DeleteBookRequest,
    responses(
        (status = 200, description = "Book deleted", body = DeleteBookResponse),
        (status = 400, description = "Book ID is required", body = crate::error::ApiErrorMessage),
    )
)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DeleteBookRequest>,
) -> Result<DeleteBookResponse, ApiError> {
    let id = requested_id(request.id.as_ref()).ok_or_else(|| {
        BookError::new(state.error_verbosity(), BookErrorType::IdRequired)
    })?;

    if let Some(book_id) = book_id(&id) {
        state.books().delete(book_id).await;
    }

    Ok(DeleteBookResponse {
        message: "Book deleted".to_string(),
        id,
    })
}
