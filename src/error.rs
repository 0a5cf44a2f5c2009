use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns an empty response with [`StatusCode::NO_CONTENT`] for all errors.
    None,
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    #[default]
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    /// Returns the error verbosity.
    fn error_verbosity(&self) -> ErrorVerbosity;
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    error: &'static str,
    #[serde(flatten)]
    api_error: ApiError,
}

/// The body every error carries at [`ErrorVerbosity::Message`].
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorMessage {
    /// Human readable error message.
    #[schema(example = "Book not found")]
    pub error: String,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status_code = self.api_error.status_code();

        match self.api_error.verbosity() {
            ErrorVerbosity::None => StatusCode::NO_CONTENT.into_response(),
            ErrorVerbosity::StatusCode => status_code.into_response(),
            ErrorVerbosity::Message => {
                let message = ApiErrorMessage {
                    error: self.error.to_string(),
                };

                (status_code, Json(message)).into_response()
            }
            ErrorVerbosity::Type | ErrorVerbosity::Full => {
                (status_code, Json(self)).into_response()
            }
        }
    }
}

#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error_context")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Validation error
    ///
    /// This error is returned when the body was parsed but its values are not acceptable.
    Validation(ValidationError),
    /// Method not allowed
    ///
    /// This error is returned when the method is not allowed.
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when the requested route does not exist.
    NotFound(NotFoundError),
    /// Book error
    ///
    /// This error is returned when a book operation can not be carried out.
    Book(BookError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
            ApiError::Book(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Validation(_) => "Validation failed",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
            ApiError::Book(err) => err.message(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Book(err) => err.status_code(),
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(api_error: ApiError) -> Self {
        let error = match api_error.verbosity() {
            ErrorVerbosity::None => "",
            _ => api_error.message(),
        };

        ApiErrorResponse { error, api_error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiErrorResponse::from(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: Option<String>,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), body_expected_schema),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    validation_errors: Option<ValidationErrors>,
}

impl ValidationError {
    pub fn from_validation_errors(verbosity: ErrorVerbosity, errors: ValidationErrors) -> Self {
        let validation_errors = verbosity.should_generate_error_reason().then_some(errors);

        ValidationError {
            verbosity,
            validation_errors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub enum BookErrorType {
    /// The request carried no numeric `id`.
    IdRequired,
    NotFound {
        #[serde(skip)]
        id: serde_json::Number,
    },
}

#[derive(Debug, Serialize)]
pub struct BookError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    book_error_type: BookErrorType,
    book_error_reason: Option<Cow<'static, str>>,
}

impl BookError {
    pub fn new(verbosity: ErrorVerbosity, book_error_type: BookErrorType) -> Self {
        let book_error_reason = verbosity
            .should_generate_error_reason()
            .then(|| Self::reason(&book_error_type));

        BookError {
            verbosity,
            book_error_type,
            book_error_reason,
        }
    }

    fn reason(book_error_type: &BookErrorType) -> Cow<'static, str> {
        match book_error_type {
            BookErrorType::IdRequired => Cow::Borrowed("`id` must be present and a number"),
            BookErrorType::NotFound { id } => Cow::Owned(format!("No book with id {id}")),
        }
    }

    fn message(&self) -> &'static str {
        match self.book_error_type {
            BookErrorType::IdRequired => "Book ID is required",
            BookErrorType::NotFound { .. } => "Book not found",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.book_error_type {
            BookErrorType::IdRequired => StatusCode::BAD_REQUEST,
            BookErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    use super::*;

    async fn body_of(response: Response) -> Option<Value> {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (!bytes.is_empty()).then(|| serde_json::from_slice(&bytes).expect("Body is not JSON"))
    }

    fn not_found(verbosity: ErrorVerbosity) -> ApiError {
        BookError::new(verbosity, BookErrorType::NotFound { id: 42.into() }).into()
    }

    #[tokio::test]
    async fn message_verbosity_returns_only_the_error_message() {
        let response = not_found(ErrorVerbosity::Message).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            Some(json!({ "error": "Book not found" }))
        );
    }

    #[tokio::test]
    async fn id_required_is_a_bad_request() {
        let error: ApiError =
            BookError::new(ErrorVerbosity::Message, BookErrorType::IdRequired).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(response).await,
            Some(json!({ "error": "Book ID is required" }))
        );
    }

    #[tokio::test]
    async fn full_verbosity_adds_type_and_reason() {
        let response = not_found(ErrorVerbosity::Full).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            Some(json!({
                "error": "Book not found",
                "error_type": "Book",
                "error_context": {
                    "book_error_type": { "NotFound": {} },
                    "book_error_reason": "No book with id 42",
                },
            }))
        );
    }

    #[tokio::test]
    async fn type_verbosity_clears_the_reason() {
        let body = body_of(not_found(ErrorVerbosity::Type).into_response())
            .await
            .expect("Body is empty");

        assert_eq!(body["error"], "Book not found");
        assert_eq!(body["error_context"]["book_error_reason"], Value::Null);
    }

    #[tokio::test]
    async fn status_code_verbosity_has_no_body() {
        let response = not_found(ErrorVerbosity::StatusCode).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await, None);
    }

    #[tokio::test]
    async fn none_verbosity_hides_the_status() {
        let response = not_found(ErrorVerbosity::None).into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(body_of(response).await, None);
    }
}
