use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use validator::Validate;

use crate::error::{ApiError, ErrorVerbosity, ErrorVerbosityProvider, ValidationError};

use super::Extractor;

/// An extractor that validates the data extracted by another extractor.
pub struct Validated<X>(pub X);

#[async_trait]
impl<X, S> FromRequest<S> for Validated<X>
where
    X: FromRequest<S, Rejection = ApiError> + Extractor,
    <X as Extractor>::Extracted: Validate,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "validated_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let inner = X::from_request(req, state).await?;

        validate(inner.extracted(), state.error_verbosity())?;

        tracing::trace!("Validated");

        Ok(Validated(inner))
    }
}

/// Validates `value`, mapping failures to an [`ApiError`].
///
/// For handlers that have to check something else before validating the body.
pub fn validate<T: Validate>(value: &T, verbosity: ErrorVerbosity) -> Result<(), ApiError> {
    value.validate().map_err(|errors| {
        tracing::warn!(?errors, "Validation errors");

        ValidationError::from_validation_errors(verbosity, errors).into()
    })
}
