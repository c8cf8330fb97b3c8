use crate::domain::requests::validation_error;
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use shared::errors::HttpError;
use validator::Validate;

/// JSON body that is deserialized and validated before the handler runs.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| HttpError::from(validation_error(&errors)))?;

        Ok(Self(value))
    }
}

/// Query string counterpart of [`SimpleValidatedJson`].
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|rejection| HttpError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| HttpError::from(validation_error(&errors)))?;

        Ok(Self(value))
    }
}
