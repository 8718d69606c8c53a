//! A JSON request body extractor that reports bad bodies as JSON errors.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::Error;

/// A type that can be sent as a JSON request body.
pub trait RequestBody: DeserializeOwned {
    /// The error returned when a request body cannot be read as `Self`.
    fn invalid_body(message: String) -> Error {
        Error::InvalidBody(message)
    }
}

/// Extracts `T` from a JSON request body.
///
/// Unlike [axum::Json], a missing content type, malformed JSON or a field with
/// the wrong type or an unknown value is rejected with the [Error] chosen by
/// [RequestBody::invalid_body].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: RequestBody,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {rejection}");
                Err(T::invalid_body(rejection.body_text()))
            }
        }
    }
}
