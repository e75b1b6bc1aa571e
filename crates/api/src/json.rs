//! JSON body extractor.

use axum::extract::{FromRequest, Request};
use inkpot_common::AppError;
use serde::de::DeserializeOwned;

/// `axum::Json` with malformed or mistyped bodies reported through the
/// error envelope as 400 instead of axum's bare 422 rejection.
#[derive(Debug)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}
