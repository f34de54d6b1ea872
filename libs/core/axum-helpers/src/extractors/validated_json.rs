//! JSON extractor that runs `validator` rules before the handler sees the payload.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Rejects malformed bodies with `JSON_EXTRACTION` and rule violations with
/// `VALIDATION_ERROR` plus per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct NewSchedule {
///     #[validate(length(min = 1, max = 255))]
///     name: String,
/// }
///
/// async fn create(ValidatedJson(input): ValidatedJson<NewSchedule>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
