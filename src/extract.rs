use axum::{
    extract::{FromRequest, Request},
    Json,
};

use crate::error::ApiError;
use crate::schema::Payload;

/// JSON body decoded as `P` and validated into its record.
///
/// Rejections happen here, before any handler code runs, so an invalid
/// request never reaches the store.
pub struct ValidatedJson<P: Payload>(pub P::Record);

impl<S, P> FromRequest<S> for ValidatedJson<P>
where
    S: Send + Sync,
    P: Payload,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<P>::from_request(req, state).await?;
        Ok(ValidatedJson(payload.validated()?))
    }
}
