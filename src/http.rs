use actix_web::{
    dev::Payload, error::ResponseError, http::StatusCode, web::Bytes, FromRequest, HttpRequest,
};
use futures::future::{FutureExt, LocalBoxFuture};

use crate::gitlab::{self, DecodeError, Event};

/// Request body decoded as a GitLab webhook event.
#[derive(Debug, Clone)]
pub struct Webhook(pub Event);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("failed reading request data: {0}")]
    ActixError(#[from] actix_web::Error),
    #[error("error decoding JSON: {0}")]
    DecodeError(#[from] DecodeError),
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::ActixError(err) => err.as_response_error().status_code(),
            WebhookError::DecodeError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl FromRequest for Webhook {
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        Box::pin(
            Bytes::from_request(req, payload).map(|bytes| -> Result<Self, Self::Error> {
                let bytes = bytes?;
                tracing::debug!(
                    payload = String::from_utf8_lossy(&bytes).as_ref(),
                    "Received webhook payload"
                );

                match gitlab::decode(&bytes) {
                    Ok(event) => Ok(Self(event)),
                    Err(err) => {
                        tracing::warn!("Rejecting webhook payload: {}", err);
                        Err(err.into())
                    }
                }
            }),
        )
    }
}
