use std::{collections::HashMap, convert::Infallible};

use rocket::{
    http::Status,
    request::{self, FromRequest, Outcome},
    response::{self, Responder},
    serde::json::Json,
    Request, State,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, trace, warn};

mod events;
pub use events::*;

mod signing;
use signing::SignedGitHubPayload;

use crate::{
    bot::{Bot, Notification},
    slack::{Deliver, DeliveryError},
    webhooks::Delivery,
};

/// Secret GitHub signs deliveries with, if one is configured.
pub struct GitHubSecret(pub Option<String>);

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("couldn't deliver notification: {0}")]
    Delivery(#[from] DeliveryError),
}

impl<'r> Responder<'r, 'static> for WebhookError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = match self {
            Self::Classify(_) | Self::InvalidJson(_) => Status::BadRequest,
            Self::Delivery(_) => Status::BadGateway,
        };
        warn!("failed to handle GitHub delivery: {}", self);

        (status, self.to_string()).respond_to(request)
    }
}

#[derive(rocket::Responder)]
pub enum WebhookResponse {
    Notified(Json<Notification>),
    Ignored(&'static str),
}

/// All headers of a request, GitHub puts the event type and delivery ID in there.
pub struct WebhookHeaders(pub HashMap<String, String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for WebhookHeaders {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let headers = request
            .headers()
            .iter()
            .map(|header| (header.name().as_str().to_owned(), header.value().to_owned()))
            .collect();

        Outcome::Success(WebhookHeaders(headers))
    }
}

#[rocket::get("/api/webhooks/github")]
pub fn health() -> &'static str {
    "OK"
}

#[rocket::post("/api/webhooks/github", data = "<payload>")]
pub async fn github_webhook(
    headers: WebhookHeaders,
    payload: SignedGitHubPayload,
    bot: &State<Bot>,
    delivery: &State<Delivery>,
) -> Result<WebhookResponse, WebhookError> {
    trace!("received signed payload:\n{}", payload.0);
    let payload: Value = serde_json::from_str(&payload.0)?;

    let response = match process(bot, delivery.0.as_ref(), &headers.0, payload).await? {
        Some(notification) => WebhookResponse::Notified(Json(notification)),
        None => WebhookResponse::Ignored("OK"),
    };

    Ok(response)
}

/// Dispatches a delivery and hands the resulting notification, if any, to `delivery`.
pub(crate) async fn process(
    bot: &Bot,
    delivery: &dyn Deliver,
    headers: &HashMap<String, String>,
    payload: Value,
) -> Result<Option<Notification>, WebhookError> {
    let notification = match bot.handle(headers, payload)? {
        Some(notification) => notification,
        None => return Ok(None),
    };

    info!("notifying {}", notification.channel());
    delivery.deliver(&notification).await?;

    Ok(Some(notification))
}
