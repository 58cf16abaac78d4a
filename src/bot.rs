use std::{collections::HashMap, sync::Arc};

use anyhow::Context as _;
use serde_json::Value;
use tracing::{debug, info, trace};

use crate::{
    config::BotConfig,
    webhooks::github::{ClassifyError, Event},
};

mod github;
use github::{
    handle_card_moved, handle_merged, handle_review_comment, handle_review_requested,
    review_trigger, Context,
};

mod message_builder;

pub(crate) mod notification;
pub use notification::Notification;

mod subscriptions;
use subscriptions::Subscriptions;

pub(crate) mod teams;

pub(crate) mod utils;

/// Turns GitHub events into Slack notifications, following the subscriptions configured in
/// [`BotConfig`].
pub struct Bot {
    subscriptions: Subscriptions,
}

impl Bot {
    /// Creates a new [`Bot`] and registers its subscriptions.
    ///
    /// Project card and merge subscriptions are only registered when the matching columns and
    /// deployers team are configured.
    pub fn new(config: &BotConfig) -> anyhow::Result<Self> {
        let context = Arc::new(Context::from_config(config));
        let mut subscriptions = Subscriptions::new();

        let ctx = context.clone();
        subscriptions.on_review_requested(move |event| handle_review_requested(&ctx, event));

        let trigger = review_trigger(&context.teams).context("couldn't build review trigger")?;
        let ctx = context.clone();
        subscriptions.on_issue_comment_created(trigger, move |event, captures| {
            handle_review_comment(&ctx, event, captures)
        });

        if let (Some(progress), Some(review)) = (config.progress_column, config.review_column) {
            let ctx = context.clone();
            subscriptions.on_project_card_moved(progress, review, move |event| {
                handle_card_moved(&ctx, event)
            });
        }

        if let Some(deployers) = config.deployers_team.clone() {
            let ctx = context.clone();
            subscriptions.on_merged_into(config.default_branch.clone(), move |event| {
                handle_merged(&ctx, &deployers, event)
            });
        }

        info!(
            "registered {} subscriptions for {} teams",
            subscriptions.len(),
            context.teams.len()
        );

        Ok(Self { subscriptions })
    }

    /// Classifies a webhook delivery and dispatches it.
    ///
    /// Returns the notification to send, if any subscription produced one. Unsupported event
    /// types are an error.
    pub fn handle(
        &self,
        headers: &HashMap<String, String>,
        payload: Value,
    ) -> Result<Option<Notification>, ClassifyError> {
        let event = Event::classify(headers, payload)?;
        debug!("received {} event {}", event.kind(), event.id);

        Ok(self.dispatch(&event))
    }

    pub fn dispatch(&self, event: &Event) -> Option<Notification> {
        let notification = self.subscriptions.dispatch(event);
        if notification.is_none() {
            trace!("event {} didn't need to be announced", event.id);
        }
        notification
    }
}
