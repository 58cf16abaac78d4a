use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::{
    bot::notification::Notification,
    webhooks::github::{Event, IssueCommentEvent, ProjectCardEvent, PullRequestEvent},
};

type Predicate = Box<dyn Fn(&Event) -> bool + Send + Sync>;
type Handler = Box<dyn Fn(&Event) -> Option<Notification> + Send + Sync>;

struct Subscription {
    name: &'static str,
    predicate: Predicate,
    handler: Handler,
}

/// Rules an event is matched against, in registration order.
#[derive(Default)]
pub struct Subscriptions {
    subscriptions: Vec<Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn register<P, H>(&mut self, name: &'static str, predicate: P, handler: H)
    where
        P: Fn(&Event) -> bool + Send + Sync + 'static,
        H: Fn(&Event) -> Option<Notification> + Send + Sync + 'static,
    {
        trace!("registering subscription `{}`", name);
        self.subscriptions.push(Subscription {
            name,
            predicate: Box::new(predicate),
            handler: Box::new(handler),
        });
    }

    pub fn on_review_requested<H>(&mut self, handler: H)
    where
        H: Fn(&PullRequestEvent) -> Option<Notification> + Send + Sync + 'static,
    {
        self.register(
            "review requested",
            |event| {
                event
                    .as_pull_request()
                    .map_or(false, PullRequestEvent::is_review_requested)
            },
            move |event| event.as_pull_request().and_then(&handler),
        );
    }

    /// Subscribes to newly created comments whose body matches `pattern`.
    pub fn on_issue_comment_created<H>(&mut self, pattern: Regex, handler: H)
    where
        H: Fn(&IssueCommentEvent, &Captures<'_>) -> Option<Notification> + Send + Sync + 'static,
    {
        let matcher = pattern.clone();
        self.register(
            "issue comment created",
            move |event| {
                event.as_issue_comment().map_or(false, |comment| {
                    comment.is_created() && matcher.is_match(&comment.comment.body)
                })
            },
            move |event| {
                let comment = event.as_issue_comment()?;
                let captures = comment.match_trigger(&pattern)?;
                handler(comment, &captures)
            },
        );
    }

    pub fn on_project_card_moved<H>(&mut self, from: u64, to: u64, handler: H)
    where
        H: Fn(&ProjectCardEvent) -> Option<Notification> + Send + Sync + 'static,
    {
        self.register(
            "project card moved",
            move |event| {
                event
                    .as_project_card()
                    .map_or(false, |card| card.is_moved(from, to))
            },
            move |event| event.as_project_card().and_then(&handler),
        );
    }

    pub fn on_merged_into<H>(&mut self, branch: String, handler: H)
    where
        H: Fn(&PullRequestEvent) -> Option<Notification> + Send + Sync + 'static,
    {
        self.register(
            "pull request merged",
            move |event| {
                event
                    .as_pull_request()
                    .map_or(false, |pr| pr.is_merged_into(&branch))
            },
            move |event| event.as_pull_request().and_then(&handler),
        );
    }

    /// Returns the notification of the first matching subscription that produces one.
    pub fn dispatch(&self, event: &Event) -> Option<Notification> {
        self.subscriptions
            .iter()
            .filter(|subscription| (subscription.predicate)(event))
            .find_map(|subscription| {
                debug!("event {} matched `{}`", event.id, subscription.name);
                let notification = (subscription.handler)(event);
                if notification.is_none() {
                    debug!("`{}` declined event {}", subscription.name, event.id);
                }
                notification
            })
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }
}
