use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::bot::utils::trailing_number;

mod issue_comment;
mod project_card;
mod pull_request;

pub use issue_comment::*;
pub use project_card::*;
pub use pull_request::*;

pub const X_GITHUB_EVENT: &str = "X-GitHub-Event";
pub const X_GITHUB_DELIVERY: &str = "X-GitHub-Delivery";

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("missing X-GitHub-Event header")]
    MissingEventType,

    #[error("unsupported event: {0}")]
    Unsupported(String),

    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The event types the bot subscribes to, as named by the `X-GitHub-Event` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitHubEventType {
    ProjectCard,
    IssueComment,
    PullRequest,
}

impl GitHubEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectCard => "project_card",
            Self::IssueComment => "issue_comment",
            Self::PullRequest => "pull_request",
        }
    }
}

#[derive(Debug)]
pub enum GitHubEvent {
    ProjectCard(ProjectCardEvent),
    IssueComment(IssueCommentEvent),
    PullRequest(PullRequestEvent),
}

impl GitHubEvent {
    fn from_payload(kind: GitHubEventType, payload: Value) -> Result<Self, ClassifyError> {
        let malformed = |source: serde_json::Error| ClassifyError::MalformedPayload {
            kind: kind.as_str(),
            source,
        };

        Ok(match kind {
            GitHubEventType::ProjectCard => {
                Self::ProjectCard(serde_json::from_value(payload).map_err(malformed)?)
            }
            GitHubEventType::IssueComment => {
                Self::IssueComment(serde_json::from_value(payload).map_err(malformed)?)
            }
            GitHubEventType::PullRequest => {
                Self::PullRequest(serde_json::from_value(payload).map_err(malformed)?)
            }
        })
    }
}

/// A classified webhook delivery.
#[derive(Debug)]
pub struct Event {
    /// Delivery identifier, only used to correlate log lines.
    pub id: String,
    pub payload: GitHubEvent,
}

impl Event {
    /// Classifies a webhook delivery from its headers and JSON body.
    ///
    /// Header names are matched case-insensitively. A missing delivery header is replaced by a
    /// random identifier.
    pub fn classify(
        headers: &HashMap<String, String>,
        payload: Value,
    ) -> Result<Self, ClassifyError> {
        let event_type = header(headers, X_GITHUB_EVENT).ok_or(ClassifyError::MissingEventType)?;
        let kind = serde_json::from_value::<GitHubEventType>(Value::String(event_type.to_owned()))
            .map_err(|_| ClassifyError::Unsupported(event_type.to_owned()))?;

        let id = header(headers, X_GITHUB_DELIVERY)
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Self {
            id,
            payload: GitHubEvent::from_payload(kind, payload)?,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self.payload {
            GitHubEvent::ProjectCard(_) => GitHubEventType::ProjectCard,
            GitHubEvent::IssueComment(_) => GitHubEventType::IssueComment,
            GitHubEvent::PullRequest(_) => GitHubEventType::PullRequest,
        }
        .as_str()
    }

    pub fn as_project_card(&self) -> Option<&ProjectCardEvent> {
        match &self.payload {
            GitHubEvent::ProjectCard(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_issue_comment(&self) -> Option<&IssueCommentEvent> {
        match &self.payload {
            GitHubEvent::IssueComment(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_pull_request(&self) -> Option<&PullRequestEvent> {
        match &self.payload {
            GitHubEvent::PullRequest(event) => Some(event),
            _ => None,
        }
    }
}

fn header<'h>(headers: &'h HashMap<String, String>, name: &str) -> Option<&'h str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub html_url: Url,
    pub avatar_url: Url,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

impl Repository {
    pub fn issue_url(&self, number: u64) -> String {
        format!("https://github.com/{}/issues/{}", self.full_name, number)
    }
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub url: Url,
    pub number: Option<u64>,
}

impl Issue {
    /// Number of the issue, read from the API URL when the payload doesn't carry it.
    pub fn number(&self) -> Option<u64> {
        self.number.or_else(|| trailing_number(self.url.as_str()))
    }
}

#[derive(Debug, Deserialize)]
pub struct Comment {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: Url,
    #[serde(default)]
    pub merged: Option<bool>,
    pub base: PrRef,
    #[serde(default)]
    pub requested_reviewers: Vec<RequestedReviewer>,
}

#[derive(Debug, Deserialize)]
pub struct PrRef {
    pub r#ref: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestedReviewer {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamRef {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::{
        comment_created, headers, org_card_moved, org_note_card_created, project_card_moved,
        pull_request_merged, review_requested,
    };

    #[test]
    fn unsupported_event_type_is_an_error() {
        let err = Event::classify(&headers("unknown_event"), json!({})).unwrap_err();

        assert!(matches!(err, ClassifyError::Unsupported(ref name) if name == "unknown_event"));
        assert_eq!(err.to_string(), "unsupported event: unknown_event");
    }

    #[test]
    fn missing_event_type_is_an_error() {
        let err = Event::classify(&HashMap::new(), json!({})).unwrap_err();

        assert!(matches!(err, ClassifyError::MissingEventType));
    }

    #[test]
    fn malformed_payload_names_its_kind() {
        let err = Event::classify(&headers("issue_comment"), json!({ "action": "created" }))
            .unwrap_err();

        match err {
            ClassifyError::MalformedPayload { kind, .. } => assert_eq!(kind, "issue_comment"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_names_are_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("x-github-event".to_owned(), "project_card".to_owned());
        headers.insert("x-github-delivery".to_owned(), "72d3162e".to_owned());

        let event = Event::classify(&headers, project_card_moved(2038543, 2038567)).unwrap();

        assert_eq!(event.kind(), "project_card");
        assert_eq!(event.id, "72d3162e");
    }

    #[test]
    fn missing_delivery_gets_a_random_id() {
        let first = Event::classify(&headers("issue_comment"), comment_created("please review"))
            .unwrap();
        let second = Event::classify(&headers("issue_comment"), comment_created("please review"))
            .unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn project_card_moved_exact_transition() {
        let event = Event::classify(&headers("project_card"), project_card_moved(2038543, 2038567))
            .unwrap();
        let card = event.as_project_card().unwrap();

        assert!(card.is_moved(2038543, 2038567));
        assert!(!card.is_moved(2038567, 2038543));
        assert!(!card.is_moved(2038543, 1));
    }

    #[test]
    fn project_card_without_repository() {
        let event = Event::classify(&headers("project_card"), org_note_card_created()).unwrap();
        let card = event.as_project_card().unwrap();

        assert!(card.repository.is_none());
        assert!(card.project_card.issue_number().is_none());
        assert!(!card.is_moved(2038543, 2038567));

        let event =
            Event::classify(&headers("project_card"), org_card_moved(2038543, 2038567)).unwrap();
        assert!(event.as_project_card().unwrap().is_moved(2038543, 2038567));
    }

    #[test]
    fn issue_number_falls_back_to_url() {
        let event = Event::classify(&headers("issue_comment"), comment_created("please review"))
            .unwrap();

        assert_eq!(event.as_issue_comment().unwrap().issue.number(), Some(150));
    }

    #[test]
    fn pull_request_predicates() {
        let merged = Event::classify(&headers("pull_request"), pull_request_merged(true, "master"))
            .unwrap();
        let merged = merged.as_pull_request().unwrap();
        assert!(merged.is_merged_into("master"));
        assert!(!merged.is_merged_into("main"));
        assert!(!merged.is_review_requested());

        let unmerged =
            Event::classify(&headers("pull_request"), pull_request_merged(false, "master"))
                .unwrap();
        assert!(!unmerged.as_pull_request().unwrap().is_merged_into("master"));

        let requested =
            Event::classify(&headers("pull_request"), review_requested(Some("bar"))).unwrap();
        assert!(requested.as_pull_request().unwrap().is_review_requested());
    }

    #[test]
    fn individual_reviewers_are_deduplicated() {
        let event = Event::classify(&headers("pull_request"), review_requested(None)).unwrap();
        let pr = event.as_pull_request().unwrap();

        assert!(pr.requested_team.is_none());
        assert_eq!(pr.individual_reviewers(), ["octocat"]);
    }

    #[test]
    fn classification_is_idempotent() {
        let payload = project_card_moved(2038543, 2038567);
        let first = Event::classify(&headers("project_card"), payload.clone()).unwrap();
        let second = Event::classify(&headers("project_card"), payload).unwrap();

        assert_eq!(first.kind(), second.kind());
        assert_eq!(
            first.as_project_card().unwrap().is_moved(2038543, 2038567),
            second.as_project_card().unwrap().is_moved(2038543, 2038567),
        );
    }
}
