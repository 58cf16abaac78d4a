use serde::Deserialize;

use crate::webhooks::github::events::{
    GitHubUser, PullRequest, Repository, RequestedReviewer, TeamRef,
};

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub repository: Repository,
    pub sender: GitHubUser,
    pub pull_request: PullRequest,
    pub action: String,
    // only sent with `review_requested`, one of them is set
    pub requested_team: Option<TeamRef>,
    pub requested_reviewer: Option<RequestedReviewer>,
}

impl PullRequestEvent {
    pub fn is_review_requested(&self) -> bool {
        self.action == "review_requested"
    }

    pub fn is_merged_into(&self, branch: &str) -> bool {
        self.action == "closed"
            && self.pull_request.merged == Some(true)
            && self.pull_request.base.r#ref == branch
    }

    /// Logins of the users, rather than teams, asked for review.
    pub fn individual_reviewers(&self) -> Vec<&str> {
        let mut logins = self
            .pull_request
            .requested_reviewers
            .iter()
            .chain(&self.requested_reviewer)
            .map(|reviewer| reviewer.login.as_str())
            .collect::<Vec<_>>();
        logins.sort_unstable();
        logins.dedup();
        logins
    }
}
