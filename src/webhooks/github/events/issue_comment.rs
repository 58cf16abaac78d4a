use regex::{Captures, Regex};
use serde::Deserialize;

use crate::webhooks::github::events::{Comment, GitHubUser, Issue, Repository};

#[derive(Debug, Deserialize)]
pub struct IssueCommentEvent {
    pub sender: GitHubUser,
    pub repository: Repository,
    pub issue: Issue,
    pub action: String,
    pub comment: Comment,
}

impl IssueCommentEvent {
    pub fn is_created(&self) -> bool {
        self.action == "created"
    }

    pub fn match_trigger<'a>(&'a self, pattern: &Regex) -> Option<Captures<'a>> {
        pattern.captures(&self.comment.body)
    }
}
