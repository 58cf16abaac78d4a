use serde::Deserialize;
use url::Url;

use crate::{
    bot::utils::trailing_number,
    webhooks::github::events::{GitHubUser, Repository},
};

#[derive(Debug, Deserialize)]
pub struct ProjectCardEvent {
    pub action: String,
    pub changes: Option<ProjectCardChanges>,
    pub project_card: ProjectCard,
    // missing for cards on organization boards
    pub repository: Option<Repository>,
    pub sender: GitHubUser,
}

impl ProjectCardEvent {
    /// Whether the card was moved from column `from` straight to column `to`.
    pub fn is_moved(&self, from: u64, to: u64) -> bool {
        let moved_from = self
            .changes
            .as_ref()
            .and_then(|changes| changes.column_id.as_ref())
            .map(|column| column.from);

        self.action == "moved" && moved_from == Some(from) && self.project_card.column_id == to
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectCardChanges {
    pub column_id: Option<ColumnChange>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnChange {
    pub from: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProjectCard {
    pub column_id: u64,
    // notes don't point at any issue
    pub content_url: Option<Url>,
}

impl ProjectCard {
    pub fn issue_number(&self) -> Option<u64> {
        self.content_url
            .as_ref()
            .and_then(|url| trailing_number(url.as_str()))
    }
}
