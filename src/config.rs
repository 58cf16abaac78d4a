use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Teams, in order of preference: the first one is the default team for review requests
    /// that don't name one.
    pub teams: Vec<TeamConfig>,
    /// Project column cards leave when they are ready for review.
    pub progress_column: Option<u64>,
    /// Project column cards enter when they are ready for review.
    pub review_column: Option<u64>,
    /// Team notified when a pull request is merged into the default branch.
    pub deployers_team: Option<String>,
    /// Username the bot posts as. Without it, Slack uses the webhook's own identity.
    pub app_name: Option<String>,
    pub app_icon: Option<String>,
    /// Channel for teams that don't set one.
    #[serde(default = "default_general_channel")]
    pub general_channel: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// GitHub team names mapped to the name of the team that should be notified instead.
    #[serde(default)]
    pub team_aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub review_team_policy: ReviewTeamPolicy,
    /// Secret used to sign GitHub deliveries. Signatures aren't checked when absent.
    pub github_secret: Option<String>,
    /// Slack incoming webhook. Notifications are only returned to GitHub when absent.
    pub slack_webhook_url: Option<Url>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    /// Slack user group ID, used to mention the team
    pub id: String,
    pub name: String,
    pub channel: Option<String>,
    /// Name of the matching GitHub team, defaults to `name`
    pub github_team_name: Option<String>,
}

/// How the team named by a `review_requested` pull request event is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTeamPolicy {
    /// Look the GitHub team up in `team_aliases`, then among team names.
    #[default]
    AliasTable,
    /// Match the GitHub team against each team's `github_team_name`.
    GithubTeamName,
}

fn default_general_channel() -> String {
    "#general".to_owned()
}

fn default_branch() -> String {
    "master".to_owned()
}

impl BotConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config_file =
            File::open(path).with_context(|| format!("couldn't open {}:", path.display()))?;

        serde_yaml::from_reader(BufReader::new(config_file)).context("couldn't parse config file")
    }
}
