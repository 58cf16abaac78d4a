use std::collections::BTreeMap;

use regex::{Captures, Regex};
use tracing::{debug, trace, warn};

use crate::{
    bot::{
        notification::{Actor, Composer, Notification, Subject},
        teams::{Team, TeamDirectory},
    },
    config::{BotConfig, ReviewTeamPolicy},
    webhooks::github::{GitHubUser, IssueCommentEvent, ProjectCardEvent, PullRequestEvent},
};

const PLEASE_REVIEW: &str = "Please review";
const PLEASE_REREVIEW: &str = "Please re-review";
const MERGED: &str = "Merged, going to deploy";

/// Everything the subscriptions need to turn an event into a notification.
pub(crate) struct Context {
    pub(crate) teams: TeamDirectory,
    pub(crate) composer: Composer,
    pub(crate) team_aliases: BTreeMap<String, String>,
    pub(crate) review_team_policy: ReviewTeamPolicy,
}

impl Context {
    pub(crate) fn from_config(config: &BotConfig) -> Self {
        Self {
            teams: TeamDirectory::from_config(&config.teams, &config.general_channel),
            composer: Composer::from_config(config),
            team_aliases: config.team_aliases.clone(),
            review_team_policy: config.review_team_policy,
        }
    }

    /// Finds the team a `review_requested` event is meant for.
    ///
    /// Requests for a GitHub team we don't know about are ignored, requests for individual
    /// reviewers go to the default team.
    fn review_team(&self, event: &PullRequestEvent) -> Option<&Team> {
        let requested = match &event.requested_team {
            Some(team) => team.name.as_str(),
            None => {
                trace!(
                    "review requested from [{}], using default team",
                    event.individual_reviewers().join(", ")
                );
                return self.teams.default_team();
            }
        };

        let team = match self.review_team_policy {
            ReviewTeamPolicy::AliasTable => match self.team_aliases.get(requested) {
                Some(alias) => {
                    let team = self.teams.resolve(alias);
                    if team.is_none() {
                        warn!("alias `{}` of `{}` isn't a known team", alias, requested);
                    }
                    team
                }
                None => self.teams.resolve(requested),
            },
            ReviewTeamPolicy::GithubTeamName => self.teams.resolve_by_github_name(requested),
        };

        if team.is_none() {
            debug!("review requested from unrelated team `{}`", requested);
        }
        team
    }
}

/// Case-insensitive trigger: an optional team name, then `please review` or `please re-review`.
pub(crate) fn review_trigger(teams: &TeamDirectory) -> Result<Regex, regex::Error> {
    let pattern = if teams.is_empty() {
        "(?i)please (?P<again>re-)?review".to_owned()
    } else {
        let names = teams.names().map(regex::escape).collect::<Vec<_>>();
        format!(
            "(?i)(?:(?P<team>{}) )?please (?P<again>re-)?review",
            names.join("|")
        )
    };

    Regex::new(&pattern)
}

fn actor(user: &GitHubUser) -> Actor {
    Actor {
        name: user.login.clone(),
        link: user.html_url.to_string(),
        icon: user.avatar_url.to_string(),
    }
}

pub(crate) fn handle_review_requested(
    context: &Context,
    event: &PullRequestEvent,
) -> Option<Notification> {
    let team = context.review_team(event)?;
    let pr = &event.pull_request;

    let subject = Subject {
        id: pr.number,
        repository: event.repository.full_name.clone(),
        link: pr.html_url.to_string(),
    };

    Some(
        context
            .composer
            .review_request(PLEASE_REVIEW, &actor(&event.sender), &subject, team),
    )
}

pub(crate) fn handle_review_comment(
    context: &Context,
    event: &IssueCommentEvent,
    captures: &Captures<'_>,
) -> Option<Notification> {
    let team = match captures.name("team") {
        Some(name) => context.teams.resolve_ignore_case(name.as_str()),
        None => context.teams.default_team(),
    }?;

    let verb = if captures.name("again").is_some() {
        PLEASE_REREVIEW
    } else {
        PLEASE_REVIEW
    };

    let id = event.issue.number()?;
    let subject = Subject {
        id,
        repository: event.repository.full_name.clone(),
        link: event.repository.issue_url(id),
    };

    Some(
        context
            .composer
            .review_request(verb, &actor(&event.sender), &subject, team),
    )
}

pub(crate) fn handle_card_moved(
    context: &Context,
    event: &ProjectCardEvent,
) -> Option<Notification> {
    let team = context.teams.default_team()?;

    let repository = match &event.repository {
        Some(repository) => repository,
        None => {
            debug!("moved card isn't attached to a repository");
            return None;
        }
    };
    let id = match event.project_card.issue_number() {
        Some(id) => id,
        None => {
            debug!("moved card doesn't point at an issue");
            return None;
        }
    };
    let subject = Subject {
        id,
        repository: repository.full_name.clone(),
        link: repository.issue_url(id),
    };

    Some(
        context
            .composer
            .review_request(PLEASE_REVIEW, &actor(&event.sender), &subject, team),
    )
}

pub(crate) fn handle_merged(
    context: &Context,
    deployers: &str,
    event: &PullRequestEvent,
) -> Option<Notification> {
    let team = match context.teams.resolve(deployers) {
        Some(team) => team,
        None => {
            warn!("deployers team `{}` isn't a known team", deployers);
            return None;
        }
    };
    let pr = &event.pull_request;

    let subject = Subject {
        id: pr.number,
        repository: event.repository.full_name.clone(),
        link: pr.html_url.to_string(),
    };

    Some(
        context
            .composer
            .merge_notice(MERGED, &actor(&event.sender), &subject, team),
    )
}
