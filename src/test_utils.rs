//! Webhook payloads and configuration shared by the unit tests.

use std::collections::HashMap;

use hmac::{Hmac, Mac, NewMac};
use serde_json::{json, Value};
use sha2::Sha256;

use crate::config::BotConfig;

pub(crate) const CONFIG: &str = r##"
app_name: Badass
teams:
  - id: "1"
    name: foo
    channel: "#foo"
    github_team_name: github-foo
  - id: "2"
    name: bar
    channel: "#bar"
  - id: "3"
    name: baz
deployers_team: foo
progress_column: 2038543
review_column: 2038567
team_aliases:
  github-foo: foo
"##;

pub(crate) fn config() -> BotConfig {
    serde_yaml::from_str(CONFIG).expect("test config should parse")
}

/// `X-Hub-Signature-256` value for `data`.
pub(crate) fn sign(secret: &str, data: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("any key size works");
    mac.update(data.as_bytes());
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

pub(crate) fn headers(event_type: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("X-GitHub-Event".to_owned(), event_type.to_owned());
    headers
}

fn sender() -> Value {
    json!({
        "login": "slavcodev",
        "url": "https://api.github.com/users/slavcodev",
        "html_url": "https://github.com/slavcodev",
        "avatar_url": "https://avatars1.githubusercontent.com/u/757721?v=4"
    })
}

pub(crate) fn project_card_moved(from: u64, to: u64) -> Value {
    json!({
        "action": "moved",
        "changes": { "column_id": { "from": from } },
        "project_card": {
            "column_id": to,
            "content_url": "https://api.github.com/repos/foo/bar/issues/150"
        },
        "repository": { "full_name": "foo/bar" },
        "sender": sender()
    })
}

/// A note card created on an organization board: no repository, no content.
pub(crate) fn org_note_card_created() -> Value {
    json!({
        "action": "created",
        "project_card": { "column_id": 1, "content_url": null },
        "sender": sender()
    })
}

/// A card moved on an organization board, which GitHub sends without a repository.
pub(crate) fn org_card_moved(from: u64, to: u64) -> Value {
    let mut payload = project_card_moved(from, to);
    payload
        .as_object_mut()
        .expect("fixture is an object")
        .remove("repository");
    payload
}

pub(crate) fn comment(action: &str, body: &str) -> Value {
    json!({
        "action": action,
        "issue": { "url": "https://api.github.com/repos/foo/bar/issues/150" },
        "comment": { "body": body },
        "repository": { "full_name": "foo/bar" },
        "sender": sender()
    })
}

pub(crate) fn comment_created(body: &str) -> Value {
    comment("created", body)
}

fn pull_request(action: &str, merged: bool, base: &str) -> Value {
    json!({
        "action": action,
        "number": 100,
        "pull_request": {
            "url": "https://api.github.com/repos/baxterthehacker/public-repo/pulls/100",
            "html_url": "https://github.com/baxterthehacker/public-repo/pull/100",
            "number": 100,
            "title": "Update the README with new information",
            "merged_at": null,
            "merged": merged,
            "base": { "ref": base },
            "requested_reviewers": [],
            "requested_teams": []
        },
        "repository": { "full_name": "foo/bar" },
        "sender": sender()
    })
}

pub(crate) fn pull_request_merged(merged: bool, base: &str) -> Value {
    pull_request("closed", merged, base)
}

/// A `review_requested` delivery, for a team when `team` is set and for a single user otherwise.
pub(crate) fn review_requested(team: Option<&str>) -> Value {
    let mut payload = pull_request("review_requested", false, "master");
    match team {
        Some(team) => payload["requested_team"] = json!({ "name": team }),
        None => {
            payload["requested_reviewer"] = json!({ "login": "octocat" });
            payload["pull_request"]["requested_reviewers"] = json!([{ "login": "octocat" }]);
        }
    }
    payload
}
