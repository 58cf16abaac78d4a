use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::{
    bot::{message_builder::MessageBuilder, teams::Team},
    config::BotConfig,
};

const GOOD: &str = "good";
const DEFAULT_APP_ICON: &str = ":stuck_out_tongue_winking_eye:";

/// A Slack message, in the shape expected by `chat.postMessage` and incoming webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) icon_emoji: Option<String>,
    pub(crate) link_names: u8,
    pub(crate) channel: String,
    pub(crate) attachments: Vec<Attachment>,
}

impl Notification {
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub(crate) color: String,
    pub(crate) author_name: String,
    pub(crate) author_link: String,
    pub(crate) author_icon: String,
    pub(crate) text: String,
    pub(crate) fallback: String,
}

/// Who triggered the notification.
#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub link: String,
    pub icon: String,
}

/// The issue or pull request the notification is about.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: u64,
    pub repository: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    ReviewRequest,
    MergeNotice,
}

impl NoticeKind {
    fn fallback_phrase(self) -> &'static str {
        match self {
            Self::ReviewRequest => "asked for review",
            Self::MergeNotice => "noticed the merge of the",
        }
    }
}

struct AppIdentity {
    name: String,
    icon: String,
}

/// Builds notifications, posting as the configured app identity if there is one.
pub struct Composer {
    app: Option<AppIdentity>,
}

impl Composer {
    pub fn new(app_name: Option<&str>, app_icon: Option<&str>) -> Self {
        let app = app_name.map(|name| AppIdentity {
            name: name.to_owned(),
            icon: app_icon.unwrap_or(DEFAULT_APP_ICON).to_owned(),
        });

        Self { app }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.app_name.as_deref(), config.app_icon.as_deref())
    }

    pub fn review_request(
        &self,
        verb: &str,
        actor: &Actor,
        subject: &Subject,
        team: &Team,
    ) -> Notification {
        self.compose(NoticeKind::ReviewRequest, verb, actor, subject, team)
    }

    pub fn merge_notice(
        &self,
        verb: &str,
        actor: &Actor,
        subject: &Subject,
        team: &Team,
    ) -> Notification {
        self.compose(NoticeKind::MergeNotice, verb, actor, subject, team)
    }

    /// Builds a notification telling `team` about `subject`.
    ///
    /// The attachment text mentions the team, the fallback (used by push notifications and
    /// clients without attachment support) names the actor instead.
    pub fn compose(
        &self,
        kind: NoticeKind,
        verb: &str,
        actor: &Actor,
        subject: &Subject,
        team: &Team,
    ) -> Notification {
        let subject_label = format!("{}#{}", subject.repository, subject.id);

        let mut text = MessageBuilder::new();
        text.mention_team(team);
        write!(text, " {} ", verb.to_lowercase()).unwrap();
        text.link(&subject_label, &subject.link);

        let mut fallback = MessageBuilder::new();
        fallback.link(&actor.name, &actor.link);
        write!(fallback, " {} ", kind.fallback_phrase()).unwrap();
        fallback.link(&subject_label, &subject.link);

        Notification {
            username: self.app.as_ref().map(|app| app.name.clone()),
            icon_emoji: self.app.as_ref().map(|app| app.icon.clone()),
            link_names: 1,
            channel: team.channel.clone(),
            attachments: vec![Attachment {
                color: GOOD.to_owned(),
                author_name: actor.name.clone(),
                author_link: actor.link.clone(),
                author_icon: actor.icon.clone(),
                text: text.build(),
                fallback: fallback.build(),
            }],
        }
    }
}
