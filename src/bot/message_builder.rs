use std::fmt::Write;

use crate::bot::teams::Team;

/// Builds Slack `mrkdwn` text.
///
/// Text written through [`std::fmt::Write`] is escaped, while mentions and links are emitted as
/// Slack control sequences.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    text: String,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn build(self) -> String {
        self.text
    }

    /// Mentions a Slack user group, so that every member gets notified.
    pub fn mention_team(&mut self, team: &Team) {
        self.text.push_str("<!subteam^");
        self.text.push_str(&team.id);
        self.text.push_str("|@");
        self.push_escaped(&team.name);
        self.text.push('>');
    }

    pub fn link(&mut self, text: &str, href: &str) {
        self.text.push('<');
        self.text.push_str(href);
        self.text.push('|');
        self.push_escaped(text);
        self.text.push('>');
    }

    fn push_escaped(&mut self, s: &str) {
        let mut last = 0;
        for (i, c) in s.char_indices() {
            // NOTE: Slack only asks for these three to be escaped, everything else is sent as is
            let escaped = match c {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                _ => continue,
            };

            self.text.push_str(&s[last..i]);
            self.text.push_str(escaped);
            last = i + 1;
        }

        if last < s.len() {
            self.text.push_str(&s[last..]);
        }
    }
}

impl Write for MessageBuilder {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.push_escaped(s);
        Ok(())
    }
}
