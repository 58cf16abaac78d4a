use std::collections::HashMap;

use crate::config::TeamConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub channel: String,
    pub github_team_name: String,
}

impl Team {
    pub fn from_config(config: &TeamConfig, general_channel: &str) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            channel: config
                .channel
                .clone()
                .unwrap_or_else(|| general_channel.to_owned()),
            github_team_name: config
                .github_team_name
                .clone()
                .unwrap_or_else(|| config.name.clone()),
        }
    }
}

/// Teams by name, remembering the order they were added in.
#[derive(Debug, Default)]
pub struct TeamDirectory {
    teams: Vec<Team>,
    by_name: HashMap<String, usize>,
}

impl TeamDirectory {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_config(teams: &[TeamConfig], general_channel: &str) -> Self {
        let mut directory = Self::new();
        for team in teams {
            directory.add(Team::from_config(team, general_channel));
        }
        directory
    }

    /// Adds a team. A team with the same name is replaced but keeps its position.
    pub fn add(&mut self, team: Team) {
        match self.by_name.get(&team.name) {
            Some(&index) => self.teams[index] = team,
            None => {
                self.by_name.insert(team.name.clone(), self.teams.len());
                self.teams.push(team);
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&Team> {
        self.by_name.get(name).map(|&index| &self.teams[index])
    }

    /// Looks a team up the way a `(?i)` regex matches it, folding case beyond ASCII.
    pub fn resolve_ignore_case(&self, name: &str) -> Option<&Team> {
        self.resolve(name).or_else(|| {
            let name = name.to_lowercase();
            self.teams
                .iter()
                .find(|team| team.name.to_lowercase() == name)
        })
    }

    pub fn resolve_by_github_name(&self, github_team_name: &str) -> Option<&Team> {
        self.teams
            .iter()
            .find(|team| team.github_team_name == github_team_name)
    }

    /// The first team added.
    pub fn default_team(&self) -> Option<&Team> {
        self.teams.first()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|team| team.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    fn directory() -> TeamDirectory {
        TeamDirectory::from_config(&test_utils::config().teams, "#general")
    }

    #[test]
    fn channel_and_github_name_defaults() {
        let teams = directory();

        let baz = teams.resolve("baz").unwrap();
        assert_eq!(baz.channel, "#general");
        assert_eq!(baz.github_team_name, "baz");

        let foo = teams.resolve("foo").unwrap();
        assert_eq!(foo.channel, "#foo");
        assert_eq!(foo.github_team_name, "github-foo");
    }

    #[test]
    fn names_keep_registration_order() {
        let teams = directory();

        assert_eq!(teams.names().collect::<Vec<_>>(), ["foo", "bar", "baz"]);
        assert_eq!(teams.default_team().unwrap().name, "foo");
    }

    #[test]
    fn duplicate_name_overwrites_in_place() {
        let mut teams = directory();
        teams.add(Team {
            id: "9".to_owned(),
            name: "foo".to_owned(),
            channel: "#foo-2".to_owned(),
            github_team_name: "foo".to_owned(),
        });

        assert_eq!(teams.len(), 3);
        assert_eq!(teams.names().collect::<Vec<_>>(), ["foo", "bar", "baz"]);
        assert_eq!(teams.resolve("foo").unwrap().channel, "#foo-2");
        assert_eq!(teams.default_team().unwrap().id, "9");
    }

    #[test]
    fn lookups() {
        let teams = directory();

        assert!(teams.resolve("BAR").is_none());
        assert_eq!(teams.resolve_ignore_case("BAR").unwrap().name, "bar");
        assert_eq!(teams.resolve_by_github_name("github-foo").unwrap().name, "foo");
        assert!(teams.resolve_by_github_name("foo").is_none());
        assert!(teams.resolve("qux").is_none());
        assert!(TeamDirectory::new().default_team().is_none());
    }

    #[test]
    fn non_ascii_names_ignore_case() {
        let mut teams = directory();
        teams.add(Team {
            id: "4".to_owned(),
            name: "Ärzte".to_owned(),
            channel: "#aerzte".to_owned(),
            github_team_name: "aerzte".to_owned(),
        });

        assert!(teams.resolve("ärzte").is_none());
        assert_eq!(teams.resolve_ignore_case("ärzte").unwrap().id, "4");
        assert_eq!(teams.resolve_ignore_case("ÄRZTE").unwrap().id, "4");
    }
}
