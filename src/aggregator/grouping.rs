//! Derive a coarse group label from a record location.
//!
//! Rules are tried in order and the first non-empty match wins:
//! 1. framework-internal code collapses to `<prefix>/<framework>/<package>`
//! 2. anything else with a directory collapses to that directory
//! 3. catch-all: the location itself
//!
//! Example: "/usr/lib/django/db/models/query.py" -> "/usr/lib/django/db",
//! "/app/lib/util.py" -> "/app/lib".

use crate::utils::config::DEFAULT_FRAMEWORK;
use crate::utils::error::ConfigError;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default rule chain, compiled once per process
static DEFAULT_RULES: Lazy<GroupRules> = Lazy::new(|| {
    GroupRules::for_framework(DEFAULT_FRAMEWORK).expect("Invalid default group pattern")
});

/// A single pattern in the rule chain
#[derive(Debug, Clone)]
pub struct GroupRule {
    name: &'static str,
    pattern: Regex,
}

impl GroupRule {
    /// Compile a rule
    ///
    /// If the pattern has a capture group, group 1 is the label;
    /// otherwise the whole match is.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Try to extract a label; empty matches count as no match
    pub fn extract<'a>(&self, location: &'a str) -> Option<&'a str> {
        let caps = self.pattern.captures(location)?;
        let label = caps.get(1).or_else(|| caps.get(0))?.as_str();
        (!label.is_empty()).then_some(label)
    }
}

/// Ordered, first-match-wins rule chain
#[derive(Debug, Clone)]
pub struct GroupRules {
    rules: Vec<GroupRule>,
}

impl GroupRules {
    /// Build from an explicit list; order is preserved
    pub fn new(rules: Vec<GroupRule>) -> Self {
        Self { rules }
    }

    /// Standard chain with `framework` as the internal-code marker
    pub fn for_framework(framework: &str) -> Result<Self, ConfigError> {
        debug!("Compiling group rules for framework marker {:?}", framework);

        let framework_pattern = format!("^.*/{}/[^/]+", regex::escape(framework));
        Ok(Self::new(vec![
            GroupRule::new("framework", &framework_pattern)?,
            GroupRule::new("directory", r"^(.*)/[^/]+$")?,
            GroupRule::new("catch_all", r"(?s)^.*$")?,
        ]))
    }

    pub fn rules(&self) -> &[GroupRule] {
        &self.rules
    }

    /// Label for `location`
    ///
    /// Never empty for non-empty input as long as the chain ends in a
    /// catch-all rule; falls back to the location itself otherwise.
    pub fn derive_group<'a>(&self, location: &'a str) -> &'a str {
        self.rules
            .iter()
            .find_map(|rule| rule.extract(location))
            .unwrap_or(location)
    }
}

impl Default for GroupRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

/// Derive a group with the default rule chain
///
/// **Public** - convenience wrapper around [`GroupRules::derive_group`]
pub fn derive_group(location: &str) -> &str {
    DEFAULT_RULES.derive_group(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_rule() {
        assert_eq!(
            derive_group("/usr/lib/python2.7/site-packages/django/db/models/query.py"),
            "/usr/lib/python2.7/site-packages/django/db"
        );
        assert_eq!(derive_group("/env/django/shortcuts.py"), "/env/django/shortcuts.py");
    }

    #[test]
    fn test_directory_rule() {
        assert_eq!(derive_group("/app/views.py"), "/app");
        assert_eq!(derive_group("/app/lib/util.py"), "/app/lib");
        assert_eq!(derive_group("app/models.py"), "app");
    }

    #[test]
    fn test_catch_all_rule() {
        assert_eq!(derive_group("~"), "~");
        assert_eq!(derive_group("<string>"), "<string>");
        // Directory rule would yield an empty label here
        assert_eq!(derive_group("/views.py"), "/views.py");
        assert_eq!(derive_group("/app/"), "/app/");
    }

    #[test]
    fn test_custom_framework() {
        let rules = GroupRules::for_framework("flask").unwrap();
        assert_eq!(
            rules.derive_group("/venv/flask/app/routing.py"),
            "/venv/flask/app"
        );
        // django is an ordinary directory now
        assert_eq!(
            rules.derive_group("/venv/django/db/models/query.py"),
            "/venv/django/db/models"
        );
    }

    #[test]
    fn test_framework_marker_is_escaped() {
        let rules = GroupRules::for_framework("a.b").unwrap();
        assert_eq!(rules.derive_group("/x/axb/pkg/mod.py"), "/x/axb/pkg");
        assert_eq!(rules.derive_group("/x/a.b/pkg/mod.py"), "/x/a.b/pkg");
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = GroupRules::default().rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["framework", "directory", "catch_all"]);
    }

    #[test]
    fn test_chain_without_catch_all_falls_back() {
        let rules = GroupRules::new(vec![GroupRule::new("directory", r"^(.*)/[^/]+$").unwrap()]);
        assert_eq!(rules.derive_group("plain"), "plain");
    }
}
