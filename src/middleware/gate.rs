//! Decide when a response should be replaced by a profiling report.
//!
//! A report is shown only when the request carries the query flag
//! (`?prof`, `&prof=`, ...) and either debug mode is on or the requester is a
//! superuser. Debug mode and identity are passed in explicitly; nothing is
//! read from process-wide settings.

use crate::aggregator::{GroupRules, StatsAggregator};
use crate::utils::config::{ReportConfig, DEFAULT_QUERY_FLAG};
use crate::utils::error::ConfigError;
use log::{debug, info};

/// The parts of an incoming request the gate looks at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Raw query string, with or without the leading `?`
    pub query: String,

    /// Whether the authenticated user has elevated privilege
    pub is_superuser: bool,
}

impl RequestContext {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            is_superuser: false,
        }
    }

    pub fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }

    /// Whether `key` appears as a query parameter, with or without a value
    pub fn has_query_key(&self, key: &str) -> bool {
        self.query
            .trim_start_matches('?')
            .split('&')
            .map(|pair| pair.split_once('=').map_or(pair, |(k, _)| k))
            .any(|k| !k.is_empty() && k == key)
    }
}

/// Response body the report may replace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileResponse {
    pub content: String,
}

impl ProfileResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Profiling report gate
#[derive(Debug, Clone)]
pub struct ProfileGate {
    query_flag: String,
    debug: bool,
    config: ReportConfig,
    rules: GroupRules,
}

impl ProfileGate {
    /// Gate with the `prof` flag and web report limits
    pub fn new(debug: bool) -> Self {
        Self {
            query_flag: DEFAULT_QUERY_FLAG.to_string(),
            debug,
            config: ReportConfig::web(),
            rules: GroupRules::default(),
        }
    }

    /// Gate with custom report settings
    ///
    /// # Errors
    /// * `ConfigError::InvalidFramework` / `InvalidPattern` - unusable framework marker
    pub fn with_config(debug: bool, config: ReportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = GroupRules::for_framework(config.framework.trim())?;
        Ok(Self {
            query_flag: DEFAULT_QUERY_FLAG.to_string(),
            debug,
            config,
            rules,
        })
    }

    pub fn with_query_flag(mut self, flag: impl Into<String>) -> Self {
        self.query_flag = flag.into();
        self
    }

    pub fn query_flag(&self) -> &str {
        &self.query_flag
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Flag present AND (debug OR superuser)
    pub fn should_show_stats(&self, ctx: &RequestContext) -> bool {
        ctx.has_query_key(&self.query_flag) && (self.debug || ctx.is_superuser)
    }

    /// Replace a non-empty response body with the report for `stats_text`
    ///
    /// Returns the response untouched when the gate is closed or the body
    /// is empty.
    pub fn process_response(
        &self,
        ctx: &RequestContext,
        response: ProfileResponse,
        stats_text: &str,
    ) -> ProfileResponse {
        if !self.should_show_stats(ctx) {
            return response;
        }

        if response.content.is_empty() {
            debug!("Empty response body, skipping profiling report");
            return response;
        }

        let aggregator = StatsAggregator::with_rules(
            stats_text,
            self.config.sort_by,
            self.config.group_records,
            self.config.raw_records,
            self.rules.clone(),
        );

        info!(
            "Replacing response with profiling report ({:.3}s total)",
            aggregator.total_time()
        );

        ProfileResponse::new(aggregator.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS: &str = "h1\nh2\nh3\nh4\nh5\n1 0.010 0.010 0.010 0.010 /app/views.py:42(index)\n";

    #[test]
    fn test_has_query_key() {
        assert!(RequestContext::new("prof").has_query_key("prof"));
        assert!(RequestContext::new("?prof").has_query_key("prof"));
        assert!(RequestContext::new("a=1&prof=").has_query_key("prof"));
        assert!(RequestContext::new("a=1&prof=yes&b").has_query_key("prof"));
        assert!(!RequestContext::new("profile=1").has_query_key("prof"));
        assert!(!RequestContext::new("a=prof").has_query_key("prof"));
        assert!(!RequestContext::new("").has_query_key("prof"));
    }

    #[test]
    fn test_should_show_stats_truth_table() {
        let debug_gate = ProfileGate::new(true);
        let prod_gate = ProfileGate::new(false);

        let flagged = RequestContext::new("prof");
        let flagged_admin = RequestContext::new("prof").with_superuser(true);
        let plain_admin = RequestContext::new("page=2").with_superuser(true);

        assert!(debug_gate.should_show_stats(&flagged));
        assert!(!prod_gate.should_show_stats(&flagged));
        assert!(prod_gate.should_show_stats(&flagged_admin));
        assert!(!prod_gate.should_show_stats(&plain_admin));
        assert!(!debug_gate.should_show_stats(&plain_admin));
    }

    #[test]
    fn test_custom_query_flag() {
        let gate = ProfileGate::new(true).with_query_flag("profile");
        assert!(gate.should_show_stats(&RequestContext::new("profile")));
        assert!(!gate.should_show_stats(&RequestContext::new("prof")));
    }

    #[test]
    fn test_process_response_replaces_body() {
        let gate = ProfileGate::new(true);
        let response = gate.process_response(
            &RequestContext::new("prof"),
            ProfileResponse::new("<html>page</html>"),
            STATS,
        );

        assert!(response.content.starts_with("<pre>"));
        assert!(response.content.contains("---- By group ----"));
        assert!(response.content.contains("100.0%   0.010 /app"));
    }

    #[test]
    fn test_process_response_gate_closed() {
        let gate = ProfileGate::new(false);
        let original = ProfileResponse::new("<html>page</html>");
        let response = gate.process_response(&RequestContext::new("prof"), original.clone(), STATS);
        assert_eq!(response, original);
    }

    #[test]
    fn test_process_response_empty_body() {
        let gate = ProfileGate::new(true);
        let response = gate.process_response(
            &RequestContext::new("prof"),
            ProfileResponse::default(),
            STATS,
        );
        assert!(response.content.is_empty());
    }

    #[test]
    fn test_web_limits() {
        let gate = ProfileGate::new(true);
        assert_eq!(gate.config().group_records, 50);
        assert_eq!(gate.config().raw_records, 200);
    }

    #[test]
    fn test_with_config_rejects_bad_framework() {
        let config = ReportConfig {
            framework: " ".to_string(),
            ..ReportConfig::web()
        };
        assert!(ProfileGate::with_config(true, config).is_err());
    }
}
