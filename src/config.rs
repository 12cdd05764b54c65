//! Runtime configuration — server binding, timeouts, and workflow budgets.
//!
//! Groups the ambient knobs the spec calls out in §4.G and §5 (streaming
//! idle timeout, the workflow step budget, the Google-A2A compatibility
//! default) into one struct constructible from the environment, following
//! the builder-with-sane-defaults idiom [`crate::builders::AgentCardBuilder`]
//! already uses for agent cards.

use std::env;
use std::time::Duration;

/// Server host/port and the process-wide timeout and compatibility defaults.
///
/// Every field has a spec-mandated default; [`RuntimeConfig::from_env`]
/// overrides only the fields whose environment variable is set and valid,
/// falling back to the default otherwise (a malformed value is treated as
/// absent, not a startup error).
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Interface the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Idle timeout for a non-streaming request.
    pub request_idle_timeout: Duration,
    /// Idle timeout for an open SSE stream before the server emits
    /// `event: error` and closes (spec default: 300s).
    pub stream_idle_timeout: Duration,
    /// Safety budget bounding total workflow scheduler steps (spec default: 1000).
    pub workflow_max_steps: usize,
    /// Whether [`crate::types::Message::to_dict`] defaults to the Google A2A
    /// dialect process-wide. Applied via [`RuntimeConfig::apply_dialect_default`].
    pub google_a2a_compat_default: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7420,
            request_idle_timeout: Duration::from_secs(30),
            stream_idle_timeout: Duration::from_secs(300),
            workflow_max_steps: crate::workflow::DEFAULT_MAX_STEPS,
            google_a2a_compat_default: false,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from defaults overridden by `A2A_HOST`, `A2A_PORT`,
    /// `A2A_STREAM_IDLE_TIMEOUT_SECS`, and `A2A_WORKFLOW_MAX_STEPS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("A2A_HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("A2A_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        if let Ok(secs) = env::var("A2A_STREAM_IDLE_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.stream_idle_timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(steps) = env::var("A2A_WORKFLOW_MAX_STEPS") {
            if let Ok(steps) = steps.parse() {
                config.workflow_max_steps = steps;
            }
        }
        if let Ok(flag) = env::var("A2A_GOOGLE_A2A_COMPAT") {
            if let Ok(flag) = flag.parse() {
                config.google_a2a_compat_default = flag;
            }
        }

        config
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_stream_idle_timeout(mut self, timeout: Duration) -> Self {
        self.stream_idle_timeout = timeout;
        self
    }

    pub fn with_workflow_max_steps(mut self, max_steps: usize) -> Self {
        self.workflow_max_steps = max_steps;
        self
    }

    /// The `host:port` socket address string for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Applies `google_a2a_compat_default` to the process-wide dialect flag
    /// (see [`crate::dialect`]) that governs `Message::to_dict`/`from_dict`.
    ///
    /// Call this once at startup, before serving requests.
    pub fn apply_dialect_default(&self) {
        crate::dialect::set_google_a2a_compat(self.google_a2a_compat_default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = RuntimeConfig::default();
        assert_eq!(config.stream_idle_timeout, Duration::from_secs(300));
        assert_eq!(config.workflow_max_steps, 1000);
        assert!(!config.google_a2a_compat_default);
    }

    #[test]
    fn from_env_overrides_only_set_vars() {
        env::set_var("A2A_PORT", "9999");
        env::remove_var("A2A_HOST");
        let config = RuntimeConfig::from_env();
        assert_eq!(config.port, 9999);
        assert_eq!(config.host, RuntimeConfig::default().host);
        env::remove_var("A2A_PORT");
    }

    #[test]
    fn from_env_ignores_malformed_values() {
        env::set_var("A2A_PORT", "not-a-port");
        let config = RuntimeConfig::from_env();
        assert_eq!(config.port, RuntimeConfig::default().port);
        env::remove_var("A2A_PORT");
    }

    #[test]
    fn bind_address_formats_host_and_port() {
        let config = RuntimeConfig::default().with_host("127.0.0.1").with_port(3000);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn apply_dialect_default_sets_the_process_wide_flag() {
        let previous = crate::dialect::google_a2a_compat();

        let mut config = RuntimeConfig::default();
        config.google_a2a_compat_default = true;
        config.apply_dialect_default();
        assert!(crate::dialect::google_a2a_compat());

        crate::dialect::set_google_a2a_compat(previous);
    }

    #[test]
    fn from_env_overrides_google_a2a_compat() {
        env::set_var("A2A_GOOGLE_A2A_COMPAT", "true");
        let config = RuntimeConfig::from_env();
        assert!(config.google_a2a_compat_default);
        env::remove_var("A2A_GOOGLE_A2A_COMPAT");
    }
}
