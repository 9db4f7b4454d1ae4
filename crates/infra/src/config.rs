//! Assembler configuration.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub const FETCH_CONCURRENCY_VAR: &str = "PRICEY_FETCH_CONCURRENCY";
pub const FETCH_TIMEOUT_MS_VAR: &str = "PRICEY_FETCH_TIMEOUT_MS";

/// Quote assembler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Maximum reference fetches in flight at once (at least 1)
    pub fetch_concurrency: usize,
    /// Deadline for opening the transaction plus all fetches; `None` waits indefinitely
    pub fetch_timeout: Option<Duration>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
        }
    }
}

impl AssemblerConfig {
    pub fn with_fetch_concurrency(mut self, max: usize) -> Self {
        self.fetch_concurrency = max.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup. Unparseable values are logged and ignored;
    /// a timeout of `0` disables the deadline.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(FETCH_CONCURRENCY_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.fetch_concurrency = n,
                _ => warn!(
                    var = FETCH_CONCURRENCY_VAR,
                    value = %raw,
                    "invalid fetch concurrency; using default"
                ),
            }
        }

        if let Some(raw) = lookup(FETCH_TIMEOUT_MS_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.fetch_timeout = None,
                Ok(ms) => config.fetch_timeout = Some(Duration::from_millis(ms)),
                Err(_) => warn!(
                    var = FETCH_TIMEOUT_MS_VAR,
                    value = %raw,
                    "invalid fetch timeout; using default"
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(AssemblerConfig::from_lookup(lookup(&[])), AssemblerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AssemblerConfig::from_lookup(lookup(&[
            (FETCH_CONCURRENCY_VAR, "3"),
            (FETCH_TIMEOUT_MS_VAR, "1500"),
        ]));
        assert_eq!(config.fetch_concurrency, 3);
        assert_eq!(config.fetch_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let config = AssemblerConfig::from_lookup(lookup(&[(FETCH_TIMEOUT_MS_VAR, "0")]));
        assert_eq!(config.fetch_timeout, None);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let config = AssemblerConfig::from_lookup(lookup(&[
            (FETCH_CONCURRENCY_VAR, "0"),
            (FETCH_TIMEOUT_MS_VAR, "soon"),
        ]));
        assert_eq!(config, AssemblerConfig::default());
    }

    #[test]
    fn builder_clamps_concurrency() {
        let config = AssemblerConfig::default().with_fetch_concurrency(0);
        assert_eq!(config.fetch_concurrency, 1);
    }
}
