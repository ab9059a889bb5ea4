//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// `EnvFilter` directive, e.g. `info` or `tally_accounting=debug`.
    pub filter: String,
    /// JSON lines when true, compact human-readable lines otherwise.
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json: true,
        }
    }
}

impl TracingConfig {
    /// Default config with the filter taken from `RUST_LOG` when set.
    pub fn from_env() -> Self {
        let filter = std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn compact(mut self) -> Self {
        self.json = false;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Build the filter, falling back to `info` on an invalid directive.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

pub fn init() {
    init_with(TracingConfig::from_env());
}

pub fn init_with(config: TracingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.compact().try_init().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_json_at_info() {
        let config = TracingConfig::default();
        assert_eq!(config.filter, "info");
        assert!(config.json);
    }

    #[test]
    fn builders_override_fields() {
        let config = TracingConfig::default()
            .with_filter("tally_accounting=debug")
            .compact();
        assert_eq!(config.filter, "tally_accounting=debug");
        assert!(!config.json);
        assert_eq!(
            config.env_filter().to_string(),
            "tally_accounting=debug"
        );
    }

    #[test]
    fn invalid_directive_falls_back_to_info() {
        let config = TracingConfig::default().with_filter("tally=loud");
        assert_eq!(config.env_filter().to_string(), "info");
    }

    #[test]
    fn second_init_is_a_no_op() {
        let _ = init_with(TracingConfig::default().compact());
        assert!(!init_with(TracingConfig::default()));
        init();
    }
}
