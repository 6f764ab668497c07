use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "debug",
/// "optosim_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Used when neither the config nor `RUST_LOG` names a filter.
/// wgpu's internals are chatty at info.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Filter precedence: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    config
        .env_filter
        .clone()
        .or(rust_log)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .init();

        log::debug!("logging initialized ({filter})");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(filter: Option<&str>) -> LoggingConfig {
        LoggingConfig {
            env_filter: filter.map(str::to_string),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let f = resolve_filter(&config(Some("debug")), Some("warn".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn rust_log_is_used_without_explicit_filter() {
        let f = resolve_filter(&config(None), Some("optosim_engine=trace".into()));
        assert_eq!(f, "optosim_engine=trace");
    }

    #[test]
    fn falls_back_to_info_with_quiet_wgpu() {
        assert_eq!(resolve_filter(&config(None), None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(&config(Some("  ")), None), DEFAULT_FILTER);
    }
}
