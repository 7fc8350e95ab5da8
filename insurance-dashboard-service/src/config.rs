use dashboard_flow::{AnalysisSettings, GenerateOptions, User, generate::DEFAULT_MODEL};
use std::{str::FromStr, time::Duration};
use tracing::warn;

/// How completed generations are turned into a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Random mock values
    #[default]
    Placeholder,
    /// The model's JSON verdict when present, the mock otherwise
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub analysis: AnalysisSettings,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub operator: User,
    pub strategy: StrategyKind,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let log_format = match text("LOG_FORMAT", "json").as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        };
        let strategy = match text("DASHBOARD_STRATEGY", "placeholder").as_str() {
            "response" => StrategyKind::Response,
            "placeholder" => StrategyKind::Placeholder,
            other => {
                warn!(value = %other, "Unknown DASHBOARD_STRATEGY, using placeholder");
                StrategyKind::Placeholder
            }
        };

        let delay_ms: u64 = parse_or(&lookup, "ANALYSIS_DELAY_MS", 3_000);
        let max_tokens: u64 = parse_or(&lookup, "ANALYSIS_MAX_TOKENS", 500);

        Self {
            bind_addr: text("BIND_ADDR", "0.0.0.0"),
            port: parse_or(&lookup, "PORT", 3000),
            log_format,
            analysis: AnalysisSettings {
                delay: Duration::from_millis(delay_ms),
                generate: GenerateOptions { max_tokens },
            },
            openrouter_api_key: lookup("OPENROUTER_API_KEY").filter(|key| !key.trim().is_empty()),
            openrouter_model: text("OPENROUTER_MODEL", DEFAULT_MODEL),
            operator: User {
                id: "operator".to_string(),
                name: text("DASHBOARD_OPERATOR_NAME", "Back Office Operator"),
                email: text("DASHBOARD_OPERATOR_EMAIL", "operator@insurance.local"),
            },
            strategy,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Malformed number, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ServiceConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = ServiceConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.analysis.delay, Duration::from_millis(3_000));
        assert_eq!(config.analysis.generate.max_tokens, 500);
        assert!(config.openrouter_api_key.is_none());
        assert_eq!(config.openrouter_model, DEFAULT_MODEL);
        assert_eq!(config.operator.name, "Back Office Operator");
        assert_eq!(config.strategy, StrategyKind::Placeholder);
    }

    #[test]
    fn overrides_are_read() {
        let config = config(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("LOG_FORMAT", "pretty"),
            ("ANALYSIS_DELAY_MS", "250"),
            ("OPENROUTER_API_KEY", "sk-test"),
            ("DASHBOARD_OPERATOR_EMAIL", "claims@acme.test"),
            ("DASHBOARD_STRATEGY", "response"),
        ]);
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.analysis.delay, Duration::from_millis(250));
        assert_eq!(config.openrouter_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.operator.email, "claims@acme.test");
        assert_eq!(config.strategy, StrategyKind::Response);
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = config(&[
            ("PORT", "eighty"),
            ("ANALYSIS_DELAY_MS", "-5"),
            ("ANALYSIS_MAX_TOKENS", ""),
            ("OPENROUTER_API_KEY", "  "),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.analysis.delay, Duration::from_millis(3_000));
        assert_eq!(config.analysis.generate.max_tokens, 500);
        assert!(config.openrouter_api_key.is_none());
    }
}
