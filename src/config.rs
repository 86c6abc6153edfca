//! Environment-driven configuration for the two demo servers
//!
//! Both binaries read the same OpenRouter variables; each has its own
//! default port, model and request headers. Empty variables fall back to
//! their defaults, matching `VAR || default` semantics.

use crate::error::{AppError, Result};
use crate::gateway::OpenRouterConfig;

pub const DEFAULT_CHAT_MODEL: &str = "google/gemini-2.0-flash-exp:free";
pub const DEFAULT_INSIGHT_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_MAX_EXCHANGE_TURNS: usize = 20;

/// Configuration for the therapist chat server
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub port: u16,
    pub model: String,
    pub max_exchange_turns: usize,
    pub openrouter: OpenRouterConfig,
}

impl ChatConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: parse_port(env_var("PORT"), 3000)?,
            model: env_or("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            max_exchange_turns: parse_max_exchange_turns(env_var("MAX_EXCHANGE_TURNS"))?,
            openrouter: OpenRouterConfig {
                api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
                base_url: env_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
                referer: env_or("SITE_URL", "http://localhost:3000"),
                app_title: "GenerationGap AI Therapist".to_string(),
            },
        })
    }
}

/// Configuration for the family journal server
#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub port: u16,
    pub model: String,
    pub openrouter: OpenRouterConfig,
}

impl JournalConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: parse_port(env_var("PORT"), 5000)?,
            model: env_or("INSIGHT_MODEL", DEFAULT_INSIGHT_MODEL),
            openrouter: OpenRouterConfig {
                api_key: std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
                base_url: env_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
                referer: "https://family-connect-app.com".to_string(),
                app_title: "Family Connect App".to_string(),
            },
        })
    }
}

// ================= Helpers =================

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|| default.to_string())
}

fn parse_port(raw: Option<String>, default: u16) -> Result<u16> {
    match raw {
        Some(value) => value.trim().parse::<u16>().map_err(|_| {
            AppError::ConfigError(format!("PORT must be a number between 1 and 65535, got '{}'", value))
        }),
        None => Ok(default),
    }
}

fn parse_max_exchange_turns(raw: Option<String>) -> Result<usize> {
    let turns = match raw {
        Some(value) => value.trim().parse::<usize>().map_err(|_| {
            AppError::ConfigError(format!("MAX_EXCHANGE_TURNS must be a positive integer, got '{}'", value))
        })?,
        None => DEFAULT_MAX_EXCHANGE_TURNS,
    };
    if turns == 0 {
        return Err(AppError::ConfigError(
            "MAX_EXCHANGE_TURNS must be at least 1".to_string(),
        ));
    }
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_defaults_when_unset() {
        assert_eq!(parse_port(None, 3000).unwrap(), 3000);
        assert_eq!(parse_port(Some("8080".to_string()), 3000).unwrap(), 8080);
    }

    #[test]
    fn test_parse_port_rejects_garbage() {
        assert!(parse_port(Some("https".to_string()), 3000).is_err());
        assert!(parse_port(Some("70000".to_string()), 3000).is_err());
    }

    #[test]
    fn test_parse_max_exchange_turns() {
        assert_eq!(parse_max_exchange_turns(None).unwrap(), 20);
        assert_eq!(parse_max_exchange_turns(Some("4".to_string())).unwrap(), 4);
    }

    #[test]
    fn test_max_exchange_turns_must_be_positive() {
        assert!(parse_max_exchange_turns(Some("0".to_string())).is_err());
        assert!(parse_max_exchange_turns(Some("-3".to_string())).is_err());
        assert!(parse_max_exchange_turns(Some("many".to_string())).is_err());
    }
}
