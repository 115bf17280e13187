//! Server configuration from environment variables

use crate::system_prompt::{InstructionTemplate, DEFAULT_SUBJECT};
use crate::tutor::PromptAssembler;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Settings for the HTTP server and the tutor
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub subject: String,
    pub temperature: f32,
    /// Max stored turns sent with each request; `None` sends them all
    pub history_limit: Option<usize>,
    /// Sessions idle longer than this are evicted; `None` keeps them forever
    pub session_ttl: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            subject: DEFAULT_SUBJECT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            history_limit: None,
            session_ttl: Some(DEFAULT_SESSION_TTL),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unparseable values fall back to the
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = get("MENTOR_PORT")
            .and_then(|p| parse_or_warn("MENTOR_PORT", &p))
            .unwrap_or(defaults.port);

        let temperature = get("MENTOR_TEMPERATURE")
            .and_then(|t| parse_or_warn::<f32>("MENTOR_TEMPERATURE", &t))
            .and_then(temperature_in_range)
            .unwrap_or(defaults.temperature);

        let history_limit = get("MENTOR_HISTORY_LIMIT")
            .and_then(|n| parse_or_warn("MENTOR_HISTORY_LIMIT", &n));

        // 0 disables eviction
        let session_ttl = match get("MENTOR_SESSION_TTL_SECS")
            .and_then(|s| parse_or_warn::<u64>("MENTOR_SESSION_TTL_SECS", &s))
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.session_ttl,
        };

        Self {
            port,
            subject: get("MENTOR_SUBJECT").unwrap_or(defaults.subject),
            temperature,
            history_limit,
            session_ttl,
        }
    }

    pub fn assembler(&self) -> PromptAssembler {
        let assembler = PromptAssembler::new(InstructionTemplate::new(self.subject.clone()))
            .with_temperature(self.temperature);
        match self.history_limit {
            Some(limit) => assembler.with_history_limit(limit),
            None => assembler,
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(variable = name, value = raw, "Ignoring unparseable setting");
    }
    parsed
}

fn temperature_in_range(temperature: f32) -> Option<f32> {
    if (0.0..=2.0).contains(&temperature) {
        Some(temperature)
    } else {
        tracing::warn!(
            variable = "MENTOR_TEMPERATURE",
            value = temperature,
            "Ignoring temperature outside 0.0..=2.0"
        );
        None
    }
}
