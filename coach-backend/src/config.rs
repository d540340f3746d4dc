use std::env;

/// Default upper bound for a single agent invocation
pub const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    pub secret_key: String,
    pub port: u16,
    pub database_url: String,
    pub llm: LlmConfig,
    pub agent_timeout_secs: u64,
}

/// Settings for the OpenAI-compatible endpoint the coaching agents talk to
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let secret_key = env::var("SECRET_KEY").map_err(|_| "SECRET_KEY must be set".to_string())?;
        let port = parse_var("PORT", 8080u16)?;
        let agent_timeout_secs =
            check_timeout(parse_var("AGENT_TIMEOUT_SECS", DEFAULT_AGENT_TIMEOUT_SECS)?)?;

        let defaults = LlmConfig::default();
        let llm = LlmConfig {
            endpoint: env::var("LLM_ENDPOINT").unwrap_or(defaults.endpoint),
            api_key: env::var("LLM_API_KEY").unwrap_or(defaults.api_key),
            model: env::var("LLM_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_var("LLM_MAX_TOKENS", defaults.max_tokens)?,
        };

        Ok(Self {
            secret_key,
            port,
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "./.db/coach.db".to_string()),
            llm,
            agent_timeout_secs,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

/// Agent timeout must be at least one second
fn check_timeout(secs: u64) -> Result<u64, String> {
    if secs == 0 {
        return Err("AGENT_TIMEOUT_SECS must be greater than zero".to_string());
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        assert_eq!(parse_var("COACH_TEST_UNSET_VAR", 42u64).unwrap(), 42);
    }

    #[test]
    fn test_llm_defaults() {
        let llm = LlmConfig::default();
        assert!(llm.endpoint.ends_with("/chat/completions"));
        assert!(llm.api_key.is_empty());
        assert_eq!(llm.max_tokens, 1024);
    }

    #[test]
    fn test_zero_agent_timeout_is_rejected() {
        assert_eq!(
            check_timeout(0).unwrap_err(),
            "AGENT_TIMEOUT_SECS must be greater than zero"
        );
        assert_eq!(check_timeout(DEFAULT_AGENT_TIMEOUT_SECS).unwrap(), 30);
    }
}
