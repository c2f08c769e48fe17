use chrono::Duration;
use reqwest::Url;
use teloxide::types::ChatId;

/* Config holds everything the bot reads from its environment.
 * Values are loaded once at startup, after dotenv has populated the
 * process environment from an optional `.env` file.
 * Any missing or malformed required value is fatal.
 */

const TOKEN_VAR: &str = "TOKEN";
const ADMIN_ID_VAR: &str = "ADMIN_ID";
const BASE_URL_VAR: &str = "RENDER_EXTERNAL_URL";
const PORT_VAR: &str = "PORT";
const PENDING_TIMEOUT_VAR: &str = "PENDING_TIMEOUT_SECS";
const API_URL_VAR: &str = "TELEGRAM_API_URL";

const PORT_DEFAULT: u16 = 10000;
const PENDING_TIMEOUT_SECS_DEFAULT: i64 = 600;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} is missing! Check your .env file.")]
    MissingVar(&'static str),
    #[error("{0} is invalid: {1}")]
    InvalidVar(&'static str, String),
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub admin_id: ChatId,
    pub base_url: Option<String>,
    pub port: u16,
    pub pending_timeout: Duration,
    pub api_url: Option<Url>,
}

impl BotConfig {
    pub fn from_env() -> Result<BotConfig, ConfigError> {
        BotConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /* Builds the config from any key lookup.
     * Empty values count as unset.
     */
    pub fn from_lookup<F>(lookup: F) -> Result<BotConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let token = get(TOKEN_VAR).ok_or(ConfigError::MissingVar(TOKEN_VAR))?;
        if token.contains('/') || token.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidVar(
                TOKEN_VAR,
                "must not contain '/' or whitespace".to_string(),
            ));
        }

        let admin_id = get(ADMIN_ID_VAR).ok_or(ConfigError::MissingVar(ADMIN_ID_VAR))?;
        let admin_id = parse_admin_id(&admin_id)?;

        let port = match get(PORT_VAR) {
            Some(port) => port
                .parse::<u16>()
                .map_err(|err| ConfigError::InvalidVar(PORT_VAR, err.to_string()))?,
            None => PORT_DEFAULT,
        };

        let pending_timeout_secs = match get(PENDING_TIMEOUT_VAR) {
            Some(secs) => match secs.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::InvalidVar(
                        PENDING_TIMEOUT_VAR,
                        "must be positive".to_string(),
                    ))
                }
                Err(err) => {
                    return Err(ConfigError::InvalidVar(
                        PENDING_TIMEOUT_VAR,
                        err.to_string(),
                    ))
                }
            },
            None => PENDING_TIMEOUT_SECS_DEFAULT,
        };
        // chrono caps durations at i64::MAX milliseconds
        let pending_timeout = Duration::try_seconds(pending_timeout_secs).ok_or(
            ConfigError::InvalidVar(PENDING_TIMEOUT_VAR, "out of range".to_string()),
        )?;

        let api_url = match get(API_URL_VAR) {
            Some(url) => Some(
                Url::parse(&url)
                    .map_err(|err| ConfigError::InvalidVar(API_URL_VAR, err.to_string()))?,
            ),
            None => None,
        };

        Ok(BotConfig {
            token,
            admin_id,
            base_url: get(BASE_URL_VAR),
            port,
            pending_timeout,
            api_url,
        })
    }
}

// Admin id must be all ASCII digits.
fn parse_admin_id(text: &str) -> Result<ChatId, ConfigError> {
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidVar(
            ADMIN_ID_VAR,
            "must be numeric".to_string(),
        ));
    }

    text.parse::<i64>()
        .map(ChatId)
        .map_err(|err| ConfigError::InvalidVar(ADMIN_ID_VAR, err.to_string()))
}
